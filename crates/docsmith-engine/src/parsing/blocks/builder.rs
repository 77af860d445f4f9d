use crate::parsing::code::CodeBlock;
use crate::parsing::context::ParseContext;
use crate::parsing::directives::{DirectiveKind, OpenDirective, Properties};
use crate::parsing::rope::{PositionTracker, span::Span};

use super::{
    classify::LineClass,
    kinds::{CodeFence, DirectiveFence, DirectiveOpen, FenceSig, Heading, ListMarker, PipeTable, slugify},
    open::{BlockOpen, try_open_leaf},
    types::{
        BlockKind, BlockNode, ContainerFrame, HeadingBlock, ListBlock, ListItem, TableBlock,
        TableCell, TableRow,
    },
};

/// Continuation lines indented this far belong to the open list item.
const LIST_CONTINUATION_INDENT: usize = 2;

#[derive(Debug)]
enum LeafState {
    None,
    Paragraph {
        start: usize,
        content: Span,
        last_line_end: usize,
        line_count: usize,
        /// First line text when it could be a table header.
        header: Option<(String, Span)>,
    },
    Fence {
        sig: FenceSig,
        info: String,
        start: usize,
        opening: Span,
        lines: Vec<String>,
        last_line_end: usize,
    },
    List {
        list: ListBlock,
        start: usize,
        last_line_end: usize,
        blank_pending: bool,
    },
    Table {
        table: TableBlock,
        start: usize,
        last_line_end: usize,
    },
}

/// Line-by-line block construction.
///
/// Leaf blocks (paragraphs, fences, lists, tables) live in `leaf` until a
/// line ends them. Directives stack in `open`; a finished block is attached
/// to the innermost open directive or to the document.
pub struct BlockBuilder<'a> {
    ctx: &'a ParseContext,
    positions: &'a PositionTracker<'a>,
    containers: Vec<ContainerFrame>,
    quote_depth: u8,
    leaf: LeafState,
    open: Vec<OpenDirective>,
    out: Vec<BlockNode>,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(ctx: &'a ParseContext, positions: &'a PositionTracker<'a>) -> Self {
        Self {
            ctx,
            positions,
            containers: Vec::new(),
            quote_depth: 0,
            leaf: LeafState::None,
            open: Vec::new(),
            out: Vec::new(),
        }
    }

    pub fn push(&mut self, c: &LineClass) {
        if let Some(top) = self.open.last_mut() {
            top.last_line_end = c.line.end;
        }

        // A closing directive fence also ends an unterminated code fence inside it.
        if self.open.last().is_some_and(|top| top.closes(c)) {
            self.flush_leaf();
            self.close_directive(c.line.start, c.line.end);
            return;
        }

        if self.in_fence() {
            self.consume_fence_line(c);
            return;
        }

        self.set_quote_depth(c.quote_depth);

        if let Some(top) = self.open.last_mut() {
            if top.accepting_properties {
                if let Some((key, value)) = DirectiveFence::property(&c.remainder_text) {
                    top.properties.insert(key, value);
                    return;
                }
                top.accepting_properties = false;
            }
            if top.is_raw() {
                top.body.push(c.content_text.clone());
                return;
            }
        }

        if c.is_blank {
            self.blank_line();
            return;
        }

        if self.continue_table(c) || self.continue_list_indented(c) {
            return;
        }

        if let Some(open) = try_open_leaf(c)
            && self.interrupts(&open)
        {
            self.open_leaf(open, c);
            return;
        }

        if self.continue_list_lazy(c) || self.start_table(c) {
            return;
        }

        self.extend_paragraph(c);
    }

    pub fn finish(mut self) -> Vec<BlockNode> {
        // EOF flush
        self.flush_leaf();
        let mut end = 0;
        while let Some(top) = self.open.pop() {
            end = end.max(top.last_line_end);
            let node = top.close(end, end, self.positions);
            self.attach(node);
        }
        self.out
    }

    fn in_fence(&self) -> bool {
        matches!(self.leaf, LeafState::Fence { .. })
    }

    /// Quote depth changes end the current leaf.
    fn set_quote_depth(&mut self, depth: u8) {
        if depth == self.quote_depth {
            return;
        }
        self.flush_leaf();
        self.quote_depth = depth;
        self.containers
            .retain(|f| !matches!(f, ContainerFrame::BlockQuote { .. }));
        if depth > 0 {
            self.containers.push(ContainerFrame::BlockQuote { depth });
        }
    }

    fn attach(&mut self, node: BlockNode) {
        match self.open.last_mut() {
            Some(top) => top.children.push(node),
            None => self.out.push(node),
        }
    }

    fn node(&self, kind: BlockKind, span: Span, content_span: Span) -> BlockNode {
        BlockNode {
            containers: self.containers.clone(),
            kind,
            span,
            content_span,
            position: self.positions.span(span),
            inlines: Vec::new(),
        }
    }

    /// Whether an opener may end the current leaf.
    ///
    /// An ordered item not starting at 1 does not interrupt a paragraph.
    fn interrupts(&self, open: &BlockOpen) -> bool {
        match (open, &self.leaf) {
            (BlockOpen::ListItem(marker), LeafState::Paragraph { .. }) => {
                !marker.ordered || marker.number == 1
            }
            _ => true,
        }
    }

    /// Starts the block `open` describes. Everything but a list item
    /// continuing the current list ends the current leaf first.
    fn open_leaf(&mut self, open: BlockOpen, c: &LineClass) {
        match open {
            BlockOpen::Directive(open) => {
                self.flush_leaf();
                self.open_directive(open, c);
            }
            BlockOpen::FencedCode { sig, info } => {
                self.flush_leaf();
                self.leaf = LeafState::Fence {
                    sig,
                    info,
                    start: c.line.start,
                    opening: c.remainder_span,
                    lines: Vec::new(),
                    last_line_end: c.line.end,
                };
            }
            BlockOpen::Heading { level, text_offset } => {
                self.flush_leaf();
                let raw = c.remainder_text.get(text_offset..).unwrap_or_default();
                let text = Heading::text(raw);
                let text_start = c.remainder_span.start + text_offset;
                let content = Span::new(text_start, text_start + text.len());
                let kind = BlockKind::Heading(HeadingBlock {
                    level,
                    slug: slugify(text),
                });
                let node = self.node(kind, Span::new(c.line.start, c.line.end), content);
                self.attach(node);
            }
            BlockOpen::ListItem(marker) => {
                let item = Self::list_item(c, marker);
                let continues = matches!(
                    &self.leaf,
                    LeafState::List { list, .. } if list.ordered == marker.ordered
                );
                if continues
                    && let LeafState::List {
                        list,
                        last_line_end,
                        blank_pending,
                        ..
                    } = &mut self.leaf
                {
                    list.items.push(item);
                    *last_line_end = c.line.end;
                    *blank_pending = false;
                    return;
                }
                self.flush_leaf();
                self.leaf = LeafState::List {
                    list: ListBlock {
                        ordered: marker.ordered,
                        start: marker.number,
                        items: vec![item],
                    },
                    start: c.line.start,
                    last_line_end: c.line.end,
                    blank_pending: false,
                };
            }
        }
    }

    fn open_directive(&mut self, open: DirectiveOpen, c: &LineClass) {
        let opening = self.positions.span(c.remainder_span);
        let kind = match self.ctx.extensions().directives.create(&open.name) {
            Some(kind) => kind,
            None => {
                self.ctx
                    .error(opening, format!("Unknown directive '{}'", open.name));
                DirectiveKind::Unknown
            }
        };
        self.open.push(OpenDirective {
            open,
            kind,
            properties: Properties::default(),
            accepting_properties: true,
            start: c.line.start,
            opener_end: c.line.end,
            opening,
            line: c.number + 1,
            containers: self.containers.clone(),
            children: Vec::new(),
            body: Vec::new(),
            last_line_end: c.line.end,
        });
    }

    fn close_directive(&mut self, close_start: usize, end: usize) {
        if let Some(top) = self.open.pop() {
            let node = top.close(close_start, end, self.positions);
            self.attach(node);
        }
    }

    fn consume_fence_line(&mut self, c: &LineClass) {
        let LeafState::Fence {
            sig,
            lines,
            last_line_end,
            ..
        } = &mut self.leaf
        else {
            return;
        };
        *last_line_end = c.line.end;

        if CodeFence::closes(*sig, &c.remainder_text) {
            self.flush_fence(true);
        } else {
            lines.push(c.content_text.clone());
        }
    }

    fn blank_line(&mut self) {
        match &mut self.leaf {
            LeafState::List { blank_pending, .. } => *blank_pending = true,
            _ => self.flush_leaf(),
        }
    }

    fn list_item(c: &LineClass, marker: ListMarker) -> ListItem {
        let content_start = (c.remainder_span.start + marker.content_offset).min(c.remainder_span.end);
        ListItem {
            span: Span::new(c.remainder_span.start, c.line.end),
            content_span: Span::new(content_start, c.remainder_span.end),
            inlines: Vec::new(),
        }
    }

    fn extend_list_item(&mut self, c: &LineClass) -> bool {
        let LeafState::List {
            list,
            last_line_end,
            blank_pending,
            ..
        } = &mut self.leaf
        else {
            return false;
        };
        let Some(item) = list.items.last_mut() else {
            return false;
        };
        item.span.end = c.line.end;
        item.content_span.end = c.remainder_span.end;
        *last_line_end = c.line.end;
        *blank_pending = false;
        true
    }

    fn continue_list_indented(&mut self, c: &LineClass) -> bool {
        matches!(self.leaf, LeafState::List { .. })
            && c.indent >= LIST_CONTINUATION_INDENT
            && self.extend_list_item(c)
    }

    fn continue_list_lazy(&mut self, c: &LineClass) -> bool {
        match self.leaf {
            LeafState::List { blank_pending, .. } if !blank_pending => self.extend_list_item(c),
            LeafState::List { .. } => {
                self.flush_leaf();
                false
            }
            _ => false,
        }
    }

    fn continue_table(&mut self, c: &LineClass) -> bool {
        let LeafState::Table {
            table,
            last_line_end,
            ..
        } = &mut self.leaf
        else {
            return false;
        };
        if !PipeTable::is_row(&c.remainder_text) {
            self.flush_leaf();
            return false;
        }
        table.rows.push(Self::table_row(&c.remainder_text, c.remainder_span));
        *last_line_end = c.line.end;
        true
    }

    /// A delimiter row under a one-line paragraph turns it into a table.
    fn start_table(&mut self, c: &LineClass) -> bool {
        let LeafState::Paragraph {
            start,
            line_count: 1,
            header: Some((header, header_span)),
            ..
        } = &self.leaf
        else {
            return false;
        };
        if !PipeTable::is_delimiter_row(&c.remainder_text) {
            return false;
        }
        let table = TableBlock {
            rows: vec![Self::table_row(header, *header_span)],
            column_definitions: PipeTable::split_cells(&c.remainder_text, c.remainder_span.start)
                .len(),
            widths: None,
        };
        self.leaf = LeafState::Table {
            table,
            start: *start,
            last_line_end: c.line.end,
        };
        true
    }

    fn table_row(text: &str, span: Span) -> TableRow {
        TableRow {
            span,
            cells: PipeTable::split_cells(text, span.start)
                .into_iter()
                .map(|span| TableCell {
                    span,
                    inlines: Vec::new(),
                })
                .collect(),
        }
    }

    fn extend_paragraph(&mut self, c: &LineClass) {
        match &mut self.leaf {
            LeafState::Paragraph {
                content,
                last_line_end,
                line_count,
                ..
            } => {
                content.end = c.remainder_span.end;
                *last_line_end = c.line.end;
                *line_count += 1;
            }
            _ => {
                self.flush_leaf();
                let header = PipeTable::is_row(&c.remainder_text)
                    .then(|| (c.remainder_text.clone(), c.remainder_span));
                self.leaf = LeafState::Paragraph {
                    start: c.line.start,
                    content: c.remainder_span,
                    last_line_end: c.line.end,
                    line_count: 1,
                    header,
                };
            }
        }
    }

    fn flush_leaf(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        let node = match prev {
            LeafState::None => return,
            fence @ LeafState::Fence { .. } => {
                self.leaf = fence;
                self.flush_fence(false);
                return;
            }
            LeafState::Paragraph {
                start,
                content,
                last_line_end,
                ..
            } => self.node(BlockKind::Paragraph, Span::new(start, last_line_end), content),
            LeafState::List {
                list,
                start,
                last_line_end,
                ..
            } => {
                let span = Span::new(start, last_line_end);
                self.node(BlockKind::List(list), span, span)
            }
            LeafState::Table {
                table,
                start,
                last_line_end,
            } => {
                let span = Span::new(start, last_line_end);
                self.node(BlockKind::Table(table), span, span)
            }
        };
        self.attach(node);
    }

    /// Emits the open fence; an unterminated fence runs to end of input.
    fn flush_fence(&mut self, closed: bool) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Fence {
            sig,
            info,
            start,
            opening,
            lines,
            last_line_end,
        } = prev
        {
            let code = CodeBlock::build(
                self.ctx,
                sig,
                &info,
                lines,
                self.positions.span(opening),
                closed,
            );
            let span = Span::new(start, last_line_end);
            let content = Span::new(opening.end.min(last_line_end), last_line_end);
            let node = self.node(BlockKind::FencedCode(code), span, content);
            self.attach(node);
        }
    }
}
