use crate::parsing::code::CodeBlock;
use crate::parsing::directives::DirectiveBlock;
use crate::parsing::inline::InlineNode;
use crate::parsing::rope::{SourceSpan, span::Span};

/// A frame in the container stack representing a nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerFrame {
    /// A blockquote container with its nesting depth.
    BlockQuote {
        /// How many `>` prefixes (1 = single quote, 2 = nested, etc.)
        depth: u8,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadingBlock {
    pub level: u8,
    /// Anchor derived from the heading text.
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListBlock {
    pub ordered: bool,
    /// Number of the first item; 0 for bullet lists.
    pub start: u64,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub span: Span,
    pub content_span: Span,
    pub inlines: Vec<InlineNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    /// Header row first, delimiter row excluded.
    pub rows: Vec<TableRow>,
    /// Columns declared by the delimiter row.
    pub column_definitions: usize,
    /// Column widths in percent, set by an enclosing `{table}` directive.
    pub widths: Option<Vec<f64>>,
}

impl TableBlock {
    pub fn first_row_cell_count(&self) -> usize {
        self.rows.first().map_or(0, |row| row.cells.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub span: Span,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub span: Span,
    pub inlines: Vec<InlineNode>,
}

/// The kind of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// The default when no other block opener matches.
    Paragraph,
    Heading(HeadingBlock),
    /// A fenced code block (``` or ~~~).
    FencedCode(CodeBlock),
    List(ListBlock),
    Table(TableBlock),
    /// A colon-fenced `{name}` container.
    Directive(DirectiveBlock),
}

/// A parsed block node with its containers, kind, and spans.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    /// The container stack this block is nested within.
    pub containers: Vec<ContainerFrame>,
    pub kind: BlockKind,
    /// Full byte span of the block including delimiters.
    pub span: Span,
    /// Content span for inline parsing (excludes prefixes like `>`).
    pub content_span: Span,
    pub position: SourceSpan,
    /// Inline content of paragraphs and headings.
    pub inlines: Vec<InlineNode>,
}

impl BlockNode {
    pub fn children(&self) -> &[BlockNode] {
        match &self.kind {
            BlockKind::Directive(d) => &d.children,
            _ => &[],
        }
    }

    pub fn as_directive(&self) -> Option<&DirectiveBlock> {
        match &self.kind {
            BlockKind::Directive(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&CodeBlock> {
        match &self.kind {
            BlockKind::FencedCode(code) => Some(code),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListBlock> {
        match &self.kind {
            BlockKind::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableBlock> {
        match &self.kind {
            BlockKind::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Pre-order walk over this node and all descendants.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a BlockNode)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}
