use crate::parsing::blocks::classify::LineClass;
use crate::parsing::blocks::kinds::DirectiveOpen;
use crate::parsing::blocks::types::{BlockKind, BlockNode, ContainerFrame};
use crate::parsing::rope::{PositionTracker, SourceSpan, span::Span};

use super::{DirectiveBlock, DirectiveKind, Properties};

/// A directive between its opening and closing fence.
///
/// Only the block scan sees this type; closing it yields an immutable
/// [`DirectiveBlock`] inside a [`BlockNode`].
#[derive(Debug)]
pub struct OpenDirective {
    pub open: DirectiveOpen,
    pub kind: DirectiveKind,
    pub properties: Properties,
    /// Property lines are only read directly after the opener.
    pub accepting_properties: bool,
    /// Byte offset where the opening line starts.
    pub start: usize,
    /// Byte offset where the opening line ends.
    pub opener_end: usize,
    pub opening: SourceSpan,
    /// 1-based line of the opening fence.
    pub line: usize,
    pub containers: Vec<ContainerFrame>,
    pub children: Vec<BlockNode>,
    /// Verbatim body lines of raw directives.
    pub body: Vec<String>,
    pub last_line_end: usize,
}

impl OpenDirective {
    pub fn is_raw(&self) -> bool {
        self.kind.raw_body()
    }

    /// A colons-only line at least as long as the opening fence.
    pub fn closes(&self, c: &LineClass) -> bool {
        c.colon_fence
            .is_some_and(|len| len >= self.open.fence_len)
    }

    /// `close_start` is where the closing fence line starts, or the end of
    /// the block when the document ended first.
    pub fn close(self, close_start: usize, end: usize, positions: &PositionTracker<'_>) -> BlockNode {
        let span = Span::new(self.start, end);
        let content_span = Span::new(self.opener_end.min(close_start), close_start);
        let body = self.is_raw().then(|| self.body.join("\n"));
        let directive = DirectiveBlock {
            name: self.open.name,
            kind: self.kind,
            arguments: self.open.arguments,
            properties: self.properties,
            cross_reference_name: None,
            applies_to: None,
            fence_len: self.open.fence_len,
            line: self.line,
            opening: self.opening,
            body,
            children: self.children,
            finalized: false,
        };
        BlockNode {
            containers: self.containers,
            kind: BlockKind::Directive(directive),
            span,
            content_span,
            position: positions.span(span),
            inlines: Vec::new(),
        }
    }
}
