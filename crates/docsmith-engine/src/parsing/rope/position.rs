use serde::Serialize;
use xi_rope::Rope;

use super::span::Span;

/// A location in a source file.
///
/// `line` and `column` are 1-based; `column` counts chars, not bytes.
/// `offset` is the byte offset into the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    pub fn byte_span(&self) -> Span {
        Span::new(self.start.offset, self.end.offset)
    }

    /// Length in chars when the span sits on one line, zero otherwise.
    pub fn char_len(&self) -> usize {
        if self.start.line == self.end.line {
            self.end.column.saturating_sub(self.start.column)
        } else {
            0
        }
    }
}

/// Maps byte offsets within one file to line/column positions.
///
/// Positions are computed once when a node or diagnostic is created and are
/// never recomputed afterwards.
pub struct PositionTracker<'a> {
    rope: &'a Rope,
}

impl<'a> PositionTracker<'a> {
    pub fn new(rope: &'a Rope) -> Self {
        Self { rope }
    }

    pub fn position(&self, offset: usize) -> SourcePosition {
        let offset = offset.min(self.rope.len());
        let line = self.rope.line_of_offset(offset);
        let line_start = self.rope.offset_of_line(line);
        let column = self.rope.slice_to_cow(line_start..offset).chars().count() + 1;
        SourcePosition {
            line: line + 1,
            column,
            offset,
        }
    }

    pub fn span(&self, sp: Span) -> SourceSpan {
        SourceSpan {
            start: self.position(sp.start),
            end: self.position(sp.end.max(sp.start)),
        }
    }
}
