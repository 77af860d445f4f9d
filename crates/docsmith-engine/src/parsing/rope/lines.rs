use xi_rope::Rope;

use super::span::Span;

/// A single line of the source with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Zero-based line index.
    pub number: usize,
    /// Byte span of this line in the rope (includes newline if present).
    pub span: Span,
    pub text: String,
}

impl LineRef {
    /// Span of the line without its line terminator.
    pub fn content_span(&self) -> Span {
        let trimmed = self.text.trim_end_matches(['\n', '\r']).len();
        Span {
            start: self.span.start,
            end: self.span.start + trimmed,
        }
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` so newline characters stay in the spans and every byte of
/// the rope belongs to exactly one line.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).enumerate().map(move |(number, line)| {
        let start = offset;
        offset += line.len();
        LineRef {
            number,
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}
