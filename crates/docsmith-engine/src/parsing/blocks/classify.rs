use crate::parsing::rope::{lines::LineRef, span::Span};

use super::kinds::{BlockQuote, CodeFence, DirectiveFence, FenceSig};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Zero-based line index.
    pub number: usize,
    /// Full byte span of this line in the rope.
    pub line: Span,
    /// Whether the line is blank (whitespace only after stripping prefixes).
    pub is_blank: bool,
    /// Number of blockquote `>` prefixes found.
    pub quote_depth: u8,
    /// Line after blockquote markers, indentation preserved.
    pub content_span: Span,
    pub content_text: String,
    /// Leading spaces of the content.
    pub indent: usize,
    /// Content with indentation stripped.
    pub remainder_span: Span,
    pub remainder_text: String,
    /// If the remainder looks like a code fence opener/closer.
    pub fence_sig: Option<FenceSig>,
    /// If the remainder is a colons-only line (a directive closing fence).
    pub colon_fence: Option<usize>,
}

/// Classifies individual lines for the block parsing phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        let trimmed = lr.text.trim_end_matches(['\r', '\n']);
        let is_blank = trimmed.trim().is_empty();

        let (qd, idx) = BlockQuote::strip_prefixes(trimmed);
        let content = &trimmed[idx..];
        let remainder = content.trim_start_matches([' ', '\t']);
        let indent = content.len() - remainder.len();
        let end = lr.span.start + trimmed.len();

        LineClass {
            number: lr.number,
            line: lr.span,
            is_blank,
            quote_depth: qd,
            content_span: Span {
                start: lr.span.start + idx,
                end,
            },
            content_text: content.to_string(),
            indent,
            remainder_span: Span {
                start: lr.span.start + idx + indent,
                end,
            },
            remainder_text: remainder.to_string(),
            fence_sig: CodeFence::sig(remainder),
            colon_fence: DirectiveFence::closing_len(remainder),
        }
    }
}
