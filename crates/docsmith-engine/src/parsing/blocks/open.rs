use super::classify::LineClass;
use super::kinds::{CodeFence, DirectiveFence, DirectiveOpen, FenceSig, Heading, ListMarker};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpen {
    Directive(DirectiveOpen),
    FencedCode { sig: FenceSig, info: String },
    Heading { level: u8, text_offset: usize },
    ListItem(ListMarker),
}

/// Detects a block opener on a line.
///
/// Precedence: directive fence, code fence, heading, list item.
pub fn try_open_leaf(c: &LineClass) -> Option<BlockOpen> {
    let remainder = c.remainder_text.as_str();
    if let Some(open) = DirectiveFence::open(remainder) {
        return Some(BlockOpen::Directive(open));
    }
    if let Some(sig) = c.fence_sig {
        return Some(BlockOpen::FencedCode {
            sig,
            info: CodeFence::info(remainder, sig).to_string(),
        });
    }
    if let Some((level, text_offset)) = Heading::parse(remainder) {
        return Some(BlockOpen::Heading { level, text_offset });
    }
    ListMarker::parse(remainder).map(BlockOpen::ListItem)
}
