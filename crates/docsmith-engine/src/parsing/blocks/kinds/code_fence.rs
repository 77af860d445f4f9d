#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn char(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }
}

/// An opening or closing fence found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSig {
    pub kind: FenceKind,
    /// Length of the fence character run.
    pub len: usize,
}

pub struct CodeFence;

impl CodeFence {
    pub const MIN_LEN: usize = 3;

    /// Detects a fence run of three or more backticks or tildes.
    ///
    /// A backtick fence whose info string contains a backtick is not a fence.
    pub fn sig(remainder: &str) -> Option<FenceSig> {
        let t = remainder.trim_end_matches(['\r', '\n']);
        let kind = match t.chars().next()? {
            '`' => FenceKind::Backticks,
            '~' => FenceKind::Tildes,
            _ => return None,
        };
        let len = t.chars().take_while(|&c| c == kind.char()).count();
        if len < Self::MIN_LEN {
            return None;
        }
        if kind == FenceKind::Backticks && t[len..].contains('`') {
            return None;
        }
        Some(FenceSig { kind, len })
    }

    /// The info string after an opening fence, trimmed.
    pub fn info(remainder: &str, sig: FenceSig) -> &str {
        remainder.get(sig.len..).unwrap_or_default().trim()
    }

    /// A closing fence uses the opener's character, is at least as long and
    /// carries no info string.
    pub fn closes(open: FenceSig, remainder: &str) -> bool {
        match Self::sig(remainder) {
            Some(sig) => {
                sig.kind == open.kind && sig.len >= open.len && Self::info(remainder, sig).is_empty()
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("```rust", Some(FenceSig { kind: FenceKind::Backticks, len: 3 }))]
    #[case("````", Some(FenceSig { kind: FenceKind::Backticks, len: 4 }))]
    #[case("~~~", Some(FenceSig { kind: FenceKind::Tildes, len: 3 }))]
    #[case("``inline``", None)]
    #[case("``` a`b", None)]
    #[case("hello", None)]
    fn detect(#[case] line: &str, #[case] expected: Option<FenceSig>) {
        assert_eq!(CodeFence::sig(line), expected);
    }

    #[test]
    fn info_string_is_trimmed() {
        let sig = CodeFence::sig("```  yaml callouts=false ").unwrap();
        assert_eq!(CodeFence::info("```  yaml callouts=false ", sig), "yaml callouts=false");
    }

    #[test]
    fn closes_matching_fence() {
        let open = FenceSig {
            kind: FenceKind::Backticks,
            len: 3,
        };
        assert!(CodeFence::closes(open, "```"));
        assert!(CodeFence::closes(open, "`````"));
        assert!(!CodeFence::closes(open, "~~~"));
        assert!(!CodeFence::closes(open, "```rust"));
    }

    #[test]
    fn shorter_fence_does_not_close() {
        let open = FenceSig {
            kind: FenceKind::Tildes,
            len: 4,
        };
        assert!(!CodeFence::closes(open, "~~~"));
        assert!(CodeFence::closes(open, "~~~~"));
    }
}
