use regex::Regex;
use std::sync::OnceLock;

/// What an opening directive fence declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveOpen {
    /// Number of colons in the fence.
    pub fence_len: usize,
    pub name: String,
    /// Free text after the name, `None` when blank.
    pub arguments: Option<String>,
}

/// Colon-fenced directive syntax: `:::{name} args`, `:key: value`, `:::`.
pub struct DirectiveFence;

impl DirectiveFence {
    pub const CHAR: char = ':';
    pub const MIN_LEN: usize = 3;

    pub fn open(remainder: &str) -> Option<DirectiveOpen> {
        static OPENER: OnceLock<Regex> = OnceLock::new();
        let re = OPENER.get_or_init(|| {
            Regex::new(r"^(:{3,})\{([A-Za-z0-9_-]+)\}[ \t]*(.*?)[ \t]*$")
                .expect("Invalid directive opener regex")
        });
        let caps = re.captures(remainder.trim_end_matches(['\r', '\n']))?;
        let arguments = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .filter(|a| !a.is_empty());
        Some(DirectiveOpen {
            fence_len: caps[1].len(),
            name: caps[2].to_string(),
            arguments,
        })
    }

    /// Length of a colons-only line, a closing fence candidate.
    pub fn closing_len(remainder: &str) -> Option<usize> {
        let t = remainder.trim_end();
        let len = t.len();
        (len >= Self::MIN_LEN && t.chars().all(|c| c == Self::CHAR)).then_some(len)
    }

    /// A `:key: value` property line. A key without value maps to "".
    pub fn property(remainder: &str) -> Option<(String, String)> {
        static PROPERTY: OnceLock<Regex> = OnceLock::new();
        let re = PROPERTY.get_or_init(|| {
            Regex::new(r"^:([A-Za-z0-9_-]+):(?:[ \t]+(.*?))?[ \t]*$")
                .expect("Invalid directive property regex")
        });
        let caps = re.captures(remainder.trim_end_matches(['\r', '\n']))?;
        let value = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        Some((caps[1].to_string(), value.to_string()))
    }
}
