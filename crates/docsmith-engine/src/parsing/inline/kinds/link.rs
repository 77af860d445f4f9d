/// Inline link syntax: `[text](destination)` and `![alt](src)`.
pub struct LinkSyntax;

impl LinkSyntax {
    pub const IMAGE: u8 = b'!';
    pub const TEXT_OPEN: u8 = b'[';
    pub const TEXT_CLOSE: u8 = b']';
    pub const DEST_OPEN: u8 = b'(';
    pub const DEST_CLOSE: u8 = b')';

    /// Strips an optional `"title"` and angle brackets from a destination.
    pub fn destination(raw: &str) -> &str {
        let raw = raw.trim();
        let dest = match raw.find([' ', '\t']) {
            Some(i) => &raw[..i],
            None => raw,
        };
        dest.strip_prefix('<')
            .and_then(|d| d.strip_suffix('>'))
            .unwrap_or(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("page.md", "page.md")]
    #[case(" page.md \"Title\" ", "page.md")]
    #[case("<with-brackets.md>", "with-brackets.md")]
    #[case("#anchor", "#anchor")]
    fn destinations(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(LinkSyntax::destination(raw), expected);
    }
}
