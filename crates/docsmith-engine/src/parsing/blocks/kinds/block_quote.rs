/// `>` quote markers.
pub struct BlockQuote;

impl BlockQuote {
    pub const PREFIX: u8 = b'>';

    /// Returns the quote depth of a line and the byte offset where its
    /// content starts.
    ///
    /// Markers may be stacked (`>>`) or spaced (`> >`), with up to any number
    /// of spaces before each. One space after the last marker belongs to the
    /// marker. An unquoted line has depth 0 and keeps its indentation.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let bytes = s.as_bytes();
        let mut depth = 0u8;
        let mut content = 0usize;

        while let Some(marker) = bytes[content..]
            .iter()
            .position(|&b| b != b' ')
            .map(|skip| content + skip)
            .filter(|&at| bytes[at] == Self::PREFIX)
        {
            depth = depth.saturating_add(1);
            content = marker + 1;
            if bytes.get(content) == Some(&b' ') {
                content += 1;
            }
        }
        (depth, content)
    }
}
