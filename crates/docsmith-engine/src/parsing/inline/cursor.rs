use crate::parsing::rope::Span;

/// Byte cursor over one block's inline text.
///
/// Positions are absolute file offsets: `base` is where the text starts in
/// the file. All stop bytes are ASCII, so every slice taken at a stop lands
/// on a char boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    base: usize,
    at: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str, base: usize) -> Self {
        Self { text, base, at: 0 }
    }

    /// Absolute byte offset of the next unread byte.
    pub fn pos(&self) -> usize {
        self.base + self.at
    }

    pub fn at_end(&self) -> bool {
        self.at >= self.text.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.at).copied()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn rest(&self) -> &'a str {
        self.text.get(self.at..).unwrap_or_default()
    }

    pub fn looking_at(&self, prefix: &[u8]) -> bool {
        self.rest().as_bytes().starts_with(prefix)
    }

    /// Consumes `b` if it is next.
    pub fn eat(&mut self, b: u8) -> bool {
        let hit = self.peek() == Some(b);
        if hit {
            self.at += 1;
        }
        hit
    }

    /// Skips `n` bytes, stopping at the end of the text.
    pub fn skip(&mut self, n: usize) {
        self.at = (self.at + n).min(self.text.len());
    }

    /// Skips one whole char.
    pub fn skip_char(&mut self) {
        let width = self.peek_char().map_or(1, char::len_utf8);
        self.skip(width);
    }

    /// Length of the run of `b` starting here.
    pub fn run_of(&self, b: u8) -> usize {
        self.rest().bytes().take_while(|&x| x == b).count()
    }

    /// Consumes bytes up to (not including) the first byte in `stops`,
    /// returning the consumed text and its absolute span.
    pub fn take_until(&mut self, stops: &[u8]) -> (&'a str, Span) {
        let start = self.at;
        let len = self
            .rest()
            .bytes()
            .position(|b| stops.contains(&b))
            .unwrap_or(self.text.len() - start);
        self.at += len;
        let text = self.text.get(start..self.at).unwrap_or_default();
        (text, Span::new(self.base + start, self.pos()))
    }
}
