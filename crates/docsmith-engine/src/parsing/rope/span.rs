use serde::Serialize;

/// A byte range `[start, end)` into the source rope.
///
/// Nodes keep spans rather than copied text wherever the text is not
/// transformed, so slicing the rope with a span reproduces the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_reversed() {
        assert!(Span::new(5, 3).is_empty());
        assert_eq!(Span::new(5, 3).len(), 0);
    }

    #[test]
    fn cover_and_contains() {
        let a = Span::new(2, 6);
        let b = Span::new(4, 10);
        let both = a.cover(b);
        assert_eq!(both, Span::new(2, 10));
        assert!(both.contains(a));
        assert!(both.contains(b));
        assert!(!a.contains(b));
    }
}
