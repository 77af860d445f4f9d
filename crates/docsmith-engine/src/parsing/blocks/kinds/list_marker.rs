/// A bullet (`-`, `*`, `+`) or ordered (`1.`, `1)`) list item marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub ordered: bool,
    /// The item number for ordered markers, 0 for bullets.
    pub number: u64,
    /// Byte offset of the item text after the marker and its spacing.
    pub content_offset: usize,
}

impl ListMarker {
    pub const BULLETS: [char; 3] = ['-', '*', '+'];
    const MAX_DIGITS: usize = 9;

    pub fn parse(remainder: &str) -> Option<ListMarker> {
        let first = remainder.chars().next()?;
        let (ordered, number, marker_len) = if Self::BULLETS.contains(&first) {
            (false, 0, 1)
        } else {
            let digits = remainder.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 || digits > Self::MAX_DIGITS {
                return None;
            }
            if !matches!(remainder.as_bytes().get(digits), Some(b'.' | b')')) {
                return None;
            }
            let number = remainder[..digits].parse().ok()?;
            (true, number, digits + 1)
        };

        let rest = &remainder[marker_len..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        // `- - -` and `* * *` are thematic breaks
        if !ordered && Self::is_thematic_break(remainder) {
            return None;
        }
        Some(ListMarker {
            ordered,
            number,
            content_offset: marker_len + (rest.len() - rest.trim_start().len()),
        })
    }

    fn is_thematic_break(line: &str) -> bool {
        let mut chars = line.chars().filter(|c| !c.is_whitespace());
        let Some(first) = chars.next() else {
            return false;
        };
        let rest: Vec<char> = chars.collect();
        rest.len() >= 2 && rest.iter().all(|&c| c == first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("- item", Some((false, 0, 2)))]
    #[case("*   item", Some((false, 0, 4)))]
    #[case("1. first", Some((true, 1, 3)))]
    #[case("12) twelfth", Some((true, 12, 4)))]
    #[case("-", Some((false, 0, 1)))]
    #[case("**bold**", None)]
    #[case("1.5 is a number", None)]
    #[case("- - -", None)]
    #[case("plain", None)]
    fn parse(#[case] line: &str, #[case] expected: Option<(bool, u64, usize)>) {
        let got = ListMarker::parse(line).map(|m| (m.ordered, m.number, m.content_offset));
        assert_eq!(got, expected);
    }
}
