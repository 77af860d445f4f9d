/// ATX heading syntax (`#` to `######`).
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns (level, byte offset of the heading text).
    pub fn parse(remainder: &str) -> Option<(u8, usize)> {
        let level = remainder.chars().take_while(|&c| c == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let rest = &remainder[level..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        let text_offset = level + (rest.len() - rest.trim_start().len());
        Some((level as u8, text_offset))
    }

    /// Heading text without the optional closing `#` run.
    pub fn text(raw: &str) -> &str {
        let t = raw.trim();
        let without = t.trim_end_matches(Self::MARKER);
        if without.is_empty() || without.ends_with([' ', '\t']) {
            without.trim_end()
        } else {
            t
        }
    }
}

/// Anchor slug for a heading or title: lowercase alphanumerics, everything
/// else collapsed into single hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if !c.is_control() && c != '`' && c != '\'' {
            pending_dash = true;
        }
    }
    slug
}
