use crate::parsing::inline::types::SpaceAction;

/// Irregular whitespace detection.
///
/// The code points are split into invisible ones, which are dropped, and
/// visible non-standard spaces, which become an ordinary space.
pub struct SpaceNormalizer;

impl SpaceNormalizer {
    pub const REPLACE: [char; 16] = [
        '\u{00A0}', // no-break space
        '\u{1680}', // ogham space mark
        '\u{2000}', // en quad
        '\u{2001}', // em quad
        '\u{2002}', // en space
        '\u{2003}', // em space
        '\u{2004}', // three-per-em space
        '\u{2005}', // four-per-em space
        '\u{2006}', // six-per-em space
        '\u{2007}', // figure space
        '\u{2008}', // punctuation space
        '\u{2009}', // thin space
        '\u{200A}', // hair space
        '\u{202F}', // narrow no-break space
        '\u{205F}', // medium mathematical space
        '\u{3000}', // ideographic space
    ];

    pub const REMOVE: [char; 8] = [
        '\u{000B}', // line tabulation
        '\u{000C}', // form feed
        '\u{0085}', // next line
        '\u{180E}', // mongolian vowel separator
        '\u{200B}', // zero width space
        '\u{2028}', // line separator
        '\u{2029}', // paragraph separator
        '\u{FEFF}', // zero width no-break space
    ];

    pub fn classify(c: char) -> Option<SpaceAction> {
        if c.is_ascii() && c != '\u{000B}' && c != '\u{000C}' {
            return None;
        }
        if Self::REPLACE.contains(&c) {
            Some(SpaceAction::Replace)
        } else if Self::REMOVE.contains(&c) {
            Some(SpaceAction::Remove)
        } else {
            None
        }
    }

    pub fn hint_message(c: char) -> String {
        format!(
            "Irregular whitespace character detected: U+{:04X}. This may impair Markdown rendering.",
            c as u32
        )
    }
}
