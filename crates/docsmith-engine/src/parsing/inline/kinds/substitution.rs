use super::RoleDelimiters;

/// Delimiters of `{{key}}` substitutions.
pub struct SubstitutionDelimiters;

impl SubstitutionDelimiters {
    /// Fewest opening braces; extra ones are trimmed off the key.
    pub const MIN_OPEN_RUN: usize = 2;

    /// The closing run must be exactly this long.
    pub const CLOSE_RUN: usize = 2;

    /// Bytes that end a key.
    pub const KEY_STOPS: [u8; 4] = [RoleDelimiters::CLOSE, b'\r', b'\n', b'\t'];
}
