/// Delimiters of the `{name}`content`` role syntax.
pub struct RoleDelimiters;

impl RoleDelimiters {
    pub const OPEN: u8 = b'{';
    pub const CLOSE: u8 = b'}';
    pub const CONTENT: u8 = b'`';

    /// Bytes that end a role name candidate.
    pub const NAME_STOPS: [u8; 5] = [b' ', b'\t', b'\r', b'\n', Self::CLOSE];

    /// Only a single opening brace starts a role; longer runs belong to
    /// substitutions.
    pub const OPEN_RUN: usize = 1;
}
