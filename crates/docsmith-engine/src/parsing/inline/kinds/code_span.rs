/// Backtick code: a raw zone.
///
/// Roles, links and irregular spaces between the ticks are left alone. The
/// content may wrap onto the next line of the same block.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: u8 = b'`';
    pub const STOPS: &'static [u8] = &[Self::TICK];
}
