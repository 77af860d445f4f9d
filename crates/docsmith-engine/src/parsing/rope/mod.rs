pub mod lines;
pub mod position;
pub mod span;

pub use lines::{LineRef, lines_with_spans};
pub use position::{PositionTracker, SourcePosition, SourceSpan};
pub use span::Span;
