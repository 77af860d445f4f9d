pub mod block_quote;
pub mod code_fence;
pub mod directive_fence;
pub mod heading;
pub mod list_marker;
pub mod pipe_table;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceSig};
pub use directive_fence::{DirectiveFence, DirectiveOpen};
pub use heading::{Heading, slugify};
pub use list_marker::ListMarker;
pub use pipe_table::PipeTable;
