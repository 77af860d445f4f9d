//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via outline assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`outline`**: Renders a parsed tree as an indented, line-per-block text
//!   outline for `insta` inline snapshots and plain string comparisons
//! - **`invariants`**: Runtime checks for parser correctness (spans in bounds,
//!   child spans contained in parents, finalized trees fully finalized)

pub mod invariants;
pub mod outline;

pub use invariants::check as invariants;
pub use outline::outline;
