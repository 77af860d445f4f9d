//! # Block Scan
//!
//! Lines go through two steps:
//!
//! 1. `classify` reads local facts off each line: quote depth, indentation,
//!    and whether it opens or closes a code fence or a `:::` directive fence
//! 2. `builder` folds the classified lines into [`BlockNode`]s. It keeps a
//!    stack of open directives; blocks inside a directive become its
//!    children, and a closing fence pops the innermost directive whose
//!    opening fence has the same colon count
//!
//! Code fences and raw directives (`{mermaid}`, `{math}`) keep their body
//! verbatim. Every node records byte spans into the file so later stages
//! never copy text.

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod open;
pub mod types;

pub use builder::BlockBuilder;
pub use classify::{LineClass, MarkdownLineClassifier};
pub use types::{BlockKind, BlockNode, ContainerFrame};
