//! Directive-aware markdown parsing and validation.
//!
//! A [`BuildSession`] parses a folder of markdown files in parallel. Each
//! file goes through a line-oriented block scan, an inline scan and a
//! finalize pass; every problem found along the way is a [`Diagnostic`] in
//! the session's [`DiagnosticsCollector`].

pub mod build;
pub mod diagnostics;
pub mod io;
pub mod links;
pub mod parsing;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use build::{BuildError, BuildOutput, BuildSession, BuildSummary, CancellationToken};
pub use diagnostics::{Diagnostic, DiagnosticsCollector, HintRegistry, Severity};
pub use io::*;
pub use links::{CrossLinkResolver, LegacyPathIndex, Resolvers, StaticCrossLinkResolver};
pub use parsing::{ParseContext, ParsedDoc, parse_and_finalize, parse_document};
