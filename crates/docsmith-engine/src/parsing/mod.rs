//! # Parsing
//!
//! Turns one markdown file into a validated block tree.
//!
//! ## Pipeline
//!
//! 1. **Block scan** (`blocks`): lines are classified and fed to a
//!    `BlockBuilder`, which opens directives through the registry in the
//!    [`ParseContext`] and nests their content as children
//! 2. **Inline scan** (`inline`): paragraphs, headings, list items and table
//!    cells are scanned for code spans, roles, links and irregular spaces
//! 3. **Finalize** (`finalize`): a post-order walk validates every directive
//!    once and performs the rewrites that span several nodes
//!
//! Every stage reports problems through the context's diagnostics collector
//! and keeps going.

pub mod applicability;
pub mod blocks;
pub mod code;
pub mod context;
pub mod directives;
pub mod finalize;
pub mod inline;
pub mod roles;
pub mod rope;
pub mod snapshot;
pub mod substitutions;

use relative_path::RelativePathBuf;
use std::collections::BTreeSet;
use xi_rope::Rope;

use blocks::{BlockBuilder, BlockNode, MarkdownLineClassifier};
use inline::{InlineScope, parse_block_inlines};
use rope::{PositionTracker, Span, lines_with_spans};

pub use context::{Extensions, ParseContext};
pub use finalize::finalize_document;

/// A parsed file: its source and block tree.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    pub file: RelativePathBuf,
    pub source: String,
    pub blocks: Vec<BlockNode>,
    /// Anchors defined by headings and directives, collected at finalize.
    pub anchors: BTreeSet<String>,
    pub finalized: bool,
}

impl ParsedDoc {
    pub fn slice(&self, sp: Span) -> &str {
        self.source.get(sp.start..sp.end).unwrap_or_default()
    }

    /// Pre-order walk over every block in the tree.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a BlockNode)) {
        for block in &self.blocks {
            block.walk(f);
        }
    }
}

/// Block and inline scan of `source`. Directives are left unfinalized.
pub fn parse_document(ctx: &ParseContext, source: &str) -> ParsedDoc {
    let rope = Rope::from(source);
    let positions = PositionTracker::new(&rope);
    let classifier = MarkdownLineClassifier;
    let mut builder = BlockBuilder::new(ctx, &positions);

    for lr in lines_with_spans(&rope) {
        let lc = classifier.classify(&lr);
        builder.push(&lc);
    }
    let mut blocks = builder.finish();

    let scope = InlineScope {
        ctx,
        positions: &positions,
    };
    parse_block_inlines(&scope, source, &mut blocks);

    ParsedDoc {
        file: ctx.file.clone(),
        source: source.to_string(),
        blocks,
        anchors: BTreeSet::new(),
        finalized: false,
    }
}

pub fn parse_and_finalize(ctx: &ParseContext, source: &str) -> ParsedDoc {
    let mut doc = parse_document(ctx, source);
    finalize_document(ctx, &mut doc);
    doc
}
