//! # Inline Parsing
//!
//! Cursor-based inline parsing with explicit raw zones.
//!
//! Inline parsing runs after the block scan over the content of paragraphs,
//! headings, list items and table cells. Code spans are raw zones; outside
//! them the scanner recognises substitutions, roles, links and irregular
//! whitespace.

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::{InlineScope, parse_inline};
pub use types::{InlineNode, IrregularSpace, Link, RoleLeaf, SpaceAction, SubstitutionLeaf};

use crate::parsing::blocks::{BlockKind, BlockNode};
use crate::parsing::rope::span::Span;

/// Fills the inline content of every inline-bearing block in the tree.
pub fn parse_block_inlines(scope: &InlineScope<'_>, source: &str, blocks: &mut [BlockNode]) {
    let parse = |sp: Span| parse_inline(scope, sp.start, source.get(sp.start..sp.end).unwrap_or_default());

    for block in blocks {
        match &mut block.kind {
            BlockKind::Paragraph | BlockKind::Heading(_) => {
                block.inlines = parse(block.content_span);
            }
            BlockKind::List(list) => {
                for item in &mut list.items {
                    item.inlines = parse(item.content_span);
                }
            }
            BlockKind::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
                    cell.inlines = parse(cell.span);
                }
            }
            BlockKind::Directive(directive) => {
                parse_block_inlines(scope, source, &mut directive.children);
            }
            BlockKind::FencedCode(_) => {}
        }
    }
}

/// Plain-text projection of inline nodes, as a renderer would emit it.
pub fn render_plain(source: &str, nodes: &[InlineNode]) -> String {
    let slice = |sp: Span| source.get(sp.start..sp.end).unwrap_or_default();
    let mut out = String::new();
    for node in nodes {
        match node {
            InlineNode::Text(sp) => out.push_str(slice(*sp)),
            InlineNode::CodeSpan { inner, .. } => out.push_str(slice(*inner)),
            InlineNode::Role(role) => out.push_str(&role.content),
            InlineNode::IrregularSpace(space) => out.push_str(space.rendered()),
            InlineNode::Link(link) => out.push_str(slice(link.text)),
            InlineNode::Substitution(sub) => {
                out.push_str(sub.replacement.as_deref().unwrap_or_else(|| slice(sub.span)))
            }
        }
    }
    out
}
