//! # Finalize
//!
//! Second pass over a scanned document. Runs once per file, after the block
//! and inline scans, and never concurrently with them.
//!
//! - Directives are finalized children first, so a parent sees derived
//!   fields of everything inside it.
//! - Switch items learn their switch from the walk, not from a parent
//!   pointer, and are then put in tab order and renumbered.
//! - `{table}` widths are applied to the first pipe table anywhere below the
//!   directive.
//! - A code block with classic call-outs takes the list right after it.
//! - Links are checked against the anchors of the document and the
//!   installed resolvers.

use std::collections::BTreeSet;

use crate::links::LinkTarget;
use crate::parsing::ParsedDoc;
use crate::parsing::blocks::{BlockKind, BlockNode};
use crate::parsing::blocks::types::TableBlock;
use crate::parsing::context::ParseContext;
use crate::parsing::directives::table::percentages;
use crate::parsing::applicability::ApplicableTo;
use crate::parsing::directives::{
    AppliesItem, DirectiveBlock, DirectiveKind, SwitchScope, SwitchSlot,
};
use crate::parsing::inline::{InlineNode, Link};

/// Validates `doc` and applies cross-node rewrites. Later calls are no-ops.
pub fn finalize_document(ctx: &ParseContext, doc: &mut ParsedDoc) {
    if doc.finalized {
        return;
    }
    doc.finalized = true;

    finalize_blocks(ctx, &mut doc.blocks, None);
    doc.anchors = collect_anchors(ctx, &doc.blocks);
    validate_links(ctx, &doc.anchors, &mut doc.blocks);
    log::debug!("finalized {}", doc.file);
}

/// Post-order finalize of one sibling list.
///
/// `switch` is set when the siblings are the direct children of an
/// `{applies-switch}`.
pub fn finalize_blocks(
    ctx: &ParseContext,
    blocks: &mut Vec<BlockNode>,
    switch: Option<&SwitchScope>,
) {
    let mut item_index = 0;

    for block in blocks.iter_mut() {
        let BlockKind::Directive(directive) = &mut block.kind else {
            continue;
        };

        let scope = directive.switch_scope(ctx);
        finalize_blocks(ctx, &mut directive.children, scope.as_ref());

        let slot = match switch {
            Some(switch) if directive.is_item() => {
                let slot = SwitchSlot {
                    switch: switch.clone(),
                    item_index,
                };
                item_index += 1;
                Some(slot)
            }
            _ => None,
        };

        let first_pass = !directive.finalized;
        directive.finalize_and_validate(ctx, slot.as_ref());
        if first_pass {
            apply_table_widths(ctx, directive);
        }
    }

    if switch.is_some() {
        sort_switch_items(blocks);
    }
    bind_callouts(ctx, blocks);
}

fn item_of(block: &BlockNode) -> Option<&AppliesItem> {
    match &block.as_directive()?.kind {
        DirectiveKind::AppliesItem(item) => Some(item),
        _ => None,
    }
}

/// Puts the items of one switch in tab order and renumbers them.
///
/// Items whose definition did not parse go last. Other siblings keep
/// their places and the items fill the remaining slots.
fn sort_switch_items(blocks: &mut Vec<BlockNode>) {
    let total = blocks.len();
    let (mut items, others): (Vec<_>, Vec<_>) = std::mem::take(blocks)
        .into_iter()
        .enumerate()
        .partition(|(_, block)| item_of(block).is_some());
    items.sort_by_key(|(_, block)| {
        let applies_to = item_of(block).and_then(|item| item.applies_to.as_ref());
        (applies_to.is_none(), applies_to.map(ApplicableTo::display_order))
    });

    let mut items = items.into_iter().map(|(_, block)| block);
    let mut others = others.into_iter().peekable();
    for slot in 0..total {
        match others.next_if(|(at, _)| *at == slot) {
            Some((_, block)) => blocks.push(block),
            None => blocks.extend(items.next()),
        }
    }

    let mut index = 0;
    for block in blocks.iter_mut() {
        if let BlockKind::Directive(directive) = &mut block.kind
            && let DirectiveKind::AppliesItem(item) = &mut directive.kind
        {
            item.index = index;
            index += 1;
        }
    }
}

fn first_table_mut(blocks: &mut [BlockNode]) -> Option<&mut TableBlock> {
    for block in blocks {
        match &mut block.kind {
            BlockKind::Table(table) => return Some(table),
            BlockKind::Directive(directive) => {
                if let Some(table) = first_table_mut(&mut directive.children) {
                    return Some(table);
                }
            }
            _ => {}
        }
    }
    None
}

fn apply_table_widths(ctx: &ParseContext, directive: &mut DirectiveBlock) {
    let DirectiveKind::Table(table_directive) = &directive.kind else {
        return;
    };
    let widths = table_directive.widths.clone();
    let opening = directive.opening;

    let Some(table) = first_table_mut(&mut directive.children) else {
        ctx.warning(opening, "{table} directive does not contain a pipe table");
        return;
    };
    let Some(widths) = widths else {
        return;
    };

    // The delimiter row may over-count with leading or trailing pipes.
    let columns = table.first_row_cell_count();
    if widths.len() != columns {
        ctx.error(
            opening,
            format!(
                "Table widths specifies {} values but the table has {columns} columns",
                widths.len()
            ),
        );
        return;
    }
    table.widths = Some(percentages(&widths));
}

/// Moves the list following each call-out code block into the block.
///
/// On a mismatch the list stays in the tree untouched.
fn bind_callouts(ctx: &ParseContext, blocks: &mut Vec<BlockNode>) {
    let mut i = 0;
    while i < blocks.len() {
        let Some(code) = blocks[i]
            .as_code()
            .filter(|code| code.needs_list_binding())
        else {
            i += 1;
            continue;
        };
        let expected = code.callouts.len();
        let opening = code.opening;

        match blocks.get(i + 1).map(|next| &next.kind) {
            None => ctx.error(
                opening,
                "Code block with annotations is not followed by any content, needs numbered list",
            ),
            Some(BlockKind::List(list)) if list.items.len() != expected => ctx.error(
                opening,
                format!(
                    "Code block has {expected} callouts but the following list has {} items",
                    list.items.len()
                ),
            ),
            Some(BlockKind::List(_)) => {
                let next = blocks.remove(i + 1);
                if let (BlockKind::List(list), BlockKind::FencedCode(code)) =
                    (next.kind, &mut blocks[i].kind)
                {
                    if !list.ordered {
                        ctx.warning(opening, "Call-out annotations should use a numbered list");
                    }
                    code.annotations = list.items;
                }
            }
            Some(_) => ctx.error(
                opening,
                "Code block with annotations is not followed by a list",
            ),
        }
        i += 1;
    }
}

fn collect_anchors(ctx: &ParseContext, blocks: &[BlockNode]) -> BTreeSet<String> {
    let mut anchors = BTreeSet::new();
    let mut add = |anchor: &str, block: &BlockNode| {
        if anchor.is_empty() {
            return;
        }
        if !anchors.insert(anchor.to_string()) {
            ctx.warning(block.position, format!("Duplicate anchor '{anchor}'"));
        }
    };

    for block in blocks {
        block.walk(&mut |node: &BlockNode| match &node.kind {
            BlockKind::Heading(heading) => add(&heading.slug, node),
            BlockKind::Directive(directive) => {
                if let Some(name) = &directive.cross_reference_name {
                    add(name, node);
                }
            }
            _ => {}
        });
    }
    anchors
}

fn for_each_link_mut(blocks: &mut [BlockNode], f: &mut dyn FnMut(&mut Link)) {
    fn visit(inlines: &mut [InlineNode], f: &mut dyn FnMut(&mut Link)) {
        for node in inlines {
            if let InlineNode::Link(link) = node {
                f(link);
            }
        }
    }

    for block in blocks {
        visit(&mut block.inlines, f);
        match &mut block.kind {
            BlockKind::List(list) => {
                for item in &mut list.items {
                    visit(&mut item.inlines, f);
                }
            }
            BlockKind::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
                    visit(&mut cell.inlines, f);
                }
            }
            BlockKind::FencedCode(code) => {
                for item in &mut code.annotations {
                    visit(&mut item.inlines, f);
                }
            }
            BlockKind::Directive(directive) => for_each_link_mut(&mut directive.children, f),
            BlockKind::Paragraph | BlockKind::Heading(_) => {}
        }
    }
}

fn validate_links(ctx: &ParseContext, anchors: &BTreeSet<String>, blocks: &mut [BlockNode]) {
    let legacy_prefix = ctx.config.legacy_url_prefix.as_deref();
    let resolvers = ctx.resolvers();

    for_each_link_mut(blocks, &mut |link: &mut Link| {
        match LinkTarget::classify(&link.destination, legacy_prefix) {
            LinkTarget::Local(fragment) => {
                if !fragment.is_empty() && !anchors.contains(fragment) {
                    ctx.error(
                        link.position,
                        format!("Link points to missing anchor '#{fragment}'"),
                    );
                }
            }
            LinkTarget::CrossLink(uri) => {
                let Some(resolver) = &resolvers.cross_links else {
                    return;
                };
                match resolver.try_resolve(uri) {
                    Some(url) => link.resolved = Some(url),
                    None => ctx.error(link.position, format!("Unable to resolve cross link '{uri}'")),
                }
            }
            LinkTarget::Legacy(path) => {
                if let Some(index) = &resolvers.legacy
                    && !index.path_exists(path)
                {
                    ctx.warning(
                        link.position,
                        format!("Legacy link '{}' points to a page that no longer exists", link.destination),
                    );
                }
            }
            LinkTarget::External | LinkTarget::Relative => {}
        }
    });
}
