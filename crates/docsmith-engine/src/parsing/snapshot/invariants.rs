use crate::parsing::ParsedDoc;
use crate::parsing::blocks::{BlockKind, BlockNode};
use crate::parsing::directives::DirectiveKind;
use crate::parsing::inline::InlineNode;
use crate::parsing::rope::Span;

/// Validates parser output invariants.
///
/// Asserts that:
/// - All block and inline spans are within the source
/// - Content spans are contained within their block spans
/// - Child blocks are contained within their parent directive
/// - Siblings do not overlap and come in source order; the items of an
///   applies-switch may be in tab order instead
/// - After finalize, every directive in the tree is finalized
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(doc: &ParsedDoc) {
    let whole = Span::new(0, doc.source.len());
    check_siblings(doc, &doc.blocks, whole, false);
}

fn check_siblings(doc: &ParsedDoc, blocks: &[BlockNode], parent: Span, reordered: bool) {
    let mut spans: Vec<Span> = blocks.iter().map(|b| b.span).collect();
    if reordered {
        spans.sort_by_key(|sp| sp.start);
    }
    for b in blocks {
        check_block(doc, b, parent);
    }
    let mut previous_end = parent.start;
    for span in spans {
        assert!(
            span.start >= previous_end,
            "sibling spans overlap or are out of order: {span:?} starts before {previous_end}"
        );
        previous_end = span.end;
    }
}

fn check_block(doc: &ParsedDoc, b: &BlockNode, parent: Span) {
    let n = doc.source.len();
    assert!(
        b.span.start <= b.span.end && b.span.end <= n,
        "block span out of bounds: {:?} (source len: {})",
        b.span,
        n
    );
    assert!(
        parent.contains(b.span),
        "block span {:?} not contained in parent {:?}",
        b.span,
        parent
    );
    assert!(
        b.span.contains(b.content_span),
        "content span not contained in block span: content {:?}, block {:?}",
        b.content_span,
        b.span
    );

    for node in &b.inlines {
        check_inline(node, b.content_span);
    }
    match &b.kind {
        BlockKind::List(list) => {
            for item in &list.items {
                assert!(
                    b.span.contains(item.span),
                    "list item {:?} outside list {:?}",
                    item.span,
                    b.span
                );
                for node in &item.inlines {
                    check_inline(node, item.content_span);
                }
            }
        }
        BlockKind::Table(table) => {
            for cell in table.rows.iter().flat_map(|row| &row.cells) {
                for node in &cell.inlines {
                    check_inline(node, cell.span);
                }
            }
        }
        BlockKind::Directive(directive) => {
            assert!(
                !doc.finalized || directive.finalized,
                "directive {{{}}} at line {} was not finalized",
                directive.name,
                directive.line
            );
            let switch = matches!(directive.kind, DirectiveKind::AppliesSwitch(_));
            check_siblings(doc, &directive.children, b.content_span, switch);
        }
        BlockKind::Paragraph | BlockKind::Heading(_) | BlockKind::FencedCode(_) => {}
    }
}

fn check_inline(node: &InlineNode, content: Span) {
    let span = node.span();
    assert!(
        content.contains(span),
        "inline span {span:?} outside its content {content:?}"
    );
}
