use crate::parsing::context::ParseContext;
use crate::parsing::rope::{PositionTracker, Span};
use crate::parsing::roles::RoleInput;
use crate::parsing::substitutions;

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, LinkSyntax, RoleDelimiters, SpaceNormalizer, SubstitutionDelimiters},
    types::{InlineNode, IrregularSpace, Link, RoleLeaf, SubstitutionLeaf},
};

/// What inline parsing of one file needs besides the text.
pub struct InlineScope<'a> {
    pub ctx: &'a ParseContext,
    pub positions: &'a PositionTracker<'a>,
}

/// Parses the inline content of one block.
///
/// `base` is the file offset where `s` starts. Code spans win over
/// everything else; a run of more than one `{` is a substitution or is
/// skipped whole, so it never reads as a role. The returned nodes cover all
/// of `s`, with plain stretches as `InlineNode::Text`.
pub fn parse_inline(scope: &InlineScope<'_>, base: usize, s: &str) -> Vec<InlineNode> {
    let mut cur = Cursor::new(s, base);
    let mut nodes = Vec::new();
    let mut plain_from = cur.pos();

    while !cur.at_end() {
        let braces = cur.run_of(RoleDelimiters::OPEN);
        let found = if braces >= SubstitutionDelimiters::MIN_OPEN_RUN {
            attempt(&mut cur, |c| substitution(c, scope))
        } else {
            attempt(&mut cur, code_span)
                .or_else(|| attempt(&mut cur, |c| role(c, scope)))
                .or_else(|| attempt(&mut cur, |c| link(c, scope)))
                .or_else(|| attempt(&mut cur, |c| irregular_space(c, scope)))
        };

        let Some(node) = found else {
            if braces >= SubstitutionDelimiters::MIN_OPEN_RUN {
                cur.skip(braces);
            } else {
                cur.skip_char();
            }
            continue;
        };
        let span = node.span();
        if span.start > plain_from {
            nodes.push(InlineNode::Text(Span::new(plain_from, span.start)));
        }
        plain_from = span.end;
        nodes.push(node);
    }

    if cur.pos() > plain_from {
        nodes.push(InlineNode::Text(Span::new(plain_from, cur.pos())));
    }
    nodes
}

/// Runs one recognizer, rewinding the cursor when it declines.
fn attempt<'a>(
    cur: &mut Cursor<'a>,
    recognize: impl FnOnce(&mut Cursor<'a>) -> Option<InlineNode>,
) -> Option<InlineNode> {
    let checkpoint = cur.clone();
    let node = recognize(cur);
    if node.is_none() {
        *cur = checkpoint;
    }
    node
}

/// `` `code` ``; an unclosed tick is plain text.
fn code_span(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    let start = cur.pos();
    if !cur.eat(CodeSpan::TICK) {
        return None;
    }
    let (_, inner) = cur.take_until(CodeSpan::STOPS);
    if !cur.eat(CodeSpan::TICK) {
        return None;
    }
    Some(InlineNode::CodeSpan {
        full: Span::new(start, cur.pos()),
        inner,
    })
}

/// `{{key}}` or `{{key | mutation}}`, closed by exactly two braces on the
/// same line. Undefined keys and mutations are reported here.
fn substitution(cur: &mut Cursor<'_>, scope: &InlineScope<'_>) -> Option<InlineNode> {
    let start = cur.pos();
    cur.skip(cur.run_of(RoleDelimiters::OPEN));
    let (raw, _) = cur.take_until(&SubstitutionDelimiters::KEY_STOPS);
    if raw.trim().is_empty()
        || cur.run_of(RoleDelimiters::CLOSE) != SubstitutionDelimiters::CLOSE_RUN
    {
        return None;
    }
    cur.skip(SubstitutionDelimiters::CLOSE_RUN);

    let span = Span::new(start, cur.pos());
    let position = scope.positions.span(span);
    let resolved = substitutions::resolve(raw, &scope.ctx.config.substitutions);
    for (severity, message) in resolved.problems {
        scope.ctx.emit(severity, position, message);
    }
    Some(InlineNode::Substitution(SubstitutionLeaf {
        span,
        key: resolved.key,
        replacement: resolved.replacement,
        position,
    }))
}

/// `{name}`content``.
///
/// The name must be closed by exactly one `}` and match a registered role,
/// and the content must close on the same line.
fn role(cur: &mut Cursor<'_>, scope: &InlineScope<'_>) -> Option<InlineNode> {
    let start = cur.pos();
    if !cur.eat(RoleDelimiters::OPEN) {
        return None;
    }
    let (name, _) = cur.take_until(&RoleDelimiters::NAME_STOPS);
    let registered = scope.ctx.extensions().roles.find(name)?;
    if cur.run_of(RoleDelimiters::CLOSE) != 1 {
        return None;
    }
    cur.skip(1);
    if !cur.eat(RoleDelimiters::CONTENT) {
        return None;
    }
    let (content, _) = cur.take_until(&[RoleDelimiters::CONTENT, b'\n']);
    if !cur.eat(RoleDelimiters::CONTENT) {
        return None;
    }

    let span = Span::new(start, cur.pos());
    let position = scope.positions.span(span);
    let input = RoleInput {
        name,
        content,
        position,
    };
    let kind = registered.create(&input, scope.ctx);

    Some(InlineNode::Role(RoleLeaf {
        role: name.to_string(),
        content: content.to_string(),
        delimiter_count: RoleDelimiters::OPEN_RUN,
        span,
        position,
        kind,
    }))
}

/// `[text](destination)` or `![alt](src)`. Link text may nest brackets;
/// neither part may cross a line break.
fn link(cur: &mut Cursor<'_>, scope: &InlineScope<'_>) -> Option<InlineNode> {
    let start = cur.pos();
    let image = cur.looking_at(&[LinkSyntax::IMAGE, LinkSyntax::TEXT_OPEN]);
    if image {
        cur.skip(1);
    }
    if !cur.eat(LinkSyntax::TEXT_OPEN) {
        return None;
    }

    let text_start = cur.pos();
    let mut depth = 0usize;
    loop {
        match cur.peek()? {
            b'\n' => return None,
            LinkSyntax::TEXT_OPEN => depth += 1,
            LinkSyntax::TEXT_CLOSE if depth == 0 => break,
            LinkSyntax::TEXT_CLOSE => depth -= 1,
            _ => {}
        }
        cur.skip(1);
    }
    let text = Span::new(text_start, cur.pos());
    cur.skip(1);

    if !cur.eat(LinkSyntax::DEST_OPEN) {
        return None;
    }
    let (raw, _) = cur.take_until(&[LinkSyntax::DEST_CLOSE, b'\n']);
    if !cur.eat(LinkSyntax::DEST_CLOSE) {
        return None;
    }

    let span = Span::new(start, cur.pos());
    Some(InlineNode::Link(Link {
        span,
        text,
        destination: LinkSyntax::destination(raw).to_string(),
        image,
        position: scope.positions.span(span),
        resolved: None,
    }))
}

/// One irregular whitespace char. Only the first in a file is hinted.
fn irregular_space(cur: &mut Cursor<'_>, scope: &InlineScope<'_>) -> Option<InlineNode> {
    let ch = cur.peek_char()?;
    let action = SpaceNormalizer::classify(ch)?;
    let start = cur.pos();
    cur.skip_char();
    let span = Span::new(start, cur.pos());
    scope
        .ctx
        .hint_once(scope.positions.span(span), SpaceNormalizer::hint_message(ch));
    Some(InlineNode::IrregularSpace(IrregularSpace { span, ch, action }))
}
