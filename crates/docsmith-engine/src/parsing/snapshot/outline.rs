use std::fmt::Write;

use crate::parsing::ParsedDoc;
use crate::parsing::blocks::{BlockKind, BlockNode, ContainerFrame};

const PREVIEW_CHARS: usize = 40;

/// One line per block, children indented under their directive.
///
/// ```text
/// directive {note} 0..30
///   paragraph 10..26 "Some text"
/// ```
pub fn outline(doc: &ParsedDoc) -> String {
    let mut out = String::new();
    for block in &doc.blocks {
        write_block(&mut out, doc, block, 0);
    }
    out
}

fn write_block(out: &mut String, doc: &ParsedDoc, block: &BlockNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = match &block.kind {
        BlockKind::Paragraph => "paragraph".to_string(),
        BlockKind::Heading(heading) => format!("heading({}) #{}", heading.level, heading.slug),
        BlockKind::FencedCode(code) => {
            let mut label = format!("code({})", code.language.as_deref().unwrap_or("-"));
            if !code.callouts.is_empty() {
                let _ = write!(label, " callouts={}", code.callouts.len());
            }
            if !code.annotations.is_empty() {
                let _ = write!(label, " annotations={}", code.annotations.len());
            }
            label
        }
        BlockKind::List(list) => format!(
            "list({}) items={}",
            if list.ordered { "ordered" } else { "bullet" },
            list.items.len()
        ),
        BlockKind::Table(table) => format!("table rows={}", table.rows.len()),
        BlockKind::Directive(directive) => match &directive.arguments {
            Some(arguments) => format!("directive {{{}}} {arguments}", directive.name),
            None => format!("directive {{{}}}", directive.name),
        },
    };
    let quotes = block
        .containers
        .iter()
        .map(|frame| match frame {
            ContainerFrame::BlockQuote { depth } => format!(" quote({depth})"),
        })
        .collect::<String>();

    let _ = write!(
        out,
        "{indent}{label}{quotes} {}..{}",
        block.span.start, block.span.end
    );
    if matches!(block.kind, BlockKind::Paragraph | BlockKind::Heading(_)) {
        let _ = write!(out, " {:?}", preview(doc.slice(block.content_span)));
    }
    out.push('\n');

    for child in block.children() {
        write_block(out, doc, child, depth + 1);
    }
}

fn preview(text: &str) -> String {
    let text = text.replace('\n', "\\n");
    if text.chars().count() <= PREVIEW_CHARS {
        return text;
    }
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::context::tests::test_context;
    use crate::parsing::parse_and_finalize;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_outline() {
        let ctx = test_context();
        let doc = parse_and_finalize(
            &ctx,
            "# Intro\n\n::::{note} Heads up\n:::{tip}\nNested.\n:::\n::::\n\n- a\n- b\n",
        );

        assert_eq!(
            outline(&doc),
            "heading(1) #intro 0..8 \"Intro\"\n\
             directive {note} Heads up 9..55\n\
             \x20 directive {tip} 29..50\n\
             \x20   paragraph 38..46 \"Nested.\"\n\
             list(bullet) items=2 56..64\n"
        );
    }

    #[test]
    fn long_paragraphs_are_cut() {
        let ctx = test_context();
        let doc = parse_and_finalize(&ctx, &"word ".repeat(20));

        insta::assert_snapshot!(outline(&doc).trim_end(), @r#"paragraph 0..100 "word word word word word word word word ...""#);
    }
}
