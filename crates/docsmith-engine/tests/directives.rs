use docsmith_config::Config;
use docsmith_engine::parsing::blocks::BlockKind;
use docsmith_engine::parsing::directives::{DirectiveKind, HasTitle};
use docsmith_engine::parsing::inline::{InlineNode, render_plain};
use docsmith_engine::parsing::roles::RoleKind;
use docsmith_engine::parsing::{finalize_document, parse_document, snapshot};
use docsmith_engine::{BuildSession, DiagnosticsCollector, ParseContext, ParsedDoc, Severity};
use pretty_assertions::assert_eq;
use relative_path::RelativePath;
use rstest::rstest;
use std::sync::Arc;

fn parse(source: &str) -> (BuildSession, ParsedDoc) {
    let session = BuildSession::new(Config::new("."));
    let doc = session.parse_str(RelativePath::new("page.md"), source);
    snapshot::invariants(&doc);
    (session, doc)
}

fn context() -> ParseContext {
    ParseContext::new(
        RelativePath::new("page.md"),
        Arc::new(Config::new(".")),
        Arc::new(DiagnosticsCollector::new()),
    )
}

fn messages(session: &BuildSession) -> Vec<(Severity, String)> {
    session
        .collector()
        .diagnostics()
        .into_iter()
        .map(|d| (d.severity, d.message))
        .collect()
}

#[test]
fn fences_carry_name_and_every_property() {
    let (session, doc) = parse(":::{note} Heads up\n:class: wide\n:name: first-note\nBody\n:::\n");

    let directive = doc.blocks[0].as_directive().unwrap();
    assert_eq!(directive.name, "note");
    assert_eq!(directive.properties.get(&["class"]), Some("wide"));
    assert_eq!(directive.properties.get(&["name"]), Some("first-note"));
    assert_eq!(directive.cross_reference_name.as_deref(), Some("first-note"));
    assert_eq!(messages(&session), vec![]);
}

#[rstest]
#[case("::::{note}\n:::\n::::\n", 1)]
#[case("::::{note}\n:::{tip}\nx\n:::\n::::\n", 1)]
#[case(":::{note}\n::::\nafter\n", 2)]
fn fence_lengths_decide_closing(#[case] source: &str, #[case] top_level: usize) {
    let (_, doc) = parse(source);

    assert_eq!(doc.blocks.len(), top_level);
}

#[test]
fn three_colons_inside_four_is_content() {
    let (_, doc) = parse("::::{note}\nExample:\n:::\nstill inside\n::::\n");

    let directive = doc.blocks[0].as_directive().unwrap();
    assert_eq!(directive.children.len(), 1);
    assert_eq!(
        doc.slice(directive.children[0].content_span),
        "Example:\n:::\nstill inside"
    );
}

#[test]
fn callout_list_of_matching_length_is_consumed() {
    let (session, doc) = parse("```sh\nrun <1>\nstop <2>\n```\n1. Run it\n2. Stop it\n");

    assert_eq!(messages(&session), vec![]);
    assert_eq!(doc.blocks.len(), 1);
    let code = doc.blocks[0].as_code().unwrap();
    assert_eq!(code.annotations.len(), 2);
}

#[test]
fn callout_list_of_other_length_stays() {
    let (session, doc) = parse("```sh\nrun <1>\nstop <2>\n```\n1. Run it\n");

    let found = messages(&session);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, Severity::Error);
    assert!(found[0].1.contains('2') && found[0].1.contains('1'));
    assert_eq!(doc.blocks[1].as_list().unwrap().items.len(), 1);
}

#[test]
fn sync_keys_ignore_value_order() {
    let (session, doc) = parse(
        "::::{applies-switch}\n:::{applies-item} stack: ga 9.1, preview 9.0\na\n:::\n::::\n\
         ::::{applies-switch}\n:::{applies-item} stack: preview 9.0, ga 9.1\nb\n:::\n::::\n",
    );

    let keys: Vec<String> = doc
        .blocks
        .iter()
        .map(|switch| match &switch.children()[0].as_directive().unwrap().kind {
            DirectiveKind::AppliesItem(item) => item.sync_key.clone(),
            other => panic!("expected an item, got {other:?}"),
        })
        .collect();
    assert_eq!(keys[0], keys[1]);
    assert_eq!(messages(&session), vec![]);
}

#[rstest]
#[case("| a | b |\n|---|---|\n", None, Some(vec![30.0, 70.0]))]
#[case("| a | b | c |\n|---|---|---|\n", Some("3"), None)]
fn table_widths(
    #[case] table: &str,
    #[case] error_mentions: Option<&str>,
    #[case] widths: Option<Vec<f64>>,
) {
    let (session, doc) = parse(&format!(":::{{table}}\n:widths: 30 70\n{table}:::\n"));

    let found = messages(&session);
    match error_mentions {
        Some(count) => {
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].0, Severity::Error);
            assert!(found[0].1.contains('2') && found[0].1.contains(count));
        }
        None => assert_eq!(found, vec![]),
    }
    let table = doc.blocks[0].children()[0].as_table().unwrap();
    assert_eq!(table.widths, widths);
}

#[test]
fn irregular_space_hints_once_per_file() {
    let source = "a\u{a0}b\u{a0}c\n\nd\u{a0}e\u{a0}f\u{a0}g\n";
    let (session, doc) = parse(source);

    assert_eq!(session.collector().count(Severity::Hint), 1);
    let rendered: Vec<String> = doc
        .blocks
        .iter()
        .map(|block| render_plain(&doc.source, &block.inlines))
        .collect();
    assert_eq!(rendered, vec!["a b c", "d e f g"]);
}

#[test]
fn irregular_space_hints_once_for_each_file() {
    let session = BuildSession::new(Config::new("."));

    session.parse_str(RelativePath::new("one.md"), "a\u{a0}b\n");
    session.parse_str(RelativePath::new("one.md"), "c\u{a0}d\n");
    session.parse_str(RelativePath::new("two.md"), "e\u{a0}f\n");

    assert_eq!(session.collector().count(Severity::Hint), 2);
}

#[rstest]
#[case("warning", true, 0)]
#[case("doesnotexist", false, 1)]
fn icon_roles(#[case] name: &str, #[case] has_svg: bool, #[case] errors: usize) {
    let (session, doc) = parse(&format!("Look {{icon}}`{name}` here\n"));

    let role = doc.blocks[0]
        .inlines
        .iter()
        .find_map(|node| match node {
            InlineNode::Role(role) => Some(role),
            _ => None,
        })
        .unwrap();
    assert_eq!(role.role, "icon");
    assert_eq!(role.content, name);
    assert_eq!(role.delimiter_count, 1);
    match &role.kind {
        RoleKind::Icon { svg, .. } => {
            assert_eq!(svg.is_some_and(|svg| !svg.is_empty()), has_svg)
        }
        other => panic!("expected an icon, got {other:?}"),
    }
    assert_eq!(session.collector().count(Severity::Error), errors);
}

#[test]
fn double_brace_is_a_substitution_not_a_role() {
    let source = "Use {{icon}}`warning` verbatim\n";
    let (session, doc) = parse(source);

    let inlines = &doc.blocks[0].inlines;
    assert!(inlines.iter().all(|node| !matches!(node, InlineNode::Role(_))));
    assert!(inlines.iter().any(|node| matches!(node, InlineNode::Substitution(_))));
    assert_eq!(render_plain(source, inlines), "Use {{icon}}warning verbatim");
    assert_eq!(
        messages(&session),
        vec![(Severity::Error, "Substitution key {icon} is undefined".to_string())]
    );
}

#[test]
fn substitutions_reach_text_code_and_switch_items() {
    let mut config = Config::new(".");
    config
        .substitutions
        .insert("version".to_string(), "9.1.2".to_string());
    let session = BuildSession::new(config);
    let source = "Get {{version|M.M}}\n\n\
                  ```sh subs=true\ncurl es/{{version}}\n```\n\n\
                  ::::{applies-switch}\n:::{applies-item} stack: ga {{version|M.M}}\nA\n:::\n::::\n";
    let doc = session.parse_str(RelativePath::new("page.md"), source);

    assert_eq!(messages(&session), vec![]);
    assert_eq!(render_plain(source, &doc.blocks[0].inlines), "Get 9.1");
    assert_eq!(doc.blocks[1].as_code().unwrap().lines, vec!["curl es/9.1.2"]);
    let item = doc.blocks[2].children()[0].as_directive().unwrap();
    assert_eq!(item.title(), Some("stack: ga 9.1"));
}

#[test]
fn huge_table_widths_do_not_abort_the_parse() {
    let (session, doc) = parse(
        ":::{table}\n:widths: 4000000000 4000000000\n| a | b |\n|---|---|\n:::\n",
    );

    assert_eq!(messages(&session), vec![]);
    let table = doc.blocks[0].children()[0].as_table().unwrap();
    assert_eq!(table.widths, Some(vec![50.0, 50.0]));
}

#[test]
fn unclosed_code_fence_ends_with_its_directive() {
    let (_, doc) = parse(":::{note}\n```\ncode\n:::\n\n# After\n\nMore text\n");

    let kinds: Vec<&str> = doc
        .blocks
        .iter()
        .map(|block| match &block.kind {
            BlockKind::Directive(_) => "directive",
            BlockKind::Heading(_) => "heading",
            BlockKind::Paragraph => "paragraph",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["directive", "heading", "paragraph"]);
    let code = doc.blocks[0].children()[0].as_code().unwrap();
    assert!(!code.closed);
    assert_eq!(code.lines, vec!["code"]);
}

#[test]
fn finalize_is_idempotent() {
    let session = BuildSession::new(Config::new("."));
    let source = ":::{dropdown}\n:::\n\n```sh\nrun <1>\n```\n\n- one\n- two\n";
    let mut doc = session.preview_str(RelativePath::new("page.md"), source);
    assert!(session.collector().is_empty());

    let ctx = context();
    finalize_document(&ctx, &mut doc);
    let once = (ctx.collector().diagnostics(), doc.blocks.clone());
    finalize_document(&ctx, &mut doc);

    assert_eq!(once.0.len(), 2);
    assert_eq!(ctx.collector().diagnostics(), once.0);
    assert_eq!(doc.blocks, once.1);
}

#[test]
fn unknown_directive_degrades_to_a_container() {
    let ctx = context();
    let doc = parse_document(&ctx, ":::{mystery} args\n:key: v\nStill *parsed*.\n:::\n");

    let directive = doc.blocks[0].as_directive().unwrap();
    assert!(matches!(directive.kind, DirectiveKind::Unknown));
    assert!(matches!(directive.children[0].kind, BlockKind::Paragraph));
    assert_eq!(ctx.collector().count(Severity::Error), 1);
}
