use docsmith_config::Config;
use docsmith_engine::parsing::blocks::{BlockKind, BlockNode};
use docsmith_engine::parsing::snapshot;
use docsmith_engine::{BuildSession, Severity};
use pretty_assertions::assert_eq;
use relative_path::RelativePath;
use rstest::rstest;

fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

#[rstest]
#[case("admonitions", 0, 0, 0)]
#[case("applies", 0, 0, 0)]
#[case("callouts", 0, 0, 0)]
#[case("tables", 0, 0, 0)]
#[case("problems", 5, 0, 1)]
fn fixture_diagnostics(
    #[case] name: &str,
    #[case] errors: usize,
    #[case] warnings: usize,
    #[case] hints: usize,
) {
    let md = std::fs::read_to_string(format!("{}/{name}.md", fixtures_dir())).unwrap();
    let session = BuildSession::new(Config::new(fixtures_dir()));

    let doc = session.parse_str(RelativePath::new(&format!("{name}.md")), &md);
    snapshot::invariants(&doc);

    let collector = session.collector();
    let found = (
        collector.count(Severity::Error),
        collector.count(Severity::Warning),
        collector.count(Severity::Hint),
    );
    assert_eq!(
        found,
        (errors, warnings, hints),
        "{:#?}",
        collector.diagnostics()
    );
}

#[test]
fn fixture_tree_shape() {
    let md = std::fs::read_to_string(format!("{}/admonitions.md", fixtures_dir())).unwrap();
    let session = BuildSession::new(Config::new(fixtures_dir()));

    let doc = session.parse_str(RelativePath::new("admonitions.md"), &md);

    let mut labels = Vec::new();
    doc.walk(&mut |block: &BlockNode| {
        labels.push(match &block.kind {
            BlockKind::Directive(directive) => directive.name.clone(),
            BlockKind::Heading(_) => "heading".to_string(),
            BlockKind::Paragraph => "paragraph".to_string(),
            other => format!("{other:?}"),
        })
    });
    assert_eq!(
        labels,
        vec![
            "heading", "note", "paragraph", "dropdown", "paragraph", "warning", "paragraph", "tip",
            "paragraph"
        ]
    );
}

#[test]
fn whole_fixture_folder_builds() {
    let session = BuildSession::new(Config::new(fixtures_dir()));

    let output = session.build().unwrap();

    assert_eq!(output.summary.files, 5);
    assert_eq!(output.summary.errors, 5);
    assert_eq!(output.summary.hints, 1);
    assert_eq!(output.summary.exit_code(false), 1);
    for doc in &output.documents {
        snapshot::invariants(doc);
    }
}
