use docsmith_config::Config;
use docsmith_engine::{BuildError, BuildSession, Severity};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn load(dir: &Path) -> Config {
    Config::load_or_default(dir).unwrap()
}

#[test]
fn config_file_drives_the_build() {
    let docs = tempfile::tempdir().unwrap();
    write(
        &docs,
        "docsmith.toml",
        "docs_path = \".\"\nexclude = [\"drafts/**\"]\nmax_workers = 2\n\n[cross_links]\nkibana = \"https://docs.example.com/kibana\"\n",
    );
    write(&docs, "index.md", "# Home\n\nSee [setup](kibana://setup.md).\n");
    write(&docs, "guide/install.md", ":::{note}\nUse {icon}`nope`.\n:::\n");
    write(&docs, "drafts/wip.md", ":::{bogus}\n:::\n");
    let mut config = load(docs.path());
    config.docs_path = docs.path().to_path_buf();

    let output = BuildSession::new(config).build().unwrap();

    let files: Vec<_> = output.documents.iter().map(|d| d.file.as_str()).collect();
    assert_eq!(files, vec!["guide/install.md", "index.md"]);
    assert_eq!(output.summary.errors, 1);
    assert_eq!(output.summary.exit_code(false), 1);
}

#[test]
fn strict_builds_fail_on_warnings() {
    let docs = tempfile::tempdir().unwrap();
    write(&docs, "page.md", ":::{applies-item} stack: ga\nLoose item.\n:::\n");

    let session = BuildSession::new(Config::new(docs.path()));
    let output = session.build().unwrap();

    assert_eq!(output.summary.errors, 0);
    assert_eq!(output.summary.warnings, 1);
    assert_eq!(output.summary.exit_code(false), 0);
    assert_eq!(output.summary.exit_code(true), 1);
}

#[test]
fn diagnostics_keep_emission_order_per_file() {
    let docs = tempfile::tempdir().unwrap();
    write(
        &docs,
        "page.md",
        "{icon}`one`\n\n{icon}`two`\n\n{icon}`three`\n",
    );
    for n in 0..8 {
        write(&docs, &format!("other-{n}.md"), "{icon}`x`\n");
    }

    let session = BuildSession::new(Config::new(docs.path()));
    session.build().unwrap();

    let lines: Vec<usize> = session
        .collector()
        .for_file(relative_path::RelativePath::new("page.md"))
        .iter()
        .map(|d| d.line())
        .collect();
    assert_eq!(lines, vec![1, 3, 5]);
    assert_eq!(session.collector().count(Severity::Error), 11);
}

#[test]
fn missing_docs_dir_is_an_error() {
    let session = BuildSession::new(Config::new("/this/path/does/not/exist"));

    let result = session.build();

    assert!(matches!(result, Err(BuildError::Io(_))));
}

#[test]
fn invalid_exclude_pattern_is_an_error() {
    let docs = tempfile::tempdir().unwrap();
    let mut config = Config::new(docs.path());
    config.exclude = vec!["[unclosed".to_string()];

    let result = BuildSession::new(config).build();

    assert!(matches!(result, Err(BuildError::Config(_))));
}
