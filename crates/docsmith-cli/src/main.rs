use anyhow::{Context, Result};
use codespan_reporting::diagnostic::{Diagnostic as Report, Label, Severity as ReportSeverity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use docsmith_config::Config;
use docsmith_engine::{BuildSession, BuildSummary, Diagnostic, ParsedDoc, Severity};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::{env, fs, process};

#[derive(Debug, PartialEq)]
struct Args {
    docs_dir: PathBuf,
    strict: bool,
    report: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut docs_dir = None;
    let mut strict = false;
    let mut report = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--strict" => strict = true,
            "--report" => match iter.next() {
                Some(path) => report = Some(PathBuf::from(path)),
                None => return Err("--report needs a file path".to_string()),
            },
            flag if flag.starts_with("--") => return Err(format!("Unknown option {flag}")),
            path if docs_dir.is_none() => docs_dir = Some(PathBuf::from(path)),
            extra => return Err(format!("Unexpected argument {extra}")),
        }
    }

    Ok(Args {
        docs_dir: docs_dir.unwrap_or_else(|| PathBuf::from(".")),
        strict,
        report,
    })
}

#[derive(Debug, Serialize)]
struct BuildReport {
    summary: BuildSummary,
    diagnostics: Vec<ReportEntry>,
}

#[derive(Debug, Serialize)]
struct ReportEntry {
    file: String,
    line: usize,
    column: usize,
    length: usize,
    severity: Severity,
    message: String,
}

impl From<&Diagnostic> for ReportEntry {
    fn from(d: &Diagnostic) -> Self {
        Self {
            file: d.file.to_string(),
            line: d.line(),
            column: d.column(),
            length: d.length(),
            severity: d.severity,
            message: d.message.clone(),
        }
    }
}

fn report_severity(severity: Severity) -> ReportSeverity {
    match severity {
        Severity::Error => ReportSeverity::Error,
        Severity::Warning => ReportSeverity::Warning,
        Severity::Hint => ReportSeverity::Note,
    }
}

/// Diagnostics grouped by document, in build order.
fn ordered_diagnostics(session: &BuildSession, documents: &[ParsedDoc]) -> Vec<Diagnostic> {
    documents
        .iter()
        .flat_map(|doc| session.collector().for_file(&doc.file))
        .collect()
}

fn emit_diagnostics(documents: &[ParsedDoc], diagnostics: &[Diagnostic]) {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();

    let mut files = SimpleFiles::new();
    let ids: Vec<usize> = documents
        .iter()
        .map(|doc| files.add(doc.file.to_string(), doc.source.clone()))
        .collect();

    for d in diagnostics {
        let Some(file_id) = documents
            .iter()
            .position(|doc| doc.file == d.file)
            .map(|index| ids[index])
        else {
            eprintln!("{d}");
            continue;
        };
        let span = d.span.byte_span();
        let report = Report::new(report_severity(d.severity))
            .with_message(d.message.clone())
            .with_labels(vec![Label::primary(file_id, span.start..span.end)]);
        if let Err(e) = term::emit_to_write_style(&mut writer.lock(), &config, &files, &report) {
            log::warn!("Failed to render diagnostic: {e}");
            eprintln!("{d}");
        }
    }
}

fn write_report(path: &Path, summary: BuildSummary, diagnostics: &[Diagnostic]) -> Result<()> {
    let report = BuildReport {
        summary,
        diagnostics: diagnostics.iter().map(ReportEntry::from).collect(),
    };
    let content = toml::to_string(&report).context("Failed to serialize build report")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write build report to {}", path.display()))?;
    log::info!("Wrote build report to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let argv: Vec<String> = env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {} [DOCS_DIR] [--strict] [--report FILE]", argv[0]);
            process::exit(2);
        }
    };

    let mut config = Config::load_or_default(&args.docs_dir).with_context(|| {
        format!(
            "Failed to load config from {}",
            Config::config_path(&args.docs_dir).display()
        )
    })?;
    config.strict |= args.strict;
    let strict = config.strict;

    let session = BuildSession::new(config);
    let output = session.build().context("Build failed")?;

    let diagnostics = ordered_diagnostics(&session, &output.documents);
    emit_diagnostics(&output.documents, &diagnostics);

    let summary = output.summary;
    println!(
        "{} files: {} errors, {} warnings, {} hints{}",
        summary.files,
        summary.errors,
        summary.warnings,
        summary.hints,
        if summary.cancelled { " (cancelled)" } else { "" }
    );

    if let Some(path) = &args.report {
        write_report(path, summary, &diagnostics)?;
    }

    process::exit(summary.exit_code(strict));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relative_path::RelativePath;
    use rstest::rstest;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("docsmith")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults_to_current_directory() {
        let args = parse_args(&argv(&[])).unwrap();
        assert_eq!(
            args,
            Args {
                docs_dir: PathBuf::from("."),
                strict: false,
                report: None,
            }
        );
    }

    #[test]
    fn flags_in_any_order() {
        let args = parse_args(&argv(&["--report", "out.toml", "docs", "--strict"])).unwrap();
        assert_eq!(
            args,
            Args {
                docs_dir: PathBuf::from("docs"),
                strict: true,
                report: Some(PathBuf::from("out.toml")),
            }
        );
    }

    #[rstest]
    #[case(&["--report"])]
    #[case(&["--verbose"])]
    #[case(&["docs", "more-docs"])]
    fn bad_arguments(#[case] args: &[&str]) {
        assert!(parse_args(&argv(args)).is_err());
    }

    #[test]
    fn report_lists_diagnostics_in_order() {
        let session = BuildSession::new(Config::new("."));
        let doc = session.parse_str(RelativePath::new("page.md"), "Look {icon}`nope`\n");
        let documents = vec![doc];
        let diagnostics = ordered_diagnostics(&session, &documents);

        let report = BuildReport {
            summary: BuildSummary {
                files: 1,
                errors: 1,
                ..BuildSummary::default()
            },
            diagnostics: diagnostics.iter().map(ReportEntry::from).collect(),
        };
        let text = toml::to_string(&report).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert!(text.contains("[[diagnostics]]"));
        assert!(text.contains("file = \"page.md\""));
        assert!(text.contains("line = 1"));
        assert!(text.contains("severity = \"error\""));
    }
}
