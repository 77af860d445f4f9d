//! # Build Session
//!
//! Parses a set of files against one configuration and one diagnostics
//! collector. Files are independent: workers pull the next file index from
//! an atomic counter, and the only state they share is the collector, the
//! hint registry and the read-only registries and resolvers.

use docsmith_config::{Config, ConfigError};
use relative_path::{RelativePath, RelativePathBuf};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::diagnostics::{DiagnosticsCollector, HintRegistry, Severity};
use crate::io::{self, IoError};
use crate::links::{Resolvers, StaticCrossLinkResolver};
use crate::parsing::{Extensions, ParseContext, ParsedDoc, parse_and_finalize, parse_document};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read {file}: {source}")]
    Read {
        file: RelativePathBuf,
        #[source]
        source: IoError,
    },
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Stops a running build between files.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BuildSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub hints: usize,
    pub cancelled: bool,
}

impl BuildSummary {
    /// 0 when clean, 1 on errors, or on warnings when `strict`.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.errors > 0 || (strict && self.warnings > 0) {
            1
        } else {
            0
        }
    }
}

#[derive(Debug)]
pub struct BuildOutput {
    /// Parsed documents in input order. Files after a cancellation are absent.
    pub documents: Vec<ParsedDoc>,
    pub summary: BuildSummary,
}

/// Owns everything shared by the file parses of one build.
///
/// Create one session per build; the collector and the hint registry are
/// dropped with it.
pub struct BuildSession {
    config: Arc<Config>,
    collector: Arc<DiagnosticsCollector>,
    hints: Arc<HintRegistry>,
    extensions: Arc<Extensions>,
    resolvers: Resolvers,
    cancellation: CancellationToken,
}

impl BuildSession {
    pub fn new(config: Config) -> Self {
        let resolvers = if config.cross_links.is_empty() {
            Resolvers::default()
        } else {
            Resolvers {
                cross_links: Some(Arc::new(StaticCrossLinkResolver::from_config(&config))),
                legacy: None,
            }
        };
        Self {
            config: Arc::new(config),
            collector: Arc::new(DiagnosticsCollector::new()),
            hints: Arc::new(HintRegistry::new()),
            extensions: Arc::new(Extensions::default()),
            resolvers,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = Arc::new(extensions);
        self
    }

    pub fn with_resolvers(mut self, resolvers: Resolvers) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn collector(&self) -> &DiagnosticsCollector {
        &self.collector
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    fn context(&self, file: &RelativePath) -> ParseContext {
        ParseContext::new(file, Arc::clone(&self.config), Arc::clone(&self.collector))
            .with_hints(Arc::clone(&self.hints))
            .with_extensions(Arc::clone(&self.extensions))
            .with_resolvers(self.resolvers.clone())
    }

    /// Full parse and finalize of in-memory source.
    pub fn parse_str(&self, file: &RelativePath, source: &str) -> ParsedDoc {
        parse_and_finalize(&self.context(file), source)
    }

    /// Parse for live preview: no finalize, no diagnostics.
    pub fn preview_str(&self, file: &RelativePath, source: &str) -> ParsedDoc {
        parse_document(&self.context(file).with_skip_validation(true), source)
    }

    /// Parses every markdown file under the configured docs path.
    pub fn build(&self) -> Result<BuildOutput, BuildError> {
        self.config.exclude_patterns()?;
        let files = io::scan_markdown_files(&self.config.docs_path, &self.config)?;
        self.build_files(&files)
    }

    /// Parses `files`, relative to the docs path, on the worker pool.
    pub fn build_files(&self, files: &[RelativePathBuf]) -> Result<BuildOutput, BuildError> {
        let workers = self.config.worker_count().min(files.len()).max(1);
        log::info!(
            "Building {} files from {} with {workers} workers",
            files.len(),
            self.config.docs_path.display()
        );

        let next = AtomicUsize::new(0);
        let results: Mutex<Vec<(usize, Result<ParsedDoc, BuildError>)>> =
            Mutex::new(Vec::with_capacity(files.len()));

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    loop {
                        if self.cancellation.is_cancelled() {
                            break;
                        }
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(file) = files.get(index) else {
                            break;
                        };
                        let result = self.build_file(file);
                        if result.is_err() {
                            self.cancellation.cancel();
                        }
                        results
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push((index, result));
                    }
                });
            }
        });

        let mut results = results.into_inner().unwrap_or_else(PoisonError::into_inner);
        results.sort_by_key(|(index, _)| *index);

        let mut documents = Vec::with_capacity(results.len());
        for (_, result) in results {
            documents.push(result?);
        }

        let summary = BuildSummary {
            files: documents.len(),
            errors: self.collector.count(Severity::Error),
            warnings: self.collector.count(Severity::Warning),
            hints: self.collector.count(Severity::Hint),
            cancelled: documents.len() < files.len(),
        };
        log::info!(
            "Built {} files: {} errors, {} warnings, {} hints{}",
            summary.files,
            summary.errors,
            summary.warnings,
            summary.hints,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        Ok(BuildOutput { documents, summary })
    }

    fn build_file(&self, file: &RelativePath) -> Result<ParsedDoc, BuildError> {
        log::debug!("Parsing {file}");
        let source = io::read_file(file, &self.config.docs_path).map_err(|source| {
            BuildError::Read {
                file: file.to_relative_path_buf(),
                source,
            }
        })?;
        Ok(self.parse_str(file, &source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_docs_dir, create_test_file};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, false, 0)]
    #[case(0, 3, false, 0)]
    #[case(0, 3, true, 1)]
    #[case(2, 0, false, 1)]
    fn exit_codes(
        #[case] errors: usize,
        #[case] warnings: usize,
        #[case] strict: bool,
        #[case] expected: i32,
    ) {
        let summary = BuildSummary {
            errors,
            warnings,
            ..BuildSummary::default()
        };
        assert_eq!(summary.exit_code(strict), expected);
    }

    #[test]
    fn preview_drops_diagnostics() {
        let session = BuildSession::new(Config::new("."));
        let doc = session.preview_str(RelativePath::new("page.md"), "{icon}`nope`\n");

        assert!(!doc.finalized);
        assert!(session.collector().is_empty());
    }

    #[test]
    fn build_keeps_input_order() {
        let docs_dir = create_test_docs_dir();
        for name in ["a.md", "b.md", "c.md", "d.md", "e.md"] {
            create_test_file(&docs_dir, name, &format!("# {name}\n"));
        }
        let mut config = Config::new(docs_dir.path());
        config.max_workers = Some(3);
        let session = BuildSession::new(config);

        let output = session.build().unwrap();

        let files: Vec<_> = output.documents.iter().map(|d| d.file.as_str()).collect();
        assert_eq!(files, vec!["a.md", "b.md", "c.md", "d.md", "e.md"]);
        assert_eq!(output.summary.files, 5);
        assert!(!output.summary.cancelled);
    }

    #[test]
    fn cancelled_before_start_parses_nothing() {
        let docs_dir = create_test_docs_dir();
        create_test_file(&docs_dir, "a.md", "text\n");
        let session = BuildSession::new(Config::new(docs_dir.path()));
        session.cancellation().cancel();

        let output = session.build().unwrap();

        assert!(output.documents.is_empty());
        assert!(output.summary.cancelled);
    }

    #[test]
    fn unreadable_file_is_a_build_error() {
        let docs_dir = create_test_docs_dir();
        let session = BuildSession::new(Config::new(docs_dir.path()));

        let result = session.build_files(&[RelativePathBuf::from("missing.md")]);

        assert!(matches!(result, Err(BuildError::Read { .. })));
    }
}
