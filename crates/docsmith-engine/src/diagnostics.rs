//! Structured findings produced while parsing and validating documents.
//!
//! Every parser stage reports through a [`DiagnosticsCollector`] shared by the
//! whole build. Content problems never abort a build; they end up here.

use relative_path::{RelativePath, RelativePathBuf};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::parsing::rope::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Content will render incorrectly or a contract is violated.
    Error,
    /// Content renders but is discouraged.
    Warning,
    /// Cosmetic and auto-fixable.
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: RelativePathBuf,
    pub span: SourceSpan,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        file: &RelativePath,
        span: SourceSpan,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            file: file.to_relative_path_buf(),
            span,
            message: message.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.span.start.line
    }

    pub fn column(&self) -> usize {
        self.span.start.column
    }

    pub fn length(&self) -> usize {
        self.span.char_len()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.file,
            self.line(),
            self.column(),
            self.severity,
            self.message
        )
    }
}

/// Thread-safe sink for diagnostics from every file parse in a build.
///
/// Writers from different files interleave freely; diagnostics from one file
/// keep their emission order. Create a new collector per build.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Mutex<Vec<Diagnostic>>,
    errors: AtomicUsize,
    warnings: AtomicUsize,
    hints: AtomicUsize,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, diagnostic: Diagnostic) {
        self.counter(diagnostic.severity)
            .fetch_add(1, Ordering::Relaxed);
        log::debug!("{diagnostic}");
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counter(severity).load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        Severity::ALL.iter().all(|s| self.count(*s) == 0)
    }

    /// Snapshot of everything collected so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Diagnostics for one file, in emission order.
    pub fn for_file(&self, file: &RelativePath) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.file.as_relative_path() == file)
            .cloned()
            .collect()
    }

    fn counter(&self, severity: Severity) -> &AtomicUsize {
        match severity {
            Severity::Error => &self.errors,
            Severity::Warning => &self.warnings,
            Severity::Hint => &self.hints,
        }
    }
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Hint];
}

/// Files that already received a once-per-file hint.
///
/// Owned by the build session and dropped with it, so repeated builds in a
/// long-lived process start clean.
#[derive(Debug, Default)]
pub struct HintRegistry {
    hinted: Mutex<HashSet<RelativePathBuf>>,
}

impl HintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `file` and returns true if this is the first call for it.
    pub fn first_for(&self, file: &RelativePath) -> bool {
        self.hinted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.to_relative_path_buf())
    }

    pub fn contains(&self, file: &RelativePath) -> bool {
        self.hinted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::SourcePosition;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    fn at(line: usize, column: usize) -> SourceSpan {
        let start = SourcePosition {
            line,
            column,
            offset: 0,
        };
        let end = SourcePosition {
            column: column + 4,
            ..start
        };
        SourceSpan { start, end }
    }

    #[test]
    fn display_matches_report_format() {
        let d = Diagnostic::new(
            Severity::Warning,
            RelativePath::new("guide/index.md"),
            at(3, 5),
            "something odd",
        );

        assert_eq!(d.to_string(), "guide/index.md:3:5: warning: something odd");
        assert_eq!(d.length(), 4);
    }

    #[test]
    fn counts_by_severity() {
        let collector = DiagnosticsCollector::new();
        let file = RelativePath::new("a.md");
        collector.write(Diagnostic::new(Severity::Error, file, at(1, 1), "e"));
        collector.write(Diagnostic::new(Severity::Hint, file, at(2, 1), "h"));
        collector.write(Diagnostic::new(Severity::Hint, file, at(3, 1), "h"));

        assert_eq!(collector.count(Severity::Error), 1);
        assert_eq!(collector.count(Severity::Warning), 0);
        assert_eq!(collector.count(Severity::Hint), 2);
        assert!(!collector.is_empty());
    }

    #[test]
    fn concurrent_writers_keep_per_file_order() {
        let collector = Arc::new(DiagnosticsCollector::new());

        thread::scope(|scope| {
            for name in ["a.md", "b.md", "c.md", "d.md"] {
                let collector = Arc::clone(&collector);
                scope.spawn(move || {
                    let file = RelativePath::new(name);
                    for line in 1..=50 {
                        collector.write(Diagnostic::new(
                            Severity::Warning,
                            file,
                            at(line, 1),
                            format!("{name} {line}"),
                        ));
                    }
                });
            }
        });

        assert_eq!(collector.count(Severity::Warning), 200);
        let lines: Vec<usize> = collector
            .for_file(RelativePath::new("c.md"))
            .iter()
            .map(Diagnostic::line)
            .collect();
        assert_eq!(lines, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn hint_registry_is_check_and_insert() {
        let hints = HintRegistry::new();
        let file = RelativePath::new("page.md");

        assert!(!hints.contains(file));
        assert!(hints.first_for(file));
        assert!(!hints.first_for(file));
        assert!(hints.contains(file));
        assert!(hints.first_for(RelativePath::new("other.md")));
    }
}
