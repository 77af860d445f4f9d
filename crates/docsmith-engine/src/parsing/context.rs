use docsmith_config::Config;
use relative_path::{RelativePath, RelativePathBuf};
use std::sync::Arc;

use crate::diagnostics::{Diagnostic, DiagnosticsCollector, HintRegistry, Severity};
use crate::links::Resolvers;
use crate::parsing::directives::DirectiveRegistry;
use crate::parsing::rope::SourceSpan;
use crate::parsing::roles::RoleRegistry;

/// Directive and role constructors installed into the parser.
#[derive(Default)]
pub struct Extensions {
    pub directives: DirectiveRegistry,
    pub roles: RoleRegistry,
}

/// Per-file parse state.
///
/// Exclusively owned by the parse of one file; the collector, hint registry,
/// extensions and resolvers behind it are shared by the whole build.
#[derive(Clone)]
pub struct ParseContext {
    pub file: RelativePathBuf,
    pub config: Arc<Config>,
    /// Set for preview parses: diagnostics are dropped, not queued.
    pub skip_validation: bool,
    collector: Arc<DiagnosticsCollector>,
    hints: Arc<HintRegistry>,
    extensions: Arc<Extensions>,
    resolvers: Resolvers,
}

impl ParseContext {
    pub fn new(
        file: &RelativePath,
        config: Arc<Config>,
        collector: Arc<DiagnosticsCollector>,
    ) -> Self {
        Self {
            file: file.to_relative_path_buf(),
            config,
            skip_validation: false,
            collector,
            hints: Arc::new(HintRegistry::new()),
            extensions: Arc::new(Extensions::default()),
            resolvers: Resolvers::default(),
        }
    }

    pub fn with_hints(mut self, hints: Arc<HintRegistry>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_extensions(mut self, extensions: Arc<Extensions>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_resolvers(mut self, resolvers: Resolvers) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn with_skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn resolvers(&self) -> &Resolvers {
        &self.resolvers
    }

    pub fn collector(&self) -> &Arc<DiagnosticsCollector> {
        &self.collector
    }

    pub fn hints(&self) -> &HintRegistry {
        &self.hints
    }

    pub fn emit(&self, severity: Severity, span: SourceSpan, message: impl Into<String>) {
        if self.skip_validation {
            return;
        }
        self.collector
            .write(Diagnostic::new(severity, &self.file, span, message));
    }

    pub fn error(&self, span: SourceSpan, message: impl Into<String>) {
        self.emit(Severity::Error, span, message);
    }

    pub fn warning(&self, span: SourceSpan, message: impl Into<String>) {
        self.emit(Severity::Warning, span, message);
    }

    pub fn hint(&self, span: SourceSpan, message: impl Into<String>) {
        self.emit(Severity::Hint, span, message);
    }

    /// Emits a hint only for the first call in this file across the build.
    pub fn hint_once(&self, span: SourceSpan, message: impl Into<String>) {
        if self.skip_validation {
            return;
        }
        if self.hints.first_for(&self.file) {
            self.hint(span, message);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_context() -> ParseContext {
        ParseContext::new(
            RelativePath::new("test.md"),
            Arc::new(Config::new(".")),
            Arc::new(DiagnosticsCollector::new()),
        )
    }

    #[test]
    fn skip_validation_drops_diagnostics() {
        let ctx = test_context().with_skip_validation(true);
        ctx.error(SourceSpan::default(), "dropped");
        ctx.hint_once(SourceSpan::default(), "dropped");

        assert!(ctx.collector().is_empty());
        assert!(!ctx.hints().contains(RelativePath::new("test.md")));
    }

    #[test]
    fn diagnostics_carry_the_file() {
        let ctx = test_context();
        ctx.warning(SourceSpan::default(), "careful");

        let diagnostics = ctx.collector().diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].file.as_str(), "test.md");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn hint_once_is_shared_across_contexts_for_one_file() {
        let hints = Arc::new(HintRegistry::new());
        let first = test_context().with_hints(Arc::clone(&hints));
        let second = test_context().with_hints(hints);

        first.hint_once(SourceSpan::default(), "irregular");
        second.hint_once(SourceSpan::default(), "irregular");

        assert_eq!(first.collector().count(Severity::Hint), 1);
        assert_eq!(second.collector().count(Severity::Hint), 0);
    }
}
