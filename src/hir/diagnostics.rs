//! Diagnostics: user-facing problems reported as data.
//!
//! Every check of the semantic layer accumulates [`Diagnostic`]s through a
//! [`DiagnosticCollector`] instead of failing, so one pass over a document
//! surfaces all of its independent problems.

use std::sync::Arc;

use text_size::TextRange;

use crate::base::FileId;
use crate::syntax::{Ident, ParseError, ParseErrorKind};

use super::SymbolKind;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: FileId,
    pub range: TextRange,
    pub severity: Severity,
    /// Error code (e.g., "E0101").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub file: FileId,
    pub range: TextRange,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn error(file: FileId, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            range,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn warning(file: FileId, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(file, range, message)
        }
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

pub mod codes {
    /// A reference matches no declaration in scope.
    pub const UNRESOLVED_REFERENCE: &str = "E0001";

    /// A `use` module path matches no document.
    pub const UNRESOLVED_MODULE_PATH: &str = "E0101";
    /// An imported name exists but is not marked `share`.
    pub const IMPORT_NOT_SHARED: &str = "E0102";
    /// An imported name does not exist in the target module.
    pub const IMPORT_NOT_EXPORTED: &str = "E0103";

    pub const APP_MISSING_UI: &str = "E0201";
    pub const APP_MULTIPLE_UI: &str = "E0202";
    pub const APP_UI_NOT_VIEW: &str = "E0203";

    pub const LEXER_ERROR: &str = "P0001";
    pub const PARSER_ERROR: &str = "P0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during semantic analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn parse_error(&mut self, file: FileId, error: &ParseError) {
        let code = match error.kind {
            ParseErrorKind::Lexical => codes::LEXER_ERROR,
            ParseErrorKind::Syntax => codes::PARSER_ERROR,
        };
        self.add(Diagnostic::error(file, error.range, error.message.as_str()).with_code(code));
    }

    pub fn unresolved_reference(&mut self, file: FileId, name: &Ident, expected: SymbolKind) {
        self.add(
            Diagnostic::error(
                file,
                name.range,
                format!(
                    "Could not resolve reference to {} named '{}'.",
                    expected.display(),
                    name.text
                ),
            )
            .with_code(codes::UNRESOLVED_REFERENCE),
        );
    }

    pub fn unresolved_module_path(&mut self, file: FileId, range: TextRange, path: &str) {
        self.add(
            Diagnostic::error(file, range, format!("Cannot resolve module path '{path}'"))
                .with_code(codes::UNRESOLVED_MODULE_PATH),
        );
    }

    pub fn import_not_shared(&mut self, file: FileId, name: &Ident) {
        self.add(
            Diagnostic::error(
                file,
                name.range,
                format!(
                    "'{}' must be marked with 'share' to be used from here (outside of its module).",
                    name.text
                ),
            )
            .with_code(codes::IMPORT_NOT_SHARED),
        );
    }

    pub fn import_not_exported(&mut self, file: FileId, name: &Ident, path: &str) {
        self.add(
            Diagnostic::error(file, name.range, format!("'{}' is not exported from '{path}'", name.text))
                .with_code(codes::IMPORT_NOT_EXPORTED),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn diagnostics_for_file(&self, file: FileId) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.file == file).collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
