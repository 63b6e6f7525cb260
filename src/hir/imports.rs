//! Import validation.
//!
//! Checks every `use` statement of a document on its own terms, whether or
//! not the imported names are ever referenced. Target documents are read
//! straight from the document store, not from the symbol index, so a name
//! that exists but is not shared can be told apart from one that does not
//! exist at all.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::base::SOURCE_EXTENSION;
use crate::syntax::{TopLevelStatement, UseStatement, Visibility};

use super::{
    Diagnostic, DiagnosticCollector, Documents, ScopeError, SourceFile, check_cancelled,
    resolve_module_path,
};

/// What the target module has under an imported name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ImportStatus {
    Shared,
    NotShared,
    Missing,
}

pub struct ImportValidator<'a, D: ?Sized> {
    documents: &'a D,
    extension: &'a str,
}

impl<'a, D: Documents + ?Sized> ImportValidator<'a, D> {
    pub fn new(documents: &'a D) -> Self {
        Self {
            documents,
            extension: SOURCE_EXTENSION,
        }
    }

    pub fn with_extension(mut self, extension: &'a str) -> Self {
        self.extension = extension;
        self
    }

    /// Validate every `use` statement of `source`.
    ///
    /// In-memory documents have no module context and are never reported.
    pub fn validate(
        &self,
        source: &SourceFile,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, ScopeError> {
        source.root()?;
        let mut collector = DiagnosticCollector::new();
        if !source.uri().is_file() {
            return Ok(collector.finish());
        }

        for (_, stmt) in source.tree().use_statements() {
            check_cancelled(cancel)?;
            self.check_use_statement(source, stmt, &mut collector);
        }
        Ok(collector.finish())
    }

    fn check_use_statement(&self, source: &SourceFile, stmt: &UseStatement, collector: &mut DiagnosticCollector) {
        // A missing path is a parse error, reported elsewhere.
        let Some(path) = &stmt.module_path else {
            return;
        };

        let targets = resolve_module_path(self.documents, source.uri(), &path.text, self.extension);
        if targets.is_empty() {
            collector.unresolved_module_path(source.file(), path.range, &path.text);
            return;
        }

        for name in &stmt.imported_names {
            match import_status(&targets, &name.text) {
                ImportStatus::Shared => {}
                ImportStatus::NotShared => collector.import_not_shared(source.file(), name),
                ImportStatus::Missing => collector.import_not_exported(source.file(), name, &path.text),
            }
        }
    }
}

fn import_status(targets: &[Arc<SourceFile>], name: &str) -> ImportStatus {
    let mut status = ImportStatus::Missing;
    for target in targets {
        for statement in target.tree().top_level() {
            let (decl, visibility) = match statement {
                TopLevelStatement::Declaration(_, decl) => (decl, Visibility::Default),
                TopLevelStatement::VisibilityWrapper {
                    visibility,
                    declaration: Some((_, decl)),
                    ..
                } => (decl, visibility),
                TopLevelStatement::VisibilityWrapper { declaration: None, .. }
                | TopLevelStatement::Import(..)
                | TopLevelStatement::Injection(..) => continue,
            };
            if decl.name_text() != Some(name) {
                continue;
            }
            match visibility {
                Visibility::Share => return ImportStatus::Shared,
                Visibility::Default => status = ImportStatus::NotShared,
                // Invisible outside its own file.
                Visibility::File => {}
            }
        }
    }
    status
}
