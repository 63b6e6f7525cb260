//! AnalysisHost and Analysis: the entry points for tools built on the crate.
//!
//! `AnalysisHost` owns the mutable workspace state: documents, the global
//! symbol index and per-document local symbols. Every edit goes through it
//! and replaces one document's entries as a whole. `Analysis` is a read-only
//! snapshot used to answer queries.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use text_size::TextSize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::base::{AnalysisConfig, DocumentUri, FileId, ValidationStage};
use crate::hir::{
    Diagnostic, DiagnosticCollector, DocumentStore, ImportValidator, LocalSymbols, Linked, Linker,
    ReferenceContext, ResolveResult, Scope, ScopeError, ScopeProvider, SourceFile, SymbolIndex,
    SymbolKind, check_apps, compute_exports, compute_local_symbols,
};
use crate::syntax::{NodeId, Parse, ParseErrorKind};

use super::{CompletionItem, DocumentLink, GotoTarget, completions, document_links, goto_definition};

/// Owns the workspace and applies changes to it.
#[derive(Debug, Default)]
pub struct AnalysisHost {
    config: AnalysisConfig,
    documents: DocumentStore,
    index: SymbolIndex,
    locals: FxHashMap<FileId, Arc<LocalSymbols>>,
    cancel: CancellationToken,
}

impl AnalysisHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }

    /// Token observed by every analysis started from this host. Cancelled
    /// whenever the workspace changes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Parse `text` as the new content of `uri` and index it.
    pub fn set_file(&mut self, uri: DocumentUri, text: impl Into<Arc<str>>) -> Result<FileId, ScopeError> {
        let file = self.documents.file_id(&uri);
        let source = SourceFile::parse(file, uri, text);
        self.apply(source)
    }

    /// Index a parse that was computed elsewhere (e.g. in parallel).
    pub fn set_parsed(&mut self, uri: DocumentUri, text: Arc<str>, parse: Parse) -> Result<FileId, ScopeError> {
        let file = self.documents.file_id(&uri);
        self.apply(SourceFile::from_parse(file, uri, text, parse))
    }

    /// Add an in-memory document. It sees only its own declarations.
    pub fn parse_string(&mut self, text: &str) -> Result<FileId, ScopeError> {
        self.set_file(DocumentUri::for_string(text), text)
    }

    pub fn remove_file(&mut self, uri: &DocumentUri) -> Option<FileId> {
        self.invalidate();
        let file = self.documents.remove(uri)?;
        self.index.remove_file(file);
        self.locals.remove(&file);
        debug!(file = %uri, "[INDEX] document removed");
        Some(file)
    }

    pub fn file_id(&self, uri: &DocumentUri) -> Option<FileId> {
        self.documents.lookup(uri)
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    /// A read-only view for queries.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis { host: self }
    }

    /// Compute the symbol sets of `source`, then publish document and symbols
    /// together. Nothing changes if the computation fails.
    fn apply(&mut self, source: SourceFile) -> Result<FileId, ScopeError> {
        self.invalidate();
        let token = self.cancel.clone();
        let exports = compute_exports(&source, &token)?;
        let locals = compute_local_symbols(&source, &token)?;

        let file = source.file();
        debug!(
            file = %source.uri(),
            exports = exports.len(),
            locals = locals.len(),
            "[INDEX] document indexed"
        );
        self.documents.insert(source);
        self.index.add_file(file, exports);
        self.locals.insert(file, Arc::new(locals));
        Ok(file)
    }

    fn invalidate(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
    }
}

/// Read-only snapshot of an [`AnalysisHost`].
#[derive(Clone, Copy, Debug)]
pub struct Analysis<'a> {
    host: &'a AnalysisHost,
}

impl<'a> Analysis<'a> {
    pub fn source(&self, file: FileId) -> Result<Arc<SourceFile>, ScopeError> {
        self.host
            .documents
            .get(file)
            .ok_or(ScopeError::UnknownFile { file })
    }

    pub fn local_symbols(&self, file: FileId) -> Result<Arc<LocalSymbols>, ScopeError> {
        self.host
            .locals
            .get(&file)
            .cloned()
            .ok_or(ScopeError::UnknownFile { file })
    }

    pub fn scope_provider(&self) -> ScopeProvider<'a, DocumentStore, SymbolIndex> {
        ScopeProvider::new(&self.host.documents, &self.host.index)
            .with_extension(&self.host.config.source_extension)
    }

    fn token(&self) -> CancellationToken {
        self.host.cancel.clone()
    }

    /// Diagnostics of `file` up to the configured validation stage.
    pub fn diagnostics(&self, file: FileId) -> Result<Vec<Diagnostic>, ScopeError> {
        let config = &self.host.config;
        let source = self.source(file)?;
        let mut collector = DiagnosticCollector::new();

        for error in source.parse_errors() {
            let stage = match error.kind {
                ParseErrorKind::Lexical => ValidationStage::Lexing,
                ParseErrorKind::Syntax => ValidationStage::Parsing,
            };
            if config.reports(stage) {
                collector.parse_error(file, error);
            }
        }

        if config.reports(ValidationStage::Linking) {
            let linked = self.link(file)?;
            collector.extend(linked.diagnostics.iter().cloned());

            if config.reports(ValidationStage::All) {
                collector.extend(self.validate_imports(file)?);
                collector.extend(check_apps(&source, &linked)?);
            }
        }

        Ok(collector.finish())
    }

    pub fn validate_imports(&self, file: FileId) -> Result<Vec<Diagnostic>, ScopeError> {
        let source = self.source(file)?;
        ImportValidator::new(&self.host.documents)
            .with_extension(&self.host.config.source_extension)
            .validate(&source, &self.token())
    }

    /// Resolve every reference of `file`.
    pub fn link(&self, file: FileId) -> Result<Linked, ScopeError> {
        let source = self.source(file)?;
        let locals = self.local_symbols(file)?;
        Linker::new(self.scope_provider()).link(&source, &locals, &self.token())
    }

    /// The view scope chain visible at `node`.
    pub fn scope_at(&self, file: FileId, node: NodeId) -> Result<Scope, ScopeError> {
        let source = self.source(file)?;
        let locals = self.local_symbols(file)?;
        self.scope_provider().scope(&ReferenceContext {
            source: &source,
            locals: &locals,
            node,
            expected: SymbolKind::View,
        })
    }

    /// Resolve the reference held by `node` (a `ui` statement or a render).
    pub fn resolve_reference(&self, file: FileId, node: NodeId) -> Result<ResolveResult, ScopeError> {
        let source = self.source(file)?;
        let locals = self.local_symbols(file)?;
        let Some(reference) = source.tree().references().find(|r| r.container == node) else {
            return Ok(ResolveResult::NotFound);
        };
        self.scope_provider().resolve(
            &ReferenceContext {
                source: &source,
                locals: &locals,
                node,
                expected: SymbolKind::View,
            },
            &reference.name.text,
        )
    }

    pub fn goto_definition(&self, file: FileId, offset: TextSize) -> Result<Option<GotoTarget>, ScopeError> {
        let source = self.source(file)?;
        let locals = self.local_symbols(file)?;
        goto_definition(&self.scope_provider(), &self.host.documents, &source, &locals, offset)
    }

    pub fn completions(&self, file: FileId, offset: TextSize) -> Result<Vec<CompletionItem>, ScopeError> {
        let source = self.source(file)?;
        let locals = self.local_symbols(file)?;
        completions(&self.scope_provider(), &self.host.documents, &source, &locals, offset)
    }

    pub fn document_links(&self, file: FileId) -> Result<Vec<DocumentLink>, ScopeError> {
        let source = self.source(file)?;
        Ok(document_links(
            &self.host.documents,
            &source,
            &self.host.config.source_extension,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::codes;

    #[test]
    fn test_set_file_indexes_exports() {
        let mut host = AnalysisHost::new();
        let file = host
            .set_file(DocumentUri::file("/p/a.tao"), "share view A {} file view B {}")
            .unwrap();

        assert_eq!(host.index().symbols_in_file(file).len(), 1);
        assert_eq!(host.analysis().local_symbols(file).unwrap().len(), 2);
    }

    #[test]
    fn test_reparse_replaces_index_entries() {
        let mut host = AnalysisHost::new();
        let uri = DocumentUri::file("/p/a.tao");
        let first = host.set_file(uri.clone(), "view Old {}").unwrap();
        let second = host.set_file(uri, "view New {}").unwrap();

        assert_eq!(first, second);
        let names: Vec<_> = host.index().symbols_in_file(second).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["New"]);
        assert_eq!(host.index().len(), 1);
    }

    #[test]
    fn test_remove_file() {
        let mut host = AnalysisHost::new();
        let uri = DocumentUri::file("/p/a.tao");
        let file = host.set_file(uri.clone(), "view A {}").unwrap();

        assert_eq!(host.remove_file(&uri), Some(file));
        assert!(host.index().is_empty());
        assert_eq!(
            host.analysis().diagnostics(file),
            Err(ScopeError::UnknownFile { file })
        );
    }

    #[test]
    fn test_edit_cancels_outstanding_token() {
        let mut host = AnalysisHost::new();
        let token = host.cancellation_token();
        host.set_file(DocumentUri::file("/p/a.tao"), "view A {}").unwrap();
        assert!(token.is_cancelled());
        assert!(!host.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_diagnostics_respect_validation_stage() {
        let text = "app Main { ui Missing } view @ { }";
        let count = |stage| {
            let mut host = AnalysisHost::with_config(AnalysisConfig::new().with_validation(stage));
            let file = host.set_file(DocumentUri::file("/p/a.tao"), text).unwrap();
            host.analysis().diagnostics(file).unwrap()
        };

        let lexing = count(ValidationStage::Lexing);
        assert_eq!(lexing.len(), 1);
        assert_eq!(lexing[0].code(), Some(codes::LEXER_ERROR));

        let parsing = count(ValidationStage::Parsing);
        assert!(parsing.iter().any(|d| d.code() == Some(codes::PARSER_ERROR)));
        assert!(parsing.iter().all(|d| d.code() != Some(codes::UNRESOLVED_REFERENCE)));

        let linking = count(ValidationStage::Linking);
        assert!(linking.iter().any(|d| d.code() == Some(codes::UNRESOLVED_REFERENCE)));
        assert!(linking.iter().all(|d| d.code() != Some(codes::APP_UI_NOT_VIEW)));

        let all = count(ValidationStage::All);
        assert!(all.iter().any(|d| d.code() == Some(codes::APP_UI_NOT_VIEW)));
    }

    #[test]
    fn test_parse_string_is_isolated() {
        let mut host = AnalysisHost::new();
        host.set_file(DocumentUri::file("/p/ui/a.tao"), "share view Button {}").unwrap();
        let file = host.parse_string("use ./ui Button\nview Main { Button }").unwrap();

        let diags = host.analysis().diagnostics(file).unwrap();
        let found: Vec<_> = diags.iter().filter_map(|d| d.code()).collect();
        assert_eq!(found, vec![codes::UNRESOLVED_REFERENCE]);
    }

    #[test]
    fn test_resolve_reference_by_node() {
        let mut host = AnalysisHost::new();
        let file = host
            .set_file(DocumentUri::file("/p/a.tao"), "view Main { Child } view Child {}")
            .unwrap();
        let analysis = host.analysis();
        let source = analysis.source(file).unwrap();
        let node = source.tree().references().next().unwrap().container;

        let result = analysis.resolve_reference(file, node).unwrap();
        assert_eq!(result.entry().map(|e| e.name.as_str()), Some("Child"));

        let root = source.tree().root().unwrap();
        assert_eq!(analysis.resolve_reference(file, root).unwrap(), ResolveResult::NotFound);
    }
}
