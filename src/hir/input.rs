//! Parsed documents, the unit the semantic layer works on.

use std::sync::Arc;

use crate::base::{DocumentUri, FileId, LineIndex};
use crate::syntax::{NodeId, Parse, ParseError, SyntaxTree, TaoFile, parse};

use super::ScopeError;

/// One parsed source document.
///
/// Created on parse and replaced wholesale on re-parse; never mutated while
/// the semantic layer reads it.
#[derive(Clone, Debug)]
pub struct SourceFile {
    file: FileId,
    uri: DocumentUri,
    text: Arc<str>,
    line_index: LineIndex,
    tree: SyntaxTree,
    errors: Vec<ParseError>,
}

impl SourceFile {
    /// Parse `text` into a new document.
    pub fn parse(file: FileId, uri: DocumentUri, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let parsed = parse(&text);
        Self::from_parse(file, uri, text, parsed)
    }

    /// Wrap an already computed parse of `text`.
    pub fn from_parse(file: FileId, uri: DocumentUri, text: Arc<str>, parse: Parse) -> Self {
        Self {
            file,
            uri,
            line_index: LineIndex::new(&text),
            text,
            tree: parse.tree,
            errors: parse.errors,
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn uri(&self) -> &DocumentUri {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn parse_errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The file root, or [`ScopeError::MissingRoot`] if the tree has none.
    pub fn root(&self) -> Result<(NodeId, &TaoFile), ScopeError> {
        self.tree.file_root().ok_or_else(|| ScopeError::MissingRoot {
            uri: self.uri.clone(),
        })
    }

    /// A copy of this document whose tree has no root. Only useful to exercise
    /// the internal-error paths.
    #[cfg(test)]
    pub(crate) fn without_root(&self) -> Self {
        Self {
            tree: SyntaxTree::empty(),
            ..self.clone()
        }
    }
}
