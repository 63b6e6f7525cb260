//! Document store: the set of parsed documents in a workspace.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::base::{DocumentUri, FileId};
use super::SourceFile;

/// Read access to the documents of a workspace.
pub trait Documents {
    /// Every document, in a stable order.
    fn all_documents(&self) -> Vec<Arc<SourceFile>>;

    fn document(&self, uri: &DocumentUri) -> Option<Arc<SourceFile>>;
}

/// Assigns stable [`FileId`]s to URIs and holds the current parse of each
/// document.
///
/// A `FileId` survives re-parses and removal of its document, so a URI that
/// comes back gets its old id.
#[derive(Debug, Default)]
pub struct DocumentStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    uri_to_id: IndexMap<DocumentUri, FileId>,
    documents: IndexMap<FileId, Arc<SourceFile>>,
    next_id: u32,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the FileId for a URI.
    pub fn file_id(&self, uri: &DocumentUri) -> FileId {
        // Fast path: read lock
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.uri_to_id.get(uri) {
                return id;
            }
        }

        let mut inner = self.inner.write();
        if let Some(&id) = inner.uri_to_id.get(uri) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.uri_to_id.insert(uri.clone(), id);
        id
    }

    /// The FileId of a URI that currently has a document.
    pub fn lookup(&self, uri: &DocumentUri) -> Option<FileId> {
        let inner = self.inner.read();
        inner
            .uri_to_id
            .get(uri)
            .copied()
            .filter(|id| inner.documents.contains_key(id))
    }

    /// Parse `text` and store it as the document for `uri`, replacing any
    /// previous version.
    #[cfg(test)]
    pub(crate) fn set_text(&self, uri: &DocumentUri, text: impl Into<Arc<str>>) -> Arc<SourceFile> {
        let file = self.file_id(uri);
        self.insert(SourceFile::parse(file, uri.clone(), text))
    }

    /// Store a document built by the caller. Its id must come from [`DocumentStore::file_id`].
    pub fn insert(&self, source: SourceFile) -> Arc<SourceFile> {
        let source = Arc::new(source);
        self.inner
            .write()
            .documents
            .insert(source.file(), Arc::clone(&source));
        source
    }

    pub fn get(&self, file: FileId) -> Option<Arc<SourceFile>> {
        self.inner.read().documents.get(&file).cloned()
    }

    /// Drop the document for `uri`. Returns its id if there was one.
    pub fn remove(&self, uri: &DocumentUri) -> Option<FileId> {
        let mut inner = self.inner.write();
        let id = *inner.uri_to_id.get(uri)?;
        inner.documents.shift_remove(&id).map(|_| id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Documents for DocumentStore {
    fn all_documents(&self) -> Vec<Arc<SourceFile>> {
        self.inner.read().documents.values().cloned().collect()
    }

    fn document(&self, uri: &DocumentUri) -> Option<Arc<SourceFile>> {
        let inner = self.inner.read();
        let id = inner.uri_to_id.get(uri)?;
        inner.documents.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_assignment() {
        let store = DocumentStore::new();

        let id1 = store.file_id(&DocumentUri::file("/a.tao"));
        let id2 = store.file_id(&DocumentUri::file("/b.tao"));
        let id3 = store.file_id(&DocumentUri::file("/a.tao")); // same as id1

        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
    }

    #[test]
    fn test_reparse_replaces_document() {
        let store = DocumentStore::new();
        let uri = DocumentUri::file("/p/a.tao");

        let first = store.set_text(&uri, "view A {}");
        let second = store.set_text(&uri, "view B {}");

        assert_eq!(first.file(), second.file());
        assert_eq!(store.len(), 1);
        assert_eq!(store.document(&uri).unwrap().text(), "view B {}");
    }

    #[test]
    fn test_remove_keeps_id_stable() {
        let store = DocumentStore::new();
        let uri = DocumentUri::file("/p/a.tao");
        let id = store.set_text(&uri, "view A {}").file();

        assert_eq!(store.remove(&uri), Some(id));
        assert!(store.document(&uri).is_none());
        assert_eq!(store.lookup(&uri), None);
        assert_eq!(store.remove(&uri), None);

        assert_eq!(store.set_text(&uri, "view A {}").file(), id);
    }

    #[test]
    fn test_all_documents_in_insertion_order() {
        let store = DocumentStore::new();
        store.set_text(&DocumentUri::file("/p/b.tao"), "");
        store.set_text(&DocumentUri::file("/p/a.tao"), "");

        let paths: Vec<_> = store
            .all_documents()
            .iter()
            .map(|d| d.uri().path().to_owned())
            .collect();
        assert_eq!(paths, vec!["/p/b.tao", "/p/a.tao"]);
    }
}
