//! Document links: clickable names in `use` statements.

use std::borrow::Cow;
use std::sync::Arc;

use text_size::TextRange;

use crate::base::{DocumentUri, FileId};
use crate::hir::{Documents, SourceFile, resolve_module_path};
use crate::syntax::{TopLevelStatement, Visibility};

/// A document link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    /// The span of the link in the source file.
    pub range: TextRange,
    pub target_file: FileId,
    pub target_uri: DocumentUri,
    /// Name range of the target declaration; empty for a whole-file link.
    pub target_range: TextRange,
    pub tooltip: Cow<'static, str>,
}

/// Get document links for a file.
///
/// Returns clickable links for:
/// 1. Module paths naming exactly one document - link to that document
/// 2. Imported names - link to the `share` declaration they import
pub fn document_links<D: Documents + ?Sized>(
    documents: &D,
    source: &SourceFile,
    extension: &str,
) -> Vec<DocumentLink> {
    let mut links = Vec::new();

    for (_, stmt) in source.tree().use_statements() {
        let Some(path) = &stmt.module_path else {
            continue;
        };
        let targets = resolve_module_path(documents, source.uri(), &path.text, extension);

        if let [single] = targets.as_slice() {
            links.push(DocumentLink {
                range: path.range,
                target_file: single.file(),
                target_uri: single.uri().clone(),
                target_range: TextRange::default(),
                tooltip: Cow::Owned(format!("Open {}", single.uri().path())),
            });
        }

        for name in &stmt.imported_names {
            if let Some(target) = shared_declaration(&targets, &name.text) {
                links.push(DocumentLink {
                    range: name.range,
                    target_file: target.file(),
                    target_uri: target.uri().clone(),
                    target_range: target.range,
                    tooltip: Cow::Owned(format!("Go to {}", name.text)),
                });
            }
        }
    }

    links
}

/// A `share` declaration named `name` in one of `targets`.
pub(crate) struct SharedTarget<'a> {
    pub document: &'a Arc<SourceFile>,
    pub range: TextRange,
}

impl SharedTarget<'_> {
    pub fn file(&self) -> FileId {
        self.document.file()
    }

    pub fn uri(&self) -> &DocumentUri {
        self.document.uri()
    }
}

pub(crate) fn shared_declaration<'a>(targets: &'a [Arc<SourceFile>], name: &str) -> Option<SharedTarget<'a>> {
    targets.iter().find_map(|document| {
        document.tree().top_level().find_map(|stmt| match stmt {
            TopLevelStatement::VisibilityWrapper {
                visibility: Visibility::Share,
                declaration: Some((_, decl)),
                ..
            } => decl
                .name
                .as_ref()
                .filter(|n| n.text == name)
                .map(|n| SharedTarget { document, range: n.range }),
            _ => None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::DocumentStore;

    #[test]
    fn test_links_for_imported_names() {
        let store = DocumentStore::new();
        store.set_text(&DocumentUri::file("/p/ui/a.tao"), "share view Button {}\nview Internal {}");
        store.set_text(&DocumentUri::file("/p/ui/b.tao"), "share view Input {}");
        let text = "use ./ui Button, Internal, Input";
        let app = store.set_text(&DocumentUri::file("/p/app.tao"), text);

        let links = document_links(&store, &app, "tao");
        let linked: Vec<_> = links.iter().map(|l| &text[l.range]).collect();
        assert_eq!(linked, vec!["Button", "Input"]);
        assert_eq!(links[0].target_uri, DocumentUri::file("/p/ui/a.tao"));
        assert_eq!(links[1].target_uri, DocumentUri::file("/p/ui/b.tao"));
        assert_eq!(links[0].tooltip, "Go to Button");
    }

    #[test]
    fn test_link_for_single_file_module() {
        let store = DocumentStore::new();
        store.set_text(&DocumentUri::file("/p/ui/views.tao"), "share view PublicView {}");
        let text = "use ./ui/views PublicView";
        let app = store.set_text(&DocumentUri::file("/p/app.tao"), text);

        let links = document_links(&store, &app, "tao");
        assert_eq!(links.len(), 2);
        assert_eq!(&text[links[0].range], "./ui/views");
        assert_eq!(links[0].target_range, TextRange::default());
        assert_eq!(&text[links[1].range], "PublicView");
    }

    #[test]
    fn test_no_links_for_unresolved_module() {
        let store = DocumentStore::new();
        let app = store.set_text(&DocumentUri::file("/p/app.tao"), "use ./nowhere A");
        assert!(document_links(&store, &app, "tao").is_empty());
    }
}
