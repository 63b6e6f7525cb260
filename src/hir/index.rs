//! Global symbol index: exported symbols of every document in the workspace.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::base::FileId;

use super::{ExportedSymbol, SymbolKind};

/// Query interface over exported symbols.
pub trait SymbolQuery {
    /// Exported symbols of `kind`, optionally restricted to the given files.
    fn query(&self, kind: SymbolKind, files: Option<&FxHashSet<FileId>>) -> Vec<&ExportedSymbol>;
}

/// Exported symbols grouped by originating document.
///
/// A document's entries are replaced as a whole by [`SymbolIndex::add_file`],
/// so a query never sees a mix of two parses of the same document.
#[derive(Clone, Debug, Default)]
pub struct SymbolIndex {
    by_file: IndexMap<FileId, Vec<ExportedSymbol>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the exported symbols of `file`.
    pub fn add_file(&mut self, file: FileId, symbols: Vec<ExportedSymbol>) {
        self.by_file.insert(file, symbols);
    }

    pub fn remove_file(&mut self, file: FileId) {
        self.by_file.shift_remove(&file);
    }

    pub fn symbols_in_file(&self, file: FileId) -> &[ExportedSymbol] {
        self.by_file.get(&file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &ExportedSymbol> {
        self.by_file.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_file.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }
}

impl SymbolQuery for SymbolIndex {
    fn query(&self, kind: SymbolKind, files: Option<&FxHashSet<FileId>>) -> Vec<&ExportedSymbol> {
        self.by_file
            .iter()
            .filter(|(file, _)| files.is_none_or(|set| set.contains(*file)))
            .flat_map(|(_, symbols)| symbols)
            .filter(|s| s.kind == kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{DocumentUri, TextRange};
    use crate::syntax::{NodeId, Visibility};
    use smol_str::SmolStr;

    fn names(index: &SymbolIndex) -> Vec<&str> {
        index.all_symbols().map(|s| s.name.as_str()).collect()
    }

    fn make_symbol(name: &str, file: u32, kind: SymbolKind) -> ExportedSymbol {
        let tree = crate::syntax::parse("view X {}").tree;
        let node: NodeId = tree.root().unwrap();
        ExportedSymbol {
            name: SmolStr::new(name),
            file: FileId::new(file),
            uri: DocumentUri::file(&format!("/p/{file}.tao")),
            node,
            kind,
            visibility: Visibility::Default,
            range: TextRange::default(),
        }
    }

    #[test]
    fn test_add_files() {
        let mut index = SymbolIndex::new();
        index.add_file(FileId::new(0), vec![make_symbol("Button", 0, SymbolKind::View)]);
        index.add_file(FileId::new(1), vec![make_symbol("Button", 1, SymbolKind::View)]);

        assert_eq!(names(&index), vec!["Button", "Button"]);
        assert_eq!(index.symbols_in_file(FileId::new(1))[0].file, FileId::new(1));
        assert!(index.symbols_in_file(FileId::new(2)).is_empty());
        assert_eq!(index.file_count(), 2);
    }

    #[test]
    fn test_add_file_replaces_previous_entries() {
        let mut index = SymbolIndex::new();
        let file = FileId::new(0);
        index.add_file(file, vec![make_symbol("Old", 0, SymbolKind::View)]);
        index.add_file(file, vec![make_symbol("New", 0, SymbolKind::View)]);

        assert_eq!(names(&index), vec!["New"]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove_file() {
        let mut index = SymbolIndex::new();
        index.add_file(FileId::new(0), vec![make_symbol("A", 0, SymbolKind::View)]);
        index.remove_file(FileId::new(0));

        assert!(index.is_empty());
        assert!(index.symbols_in_file(FileId::new(0)).is_empty());
        assert_eq!(index.file_count(), 0);
    }

    #[test]
    fn test_query_by_kind_and_files() {
        let mut index = SymbolIndex::new();
        index.add_file(
            FileId::new(0),
            vec![make_symbol("Main", 0, SymbolKind::App), make_symbol("A", 0, SymbolKind::View)],
        );
        index.add_file(FileId::new(1), vec![make_symbol("B", 1, SymbolKind::View)]);

        let all_views: Vec<_> = index.query(SymbolKind::View, None).iter().map(|s| s.name.clone()).collect();
        assert_eq!(all_views, vec!["A", "B"]);

        let only: FxHashSet<_> = [FileId::new(1)].into_iter().collect();
        let restricted: Vec<_> = index
            .query(SymbolKind::View, Some(&only))
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(restricted, vec!["B"]);

        assert_eq!(index.query(SymbolKind::App, None).len(), 1);
    }
}
