//! Name resolution: which declaration a reference may refer to.
//!
//! A reference is resolved against a [`Scope`] chain built for its position:
//!
//! 1. **Local**: declarations of the current document, one link per enclosing
//!    container that declares something, innermost first.
//! 2. **Imported**: `share` declarations named by a `use` statement of the
//!    document.
//! 3. **Same module**: default and `share` declarations of the other documents
//!    in the same directory.
//!
//! Earlier links shadow later ones. Resolution never reports user errors; a
//! name that is not in the chain is [`ResolveResult::NotFound`] and the
//! caller decides whether that is a problem.
//!
//! Cross-document tiers only apply to `file` documents. In-memory documents
//! resolve against their own declarations only.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextRange;
use tracing::{debug, trace};

use crate::base::{DocumentUri, SOURCE_EXTENSION, paths};
use crate::syntax::{NodeId, Visibility};

use super::{
    DefId, Documents, ExportedSymbol, LocalSymbol, LocalSymbols, ScopeError, SourceFile,
    SymbolKind, SymbolQuery,
};

// ============================================================================
// MODULE PATHS
// ============================================================================

/// Documents matched by `module_path` as written in a `use` statement of `from`.
///
/// The path is resolved against the directory of `from`. A document matches
/// if it is exactly `<target>.<extension>` or lives directly inside
/// `<target>`. The result is sorted by URI and free of duplicates; it is
/// empty when `from` is not a file document.
pub fn resolve_module_path<D: Documents + ?Sized>(
    documents: &D,
    from: &DocumentUri,
    module_path: &str,
    extension: &str,
) -> Vec<Arc<SourceFile>> {
    if !from.is_file() {
        return Vec::new();
    }
    let target = paths::normalize_module_path(&from.module_dir(), module_path);

    let mut seen = FxHashSet::default();
    let mut matches: Vec<_> = documents
        .all_documents()
        .into_iter()
        .filter(|doc| doc.uri().is_file())
        .filter(|doc| paths::is_module_member(doc.uri().path(), &target, extension))
        .filter(|doc| seen.insert(doc.file()))
        .collect();
    matches.sort_by(|a, b| a.uri().cmp(b.uri()));

    if matches.is_empty() {
        debug!(from = %from, module_path, target = %target, "[RESOLVE] module path matches no documents");
    }
    matches
}

// ============================================================================
// SCOPE CHAIN
// ============================================================================

/// Which link of the chain an entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeTier {
    Local,
    Imported,
    SameModule,
}

/// A candidate declaration for a reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeEntry {
    pub name: SmolStr,
    pub def: DefId,
    pub uri: DocumentUri,
    pub kind: SymbolKind,
    pub visibility: Visibility,
    /// Range of the declaration's name token.
    pub range: TextRange,
    pub tier: ScopeTier,
}

impl ScopeEntry {
    fn local(source: &SourceFile, symbol: &LocalSymbol) -> Self {
        Self {
            name: symbol.name.clone(),
            def: DefId::new(source.file(), symbol.node),
            uri: source.uri().clone(),
            kind: symbol.kind,
            visibility: symbol.visibility,
            range: symbol.range,
            tier: ScopeTier::Local,
        }
    }

    fn exported(symbol: &ExportedSymbol, tier: ScopeTier) -> Self {
        Self {
            name: symbol.name.clone(),
            def: symbol.def_id(),
            uri: symbol.uri.clone(),
            kind: symbol.kind,
            visibility: symbol.visibility,
            range: symbol.range,
            tier,
        }
    }
}

/// One link of a scope chain; lookups fall through to `parent`.
#[derive(Clone, Debug)]
pub struct Scope {
    tier: ScopeTier,
    /// The container a local link was collected from.
    container: Option<NodeId>,
    entries: Vec<ScopeEntry>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    fn new(tier: ScopeTier, container: Option<NodeId>, entries: Vec<ScopeEntry>, parent: Option<Scope>) -> Self {
        Self {
            tier,
            container,
            entries,
            parent: parent.map(Box::new),
        }
    }

    pub fn tier(&self) -> ScopeTier {
        self.tier
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Entries of this link only.
    pub fn entries(&self) -> &[ScopeEntry] {
        &self.entries
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.parent.as_deref()
    }

    /// This link followed by every outer link.
    pub fn links(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self), |s| s.parent())
    }

    /// Every entry of the chain in shadowing order.
    pub fn iter(&self) -> impl Iterator<Item = &ScopeEntry> {
        self.links().flat_map(|s| s.entries.iter())
    }

    /// The first entry named `name`, honouring shadowing.
    pub fn lookup(&self, name: &str) -> Option<&ScopeEntry> {
        self.iter().find(|e| e.name == name)
    }

    /// The entry each visible name resolves to, in chain order.
    pub fn visible(&self) -> Vec<&ScopeEntry> {
        let mut seen = FxHashSet::default();
        self.iter().filter(|e| seen.insert(e.name.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.links().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    Found(ScopeEntry),
    NotFound,
}

impl ResolveResult {
    pub fn entry(&self) -> Option<&ScopeEntry> {
        match self {
            ResolveResult::Found(e) => Some(e),
            ResolveResult::NotFound => None,
        }
    }

    pub fn def_id(&self) -> Option<DefId> {
        self.entry().map(|e| e.def)
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolveResult::Found(_))
    }
}

// ============================================================================
// SCOPE PROVIDER
// ============================================================================

/// Where a reference occurs and what it expects to find.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceContext<'a> {
    pub source: &'a SourceFile,
    pub locals: &'a LocalSymbols,
    /// The node holding the reference (a `ui` statement or a render).
    pub node: NodeId,
    pub expected: SymbolKind,
}

/// Builds scope chains from the document store and the symbol index.
pub struct ScopeProvider<'a, D: ?Sized, I: ?Sized> {
    documents: &'a D,
    index: &'a I,
    extension: &'a str,
}

impl<'a, D, I> ScopeProvider<'a, D, I>
where
    D: Documents + ?Sized,
    I: SymbolQuery + ?Sized,
{
    pub fn new(documents: &'a D, index: &'a I) -> Self {
        Self {
            documents,
            index,
            extension: SOURCE_EXTENSION,
        }
    }

    pub fn with_extension(mut self, extension: &'a str) -> Self {
        self.extension = extension;
        self
    }

    /// Extension used for single-file module paths.
    pub fn extension(&self) -> &'a str {
        self.extension
    }

    /// The scope chain visible at `ctx.node`.
    pub fn scope(&self, ctx: &ReferenceContext<'_>) -> Result<Scope, ScopeError> {
        ctx.source.root()?;

        let same_module = Scope::new(ScopeTier::SameModule, None, self.same_module_entries(ctx), None);
        let imported = Scope::new(ScopeTier::Imported, None, self.imported_entries(ctx), Some(same_module));

        // Outermost container first so the innermost ends up at the head.
        let containers: Vec<NodeId> = ctx
            .source
            .tree()
            .ancestors(ctx.node)
            .filter(|&n| ctx.source.tree().node(n).is_scope_container())
            .collect();

        let mut chain = imported;
        for &container in containers.iter().rev() {
            let entries: Vec<_> = ctx
                .locals
                .in_scope(container)
                .iter()
                .filter(|s| s.kind == ctx.expected)
                .map(|s| ScopeEntry::local(ctx.source, s))
                .collect();
            if !entries.is_empty() {
                chain = Scope::new(ScopeTier::Local, Some(container), entries, Some(chain));
            }
        }
        Ok(chain)
    }

    /// Resolve `name` at `ctx.node` to its first candidate.
    pub fn resolve(&self, ctx: &ReferenceContext<'_>, name: &str) -> Result<ResolveResult, ScopeError> {
        let scope = self.scope(ctx)?;
        let result = match scope.lookup(name) {
            Some(entry) => {
                trace!(
                    file = %ctx.source.uri(),
                    name,
                    tier = ?entry.tier,
                    target = %entry.uri,
                    "[RESOLVE] reference resolved"
                );
                ResolveResult::Found(entry.clone())
            }
            None => {
                trace!(file = %ctx.source.uri(), name, "[RESOLVE] reference not found");
                ResolveResult::NotFound
            }
        };
        Ok(result)
    }

    /// `share` declarations named by the document's `use` statements.
    fn imported_entries(&self, ctx: &ReferenceContext<'_>) -> Vec<ScopeEntry> {
        let source = ctx.source;
        let mut seen = FxHashSet::default();
        let mut entries = Vec::new();

        for (_, stmt) in source.tree().use_statements() {
            let Some(path) = &stmt.module_path else {
                continue;
            };
            let targets: FxHashSet<_> =
                resolve_module_path(self.documents, source.uri(), &path.text, self.extension)
                    .iter()
                    .map(|doc| doc.file())
                    .collect();
            if targets.is_empty() {
                continue;
            }

            let mut matched: Vec<_> = self
                .index
                .query(ctx.expected, Some(&targets))
                .into_iter()
                .filter(|s| s.visibility.is_importable() && stmt.imports(&s.name))
                .filter(|s| seen.insert(s.def_id()))
                .collect();
            sort_candidates(&mut matched);
            entries.extend(matched.into_iter().map(|s| ScopeEntry::exported(s, ScopeTier::Imported)));
        }
        entries
    }

    /// Module-visible declarations of sibling documents.
    fn same_module_entries(&self, ctx: &ReferenceContext<'_>) -> Vec<ScopeEntry> {
        let source = ctx.source;
        if !source.uri().is_file() {
            return Vec::new();
        }
        let module = source.uri().module_dir();

        let mut matched: Vec<_> = self
            .index
            .query(ctx.expected, None)
            .into_iter()
            .filter(|s| s.file != source.file())
            .filter(|s| s.visibility.is_module_visible())
            .filter(|s| s.uri.is_file() && s.uri.module_dir() == module)
            .collect();
        sort_candidates(&mut matched);
        matched
            .into_iter()
            .map(|s| ScopeEntry::exported(s, ScopeTier::SameModule))
            .collect()
    }
}

/// Candidates from several documents: by URI, then in document order.
fn sort_candidates(symbols: &mut [&ExportedSymbol]) {
    symbols.sort_by(|a, b| {
        a.uri
            .cmp(&b.uri)
            .then_with(|| a.range.start().cmp(&b.range.start()))
    });
}
