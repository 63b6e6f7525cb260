//! Completions: names that may be written at a position.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::hir::{
    Documents, LocalSymbols, ReferenceContext, ScopeError, ScopeProvider, ScopeTier, SourceFile,
    SymbolKind, SymbolQuery, resolve_module_path,
};
use crate::syntax::{SyntaxNode, TopLevelStatement, UseStatement, Visibility};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: SmolStr,
    pub kind: SymbolKind,
    /// Path of the declaring document, for names from other documents.
    pub detail: Option<String>,
    /// `None` for names offered inside a `use` statement.
    pub tier: Option<ScopeTier>,
}

/// Completions at `offset`.
///
/// Inside a `use` statement these are the `share` declarations of the
/// target module not imported yet; everywhere else, the views visible in the
/// scope chain at that position.
pub fn completions<D, I>(
    provider: &ScopeProvider<'_, D, I>,
    documents: &D,
    source: &SourceFile,
    locals: &LocalSymbols,
    offset: TextSize,
) -> Result<Vec<CompletionItem>, ScopeError>
where
    D: Documents + ?Sized,
    I: SymbolQuery + ?Sized,
{
    let (root, _) = source.root()?;
    let tree = source.tree();
    let node = tree.node_at(offset).unwrap_or(root);

    if let SyntaxNode::Use(stmt) = tree.node(node) {
        return Ok(import_completions(documents, source, stmt, provider.extension()));
    }

    let scope = provider.scope(&ReferenceContext {
        source,
        locals,
        node,
        expected: SymbolKind::View,
    })?;
    Ok(scope
        .visible()
        .into_iter()
        .map(|entry| CompletionItem {
            label: entry.name.clone(),
            kind: entry.kind,
            detail: (entry.tier != ScopeTier::Local).then(|| entry.uri.path().to_owned()),
            tier: Some(entry.tier),
        })
        .collect())
}

fn import_completions<D: Documents + ?Sized>(
    documents: &D,
    source: &SourceFile,
    stmt: &UseStatement,
    extension: &str,
) -> Vec<CompletionItem> {
    let Some(path) = &stmt.module_path else {
        return Vec::new();
    };
    let mut seen: FxHashSet<SmolStr> = stmt.imported_names.iter().map(|n| n.text.clone()).collect();
    let mut items = Vec::new();

    for target in resolve_module_path(documents, source.uri(), &path.text, extension) {
        for statement in target.tree().top_level() {
            let TopLevelStatement::VisibilityWrapper {
                visibility: Visibility::Share,
                declaration: Some((_, decl)),
                ..
            } = statement
            else {
                continue;
            };
            let Some(name) = &decl.name else {
                continue;
            };
            if seen.insert(name.text.clone()) {
                items.push(CompletionItem {
                    label: name.text.clone(),
                    kind: SymbolKind::from_decl(decl.kind),
                    detail: Some(target.uri().path().to_owned()),
                    tier: None,
                });
            }
        }
    }
    items
}
