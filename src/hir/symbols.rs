//! Symbol table builder.
//!
//! Walks one parsed document and produces the two symbol sets the resolver
//! needs:
//!
//! - [`compute_exports`]: names published to other documents, with their
//!   declared visibility. `file` declarations never appear here.
//! - [`compute_local_symbols`]: every named declaration in the document,
//!   recorded against its nearest enclosing scope container.
//!
//! Both walks check the cancellation token between units of work and never
//! report user errors; a declaration without a name is skipped.

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextRange;
use tokio_util::sync::CancellationToken;

use crate::base::{DocumentUri, FileId};
use crate::syntax::{DeclKind, Declaration, NodeId, SyntaxNode, TopLevelStatement, Visibility};

use super::{DefId, ScopeError, SourceFile, check_cancelled};

// ============================================================================
// SYMBOL TYPES
// ============================================================================

/// The kind of declaration a symbol names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    App,
    View,
}

impl SymbolKind {
    pub fn from_decl(kind: DeclKind) -> Self {
        match kind {
            DeclKind::App => SymbolKind::App,
            DeclKind::View => SymbolKind::View,
        }
    }

    /// Name used in user-facing messages.
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::App => "AppDeclaration",
            SymbolKind::View => "ViewDeclaration",
        }
    }
}

/// A declaration published for other documents of the workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedSymbol {
    pub name: SmolStr,
    pub file: FileId,
    pub uri: DocumentUri,
    /// The declaration node.
    pub node: NodeId,
    pub kind: SymbolKind,
    /// `Default` or `Share`.
    pub visibility: Visibility,
    /// Range of the name token.
    pub range: TextRange,
}

impl ExportedSymbol {
    pub fn def_id(&self) -> DefId {
        DefId::new(self.file, self.node)
    }
}

/// A declaration visible inside its own document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalSymbol {
    pub name: SmolStr,
    pub node: NodeId,
    /// The nearest enclosing container (file, declaration, or render body).
    pub scope: NodeId,
    pub kind: SymbolKind,
    pub visibility: Visibility,
    pub range: TextRange,
}

/// Local symbols of one document, grouped by scope container.
///
/// Each group keeps every declaration in document order, duplicates
/// included; shadowing is decided at lookup time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalSymbols {
    by_scope: IndexMap<NodeId, Vec<LocalSymbol>>,
}

impl LocalSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: LocalSymbol) {
        self.by_scope.entry(symbol.scope).or_default().push(symbol);
    }

    /// Symbols recorded directly under `scope`.
    pub fn in_scope(&self, scope: NodeId) -> &[LocalSymbol] {
        self.by_scope.get(&scope).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn scopes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.by_scope.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalSymbol> {
        self.by_scope.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_scope.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scope.is_empty()
    }
}

// ============================================================================
// EXPORT COLLECTION
// ============================================================================

/// Collect the names `source` publishes to the rest of the workspace.
///
/// Top-level declarations are exported in file order: unwrapped ones with
/// default visibility, wrapped ones with the wrapper's visibility unless it
/// is `file`.
pub fn compute_exports(
    source: &SourceFile,
    cancel: &CancellationToken,
) -> Result<Vec<ExportedSymbol>, ScopeError> {
    source.root()?;
    let tree = source.tree();
    let mut exports = Vec::new();

    for statement in tree.top_level() {
        check_cancelled(cancel)?;
        let (node, decl, visibility) = match statement {
            TopLevelStatement::Declaration(node, decl) => (node, decl, Visibility::Default),
            TopLevelStatement::VisibilityWrapper {
                visibility,
                declaration: Some((node, decl)),
                ..
            } => (node, decl, visibility),
            TopLevelStatement::VisibilityWrapper { declaration: None, .. }
            | TopLevelStatement::Import(..)
            | TopLevelStatement::Injection(..) => continue,
        };
        if !visibility.is_module_visible() {
            continue;
        }
        let Some(name) = &decl.name else {
            continue;
        };
        exports.push(ExportedSymbol {
            name: name.text.clone(),
            file: source.file(),
            uri: source.uri().clone(),
            node,
            kind: SymbolKind::from_decl(decl.kind),
            visibility,
            range: name.range,
        });
    }

    Ok(exports)
}

// ============================================================================
// LOCAL COLLECTION
// ============================================================================

/// Record every named declaration of `source` under its enclosing container.
///
/// The walk is an explicit pre-order traversal in document order with a
/// cancellation check per visited node.
pub fn compute_local_symbols(
    source: &SourceFile,
    cancel: &CancellationToken,
) -> Result<LocalSymbols, ScopeError> {
    let (root, _) = source.root()?;
    let tree = source.tree();
    let mut locals = LocalSymbols::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        check_cancelled(cancel)?;
        if let SyntaxNode::Declaration(decl) = tree.node(node) {
            if let Some(symbol) = local_symbol(source, node, decl) {
                locals.add(symbol);
            }
        }
        stack.extend(tree.children(node).into_iter().rev());
    }

    Ok(locals)
}

fn local_symbol(source: &SourceFile, node: NodeId, decl: &Declaration) -> Option<LocalSymbol> {
    let tree = source.tree();
    let name = decl.name.as_ref()?;
    let scope = tree.enclosing_container(node)?;
    Some(LocalSymbol {
        name: name.text.clone(),
        node,
        scope,
        kind: SymbolKind::from_decl(decl.kind),
        visibility: tree.visibility_of(node),
        range: name.range,
    })
}
