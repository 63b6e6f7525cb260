//! Linking: resolving every reference of a document, plus the declaration
//! checks that depend on the result.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::syntax::{DeclKind, Ident, NodeId, ReferenceSite, SyntaxNode};

use super::{
    DefId, Diagnostic, DiagnosticCollector, Documents, LocalSymbols, ReferenceContext, RelatedInfo,
    ScopeError, ScopeProvider, SourceFile, SymbolKind, SymbolQuery, check_cancelled, codes,
};

/// A reference together with the declaration it resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedReference {
    /// The `ui` statement or render holding the reference.
    pub node: NodeId,
    pub name: Ident,
    pub site: ReferenceSite,
    pub target: Option<DefId>,
}

impl LinkedReference {
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// Result of linking one document.
#[derive(Clone, Debug, Default)]
pub struct Linked {
    pub references: Vec<LinkedReference>,
    /// One unresolved-reference error per reference without a target.
    pub diagnostics: Vec<Diagnostic>,
}

impl Linked {
    pub fn reference_at_node(&self, node: NodeId) -> Option<&LinkedReference> {
        self.references.iter().find(|r| r.node == node)
    }
}

/// Every reference site expects a view.
const EXPECTED: SymbolKind = SymbolKind::View;

pub struct Linker<'a, D: ?Sized, I: ?Sized> {
    provider: ScopeProvider<'a, D, I>,
}

impl<'a, D, I> Linker<'a, D, I>
where
    D: Documents + ?Sized,
    I: SymbolQuery + ?Sized,
{
    pub fn new(provider: ScopeProvider<'a, D, I>) -> Self {
        Self { provider }
    }

    /// Resolve every reference of `source` in document order.
    pub fn link(
        &self,
        source: &SourceFile,
        locals: &LocalSymbols,
        cancel: &CancellationToken,
    ) -> Result<Linked, ScopeError> {
        source.root()?;
        let mut collector = DiagnosticCollector::new();
        let mut references = Vec::new();

        for reference in source.tree().references() {
            check_cancelled(cancel)?;
            let ctx = ReferenceContext {
                source,
                locals,
                node: reference.container,
                expected: EXPECTED,
            };
            let target = self.provider.resolve(&ctx, &reference.name.text)?.def_id();
            if target.is_none() {
                collector.unresolved_reference(source.file(), reference.name, EXPECTED);
            }
            references.push(LinkedReference {
                node: reference.container,
                name: reference.name.clone(),
                site: reference.site,
                target,
            });
        }

        let diagnostics = collector.finish();
        debug!(
            file = %source.uri(),
            references = references.len(),
            unresolved = diagnostics.len(),
            "[LINK] document linked"
        );
        Ok(Linked {
            references,
            diagnostics,
        })
    }
}

// ============================================================================
// APP CHECKS
// ============================================================================

/// Check every `app` of `source`: exactly one `ui` statement, naming a view.
pub fn check_apps(source: &SourceFile, linked: &Linked) -> Result<Vec<Diagnostic>, ScopeError> {
    source.root()?;
    let tree = source.tree();
    let file = source.file();
    let mut collector = DiagnosticCollector::new();

    for (node, decl) in tree.declarations() {
        if decl.kind != DeclKind::App {
            continue;
        }
        let uis: Vec<NodeId> = decl
            .statements
            .iter()
            .copied()
            .filter(|&s| matches!(tree.node(s), SyntaxNode::Ui(_)))
            .collect();

        if uis.is_empty() {
            let range = decl.name.as_ref().map_or(tree.range(node), |n| n.range);
            collector.add(
                Diagnostic::error(file, range, "App must have a UI declaration.")
                    .with_code(codes::APP_MISSING_UI),
            );
        }

        if uis.len() > 1 {
            for &ui in &uis {
                let mut diag = Diagnostic::error(file, tree.range(ui), "App can only have one UI declaration.")
                    .with_code(codes::APP_MULTIPLE_UI);
                for &other in uis.iter().filter(|&&o| o != ui) {
                    diag = diag.with_related(RelatedInfo {
                        file,
                        range: tree.range(other),
                        message: Arc::from("Another declaration here."),
                    });
                }
                collector.add(diag);
            }
        }

        for &ui in &uis {
            let resolved = linked.reference_at_node(ui).is_some_and(LinkedReference::is_resolved);
            if !resolved {
                let range = match tree.node(ui) {
                    SyntaxNode::Ui(stmt) => stmt.target.as_ref().map_or(tree.range(ui), |t| t.range),
                    _ => tree.range(ui),
                };
                collector.add(
                    Diagnostic::error(file, range, "App ui must be a view declaration.")
                        .with_code(codes::APP_UI_NOT_VIEW),
                );
            }
        }
    }

    Ok(collector.finish())
}
