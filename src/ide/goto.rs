//! Goto definition.

use text_size::{TextRange, TextSize};

use crate::base::{DocumentUri, FileId};
use crate::hir::{
    Documents, LocalSymbols, ReferenceContext, ScopeError, ScopeProvider, ScopeTier, SourceFile,
    SymbolKind, SymbolQuery, resolve_module_path,
};

use super::document_links::shared_declaration;

/// Where a name at the cursor is declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    pub file: FileId,
    pub uri: DocumentUri,
    /// Range of the declaration's name.
    pub range: TextRange,
    /// How the name was found. `None` for names inside a `use` statement.
    pub tier: Option<ScopeTier>,
}

/// Find the declaration of the name at `offset`.
///
/// Works on references (`ui X`, render statements) and on imported names in
/// `use` statements.
pub fn goto_definition<D, I>(
    provider: &ScopeProvider<'_, D, I>,
    documents: &D,
    source: &SourceFile,
    locals: &LocalSymbols,
    offset: TextSize,
) -> Result<Option<GotoTarget>, ScopeError>
where
    D: Documents + ?Sized,
    I: SymbolQuery + ?Sized,
{
    source.root()?;
    let tree = source.tree();

    if let Some(reference) = tree.reference_at(offset) {
        let ctx = ReferenceContext {
            source,
            locals,
            node: reference.container,
            expected: SymbolKind::View,
        };
        let result = provider.resolve(&ctx, &reference.name.text)?;
        return Ok(result.entry().map(|entry| GotoTarget {
            file: entry.def.file,
            uri: entry.uri.clone(),
            range: entry.range,
            tier: Some(entry.tier),
        }));
    }

    for (_, stmt) in tree.use_statements() {
        let Some(path) = &stmt.module_path else {
            continue;
        };
        let Some(name) = stmt
            .imported_names
            .iter()
            .find(|n| n.range.contains_inclusive(offset))
        else {
            continue;
        };
        let targets = resolve_module_path(documents, source.uri(), &path.text, provider.extension());
        return Ok(shared_declaration(&targets, &name.text).map(|target| GotoTarget {
            file: target.file(),
            uri: target.uri().clone(),
            range: target.range,
            tier: None,
        }));
    }

    Ok(None)
}
