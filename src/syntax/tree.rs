//! Arena syntax tree.
//!
//! Nodes live in a flat vector owned by [`SyntaxTree`] and refer to each other
//! by [`NodeId`]. Every node records its parent, so scope walks from a
//! reference up to the file root never need a separate parent map. Node
//! payloads are a closed sum type ([`SyntaxNode`]); code that dispatches on
//! it matches exhaustively.

use std::fmt;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

/// Index of a node inside its [`SyntaxTree`].
///
/// Only meaningful together with the file the tree belongs to; pair it with a
/// [`FileId`](crate::base::FileId) (see [`DefId`](crate::hir::DefId)) to
/// address a node across the workspace.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A name token with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub text: SmolStr,
    pub range: TextRange,
}

/// Declared visibility of a top-level declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// No keyword: visible to every file of the same module.
    #[default]
    Default,
    /// `file`: visible only inside the declaring file.
    File,
    /// `share`: visible in the module and importable from other modules.
    Share,
}

impl Visibility {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Default => None,
            Visibility::File => Some("file"),
            Visibility::Share => Some("share"),
        }
    }

    /// Visible to other files of the same module.
    pub fn is_module_visible(self) -> bool {
        !matches!(self, Visibility::File)
    }

    /// Importable from another module with `use`.
    pub fn is_importable(self) -> bool {
        matches!(self, Visibility::Share)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    App,
    View,
}

impl DeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::App => "app",
            DeclKind::View => "view",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaoFile {
    pub statements: Vec<NodeId>,
}

/// `use ./ui/views Button, Input`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseStatement {
    pub module_path: Option<Ident>,
    pub imported_names: Vec<Ident>,
}

impl UseStatement {
    pub fn module_path_text(&self) -> &str {
        self.module_path.as_ref().map_or("", |p| p.text.as_str())
    }

    pub fn imports(&self, name: &str) -> bool {
        self.imported_names.iter().any(|n| n.text == name)
    }
}

impl fmt::Display for UseStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "use {}", self.module_path_text())?;
        for (i, name) in self.imported_names.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{}", name.text)?;
        }
        Ok(())
    }
}

/// `share view X {}` / `file view X {}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityMarked {
    pub visibility: Visibility,
    pub declaration: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub key: Ident,
    pub ty: Ident,
}

/// An `app` or `view` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclKind,
    /// Absent when the parse was malformed.
    pub name: Option<Ident>,
    pub parameters: Vec<Parameter>,
    pub statements: Vec<NodeId>,
}

impl Declaration {
    pub fn name_text(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.text.as_str())
    }
}

/// `ui MainView` inside an app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiStatement {
    pub target: Option<Ident>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Number,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    pub key: Ident,
    pub kind: LiteralKind,
    pub value: SmolStr,
}

/// `Button label "Go" { ... }` inside a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewRender {
    pub view: Ident,
    pub args: Vec<Argument>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewBody {
    pub statements: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Injection {
    pub code: SmolStr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxNode {
    File(TaoFile),
    Use(UseStatement),
    VisibilityMarked(VisibilityMarked),
    Declaration(Declaration),
    Ui(UiStatement),
    Render(ViewRender),
    Body(ViewBody),
    Injection(Injection),
}

impl SyntaxNode {
    /// Whether local symbols declared directly under this node are scoped to it.
    pub fn is_scope_container(&self) -> bool {
        match self {
            SyntaxNode::File(_) | SyntaxNode::Declaration(_) | SyntaxNode::Body(_) => true,
            SyntaxNode::Use(_)
            | SyntaxNode::VisibilityMarked(_)
            | SyntaxNode::Ui(_)
            | SyntaxNode::Render(_)
            | SyntaxNode::Injection(_) => false,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            SyntaxNode::Declaration(decl) => Some(decl),
            _ => None,
        }
    }
}

/// A top-level statement, viewed as a tagged variant.
#[derive(Clone, Copy, Debug)]
pub enum TopLevelStatement<'a> {
    Declaration(NodeId, &'a Declaration),
    Import(NodeId, &'a UseStatement),
    VisibilityWrapper {
        node: NodeId,
        visibility: Visibility,
        declaration: Option<(NodeId, &'a Declaration)>,
    },
    Injection(NodeId, &'a Injection),
}

/// Where a name reference occurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceSite {
    /// `ui X` inside an app.
    AppUi,
    /// `X ...` render statement inside a view.
    ViewRender,
}

/// A name reference and the node that contains it.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceRef<'a> {
    pub container: NodeId,
    pub name: &'a Ident,
    pub site: ReferenceSite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeData {
    pub node: SyntaxNode,
    pub parent: Option<NodeId>,
    pub range: TextRange,
}

/// The parsed form of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    /// A tree with no root; analysis of it is a pipeline error.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn alloc(&mut self, parent: Option<NodeId>, node: SyntaxNode, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData { node, parent, range });
        id
    }

    pub(crate) fn finish(&mut self, id: NodeId, node: SyntaxNode, range: TextRange) {
        let data = &mut self.nodes[id.0 as usize];
        data.node = node;
        data.range = range;
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The root node, if present and a file.
    pub fn file_root(&self) -> Option<(NodeId, &TaoFile)> {
        let root = self.root?;
        match self.node(root) {
            SyntaxNode::File(file) => Some((root, file)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize)
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0 as usize].node
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|d| d.parent)
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.nodes[id.0 as usize].range
    }

    pub fn declaration(&self, id: NodeId) -> Option<&Declaration> {
        self.get(id).and_then(|d| d.node.as_declaration())
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).map(|_| id), move |&n| self.parent(n))
    }

    /// The nearest proper ancestor that scopes local symbols.
    pub fn enclosing_container(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .skip(1)
            .find(|&n| self.node(n).is_scope_container())
    }

    /// Child nodes in document order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            SyntaxNode::File(file) => file.statements.clone(),
            SyntaxNode::VisibilityMarked(marked) => marked.declaration.into_iter().collect(),
            SyntaxNode::Declaration(decl) => decl.statements.clone(),
            SyntaxNode::Render(render) => render.body.into_iter().collect(),
            SyntaxNode::Body(body) => body.statements.clone(),
            SyntaxNode::Use(_) | SyntaxNode::Ui(_) | SyntaxNode::Injection(_) => Vec::new(),
        }
    }

    /// Effective visibility of a declaration: the wrapper's, or default.
    pub fn visibility_of(&self, decl: NodeId) -> Visibility {
        match self.parent(decl).map(|p| self.node(p)) {
            Some(SyntaxNode::VisibilityMarked(marked)) => marked.visibility,
            _ => Visibility::Default,
        }
    }

    /// Top-level statements in file order; empty without a file root.
    pub fn top_level(&self) -> impl Iterator<Item = TopLevelStatement<'_>> + '_ {
        let statements = self.file_root().map(|(_, f)| f.statements.as_slice()).unwrap_or(&[]);
        statements.iter().filter_map(move |&id| match self.node(id) {
            SyntaxNode::Declaration(decl) => Some(TopLevelStatement::Declaration(id, decl)),
            SyntaxNode::Use(stmt) => Some(TopLevelStatement::Import(id, stmt)),
            SyntaxNode::VisibilityMarked(marked) => Some(TopLevelStatement::VisibilityWrapper {
                node: id,
                visibility: marked.visibility,
                declaration: marked
                    .declaration
                    .and_then(|d| self.declaration(d).map(|decl| (d, decl))),
            }),
            SyntaxNode::Injection(injection) => Some(TopLevelStatement::Injection(id, injection)),
            SyntaxNode::File(_) | SyntaxNode::Ui(_) | SyntaxNode::Render(_) | SyntaxNode::Body(_) => None,
        })
    }

    /// Every `use` statement of the file, wherever it appears at top level.
    pub fn use_statements(&self) -> impl Iterator<Item = (NodeId, &UseStatement)> + '_ {
        self.top_level().filter_map(|stmt| match stmt {
            TopLevelStatement::Import(id, use_stmt) => Some((id, use_stmt)),
            _ => None,
        })
    }

    /// Every declaration in the tree, nested ones included, in node allocation order.
    pub fn declarations(&self) -> impl Iterator<Item = (NodeId, &Declaration)> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, data)| {
            data.node.as_declaration().map(|decl| (NodeId(i as u32), decl))
        })
    }

    /// Every name reference in the tree, in node allocation order.
    pub fn references(&self) -> impl Iterator<Item = ReferenceRef<'_>> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, data)| {
            let container = NodeId(i as u32);
            match &data.node {
                SyntaxNode::Ui(ui) => ui.target.as_ref().map(|name| ReferenceRef {
                    container,
                    name,
                    site: ReferenceSite::AppUi,
                }),
                SyntaxNode::Render(render) => Some(ReferenceRef {
                    container,
                    name: &render.view,
                    site: ReferenceSite::ViewRender,
                }),
                _ => None,
            }
        })
    }

    /// The reference whose name token covers `offset`.
    pub fn reference_at(&self, offset: TextSize) -> Option<ReferenceRef<'_>> {
        self.references()
            .find(|r| r.name.range.contains_inclusive(offset))
    }

    /// The deepest node whose range covers `offset`.
    pub fn node_at(&self, offset: TextSize) -> Option<NodeId> {
        let mut current = self.root.filter(|&r| self.range(r).contains_inclusive(offset))?;
        'descend: loop {
            for child in self.children(current) {
                if self.range(child).contains_inclusive(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }
}
