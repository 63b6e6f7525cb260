//! Workspace-wide identifiers for declarations.

use std::fmt;

use crate::base::FileId;
use crate::syntax::NodeId;

/// A globally unique identifier for a declaration.
///
/// Combines the document the declaration lives in with its node in that
/// document's syntax tree. A re-parse of the document invalidates every
/// `DefId` pointing into it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DefId {
    pub file: FileId,
    pub node: NodeId,
}

impl DefId {
    #[inline]
    pub const fn new(file: FileId, node: NodeId) -> Self {
        Self { file, node }
    }
}

impl fmt::Debug for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefId({:?}:{})", self.file, self.node.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    #[test]
    fn test_def_id_equality() {
        let tree = parse("view A {} view B {}").tree;
        let nodes: Vec<_> = tree.top_level().map(|s| match s {
            crate::syntax::TopLevelStatement::Declaration(id, _) => id,
            other => panic!("unexpected {other:?}"),
        }).collect();

        let a = DefId::new(FileId::new(1), nodes[0]);
        let b = DefId::new(FileId::new(1), nodes[0]);
        let c = DefId::new(FileId::new(1), nodes[1]);
        let d = DefId::new(FileId::new(2), nodes[0]);

        assert_eq!(a, b);
        assert_ne!(a, c); // different node
        assert_ne!(a, d); // different file
    }

    #[test]
    fn test_def_id_size() {
        assert_eq!(std::mem::size_of::<DefId>(), 8);
    }
}
