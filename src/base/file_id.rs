//! File identifiers for tracking documents in a workspace.

use std::fmt;

/// An interned identifier for a source document.
///
/// `FileId` is a lightweight handle (just a u32) assigned by the
/// [`DocumentStore`](crate::hir::DocumentStore) the first time a
/// [`DocumentUri`](crate::base::DocumentUri) is seen. Re-parsing a document
/// keeps its id, so symbols and diagnostics can refer to files by value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    /// Create a new FileId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_file_id_display() {
        assert_eq!(FileId::new(7).to_string(), "doc#7");
        assert_eq!(format!("{:?}", FileId::new(7)), "FileId(7)");
    }

    #[test]
    fn test_file_id_as_set_key() {
        let mut set = FxHashSet::default();
        set.insert(FileId::new(1));
        set.insert(FileId::new(2));
        set.insert(FileId::from(1)); // duplicate

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_file_id_ordering() {
        assert!(FileId::new(1) < FileId::new(2));
        assert_eq!(FileId::new(3).index(), 3);
    }
}
