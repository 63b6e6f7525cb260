//! Document identifiers.
//!
//! Every document in a workspace is named by a URI-like string
//! `scheme://path`. Real files use the `file` scheme; single-file evaluation
//! buffers use [`STRING_SCHEME`] with a content-derived path so they never
//! collide with anything on disk.

use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;
use smol_str::{SmolStr, format_smolstr};

use super::paths;

/// Scheme of documents backed by a real filesystem path.
pub const FILE_SCHEME: &str = "file";

/// Scheme of in-memory documents created from a source string.
pub const STRING_SCHEME: &str = "tao-string";

/// A parsed document identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentUri {
    scheme: SmolStr,
    path: SmolStr,
}

impl DocumentUri {
    /// A `file://` URI for a filesystem path. The path is stored normalized,
    /// so `/p//ui/./a.tao` and `/p/ui/a.tao` name the same document.
    pub fn file(path: &str) -> Self {
        Self {
            scheme: SmolStr::new_static(FILE_SCHEME),
            path: SmolStr::new(paths::normalize(path)),
        }
    }

    /// An in-memory URI derived from the document text.
    pub fn for_string(text: &str) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(text.as_bytes());
        Self {
            scheme: SmolStr::new_static(STRING_SCHEME),
            path: format_smolstr!("v0/hash/{:016x}.tao", hasher.finish()),
        }
    }

    /// Parse `scheme://path`. A string without a scheme is treated as a file path.
    pub fn parse(uri: &str) -> Self {
        match uri.split_once("://") {
            Some((FILE_SCHEME, rest)) => Self::file(rest),
            Some((scheme, rest)) if !scheme.is_empty() && !scheme.contains('/') => Self {
                scheme: SmolStr::new(scheme),
                path: SmolStr::new(rest),
            },
            _ => Self::file(uri),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this document lives on a real filesystem path.
    pub fn is_file(&self) -> bool {
        self.scheme == FILE_SCHEME
    }

    /// The module this document belongs to: its normalized directory.
    pub fn module_dir(&self) -> String {
        paths::normalize(paths::dirname(&self.path))
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)
    }
}

impl fmt::Debug for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentUri({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_uri() {
        let uri = DocumentUri::parse("file:///project/ui/views.tao");
        assert!(uri.is_file());
        assert_eq!(uri.path(), "/project/ui/views.tao");
        assert_eq!(uri.to_string(), "file:///project/ui/views.tao");
    }

    #[test]
    fn test_plain_path_is_file() {
        assert_eq!(
            DocumentUri::parse("/project/app.tao"),
            DocumentUri::file("/project/app.tao")
        );
    }

    #[test]
    fn test_string_uri_is_not_file() {
        let uri = DocumentUri::for_string("view A { }");
        assert!(!uri.is_file());
        assert_eq!(uri.scheme(), STRING_SCHEME);
        assert!(uri.path().starts_with("v0/hash/"));
        assert!(uri.to_string().starts_with("tao-string://v0/hash/"));
        assert_eq!(uri, DocumentUri::for_string("view A { }"));
        assert_ne!(uri, DocumentUri::for_string("view B { }"));
    }

    #[test]
    fn test_parse_string_uri_roundtrip() {
        let uri = DocumentUri::for_string("app X { ui Y }");
        assert_eq!(DocumentUri::parse(&uri.to_string()), uri);
    }

    #[test]
    fn test_file_paths_are_normalized() {
        let uri = DocumentUri::file("/p//ui/./views.tao");
        assert_eq!(uri.path(), "/p/ui/views.tao");
        assert_eq!(uri, DocumentUri::parse("file:///p/ui/views.tao"));
        assert_eq!(DocumentUri::file("./ws/app.tao").path(), "ws/app.tao");
    }

    #[test]
    fn test_module_dir() {
        assert_eq!(DocumentUri::file("/p/ui/a.tao").module_dir(), "/p/ui");
        assert_eq!(DocumentUri::file("/app.tao").module_dir(), "/");
    }
}
