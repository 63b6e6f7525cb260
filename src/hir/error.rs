//! Internal errors of the semantic layer.
//!
//! These signal a broken pipeline or an aborted analysis, never a mistake in
//! user source. User-facing problems are [`Diagnostic`](super::Diagnostic)s.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::base::{DocumentUri, FileId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    /// The document was handed to the semantic layer without a parsed file root.
    #[error("document {uri} has no parsed file root")]
    MissingRoot { uri: DocumentUri },
    /// The id does not name a document of the workspace.
    #[error("unknown document {file}")]
    UnknownFile { file: FileId },
    #[error("analysis cancelled")]
    Cancelled,
}

/// Abort with [`ScopeError::Cancelled`] once `token` has been cancelled.
#[inline]
pub fn check_cancelled(token: &CancellationToken) -> Result<(), ScopeError> {
    if token.is_cancelled() {
        return Err(ScopeError::Cancelled);
    }
    Ok(())
}
