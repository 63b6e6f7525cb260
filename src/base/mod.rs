//! Foundation types for the Tao toolchain.
//!
//! This module provides fundamental types used throughout the compiler:
//! - [`FileId`] - Interned document identifiers
//! - [`DocumentUri`] - Stable `scheme://path` document names
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`paths`] - Pure module-path normalization
//! - [`AnalysisConfig`] - Analysis options
//!
//! This module has NO dependencies on other tao modules.

mod config;
mod file_id;
pub mod paths;
mod span;
mod uri;

pub use config::{AnalysisConfig, SOURCE_EXTENSION, ValidationStage};
pub use file_id::FileId;
pub use span::{LineCol, LineIndex, TextRange, TextSize};
pub use uri::{DocumentUri, FILE_SCHEME, STRING_SCHEME};
