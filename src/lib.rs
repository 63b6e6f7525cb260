//! # tao-base
//!
//! Core library for the Tao UI language: parsing, module resolution and
//! symbol scoping.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide      → AnalysisHost / Analysis (diagnostics, goto-def, completion, links)
//!   ↓
//! hir      → Symbol tables, global index, scope chains, import validation
//!   ↓
//! syntax   → Lexer (logos) + recursive-descent parser + arena syntax tree
//!   ↓
//! base     → Primitives (FileId, TextRange, DocumentUri, module paths)
//! ```
//!
//! `project` sits beside `ide` and loads workspaces from disk.

/// Foundation types: FileId, spans, document URIs, module paths
pub mod base;

/// Semantic model: symbols, scopes and checks
pub mod hir;

/// IDE features: diagnostics, goto-definition, completion, document links
pub mod ide;

/// Workspace loading
pub mod project;

/// Tokens, syntax tree and parser
pub mod syntax;

pub use base::{DocumentUri, FileId, LineCol, LineIndex, TextRange, TextSize};
pub use ide::{Analysis, AnalysisHost};
