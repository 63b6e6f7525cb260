//! Semantic layer: symbols, scopes and the checks built on them.
//!
//! ```text
//! SourceFile ──compute_exports──────▶ SymbolIndex ─┐
//!     │                                            ├─▶ ScopeProvider ─▶ Linker
//!     └──────compute_local_symbols──▶ LocalSymbols ┘
//! DocumentStore ─────────────────────────────────────▶ ImportValidator
//! ```
//!
//! User problems come back as [`Diagnostic`]s. [`ScopeError`] is reserved for
//! broken inputs and cancellation.

mod diagnostics;
mod error;
mod ids;
mod imports;
mod index;
mod input;
mod link;
mod resolve;
mod source;
mod symbols;

pub use diagnostics::{Diagnostic, DiagnosticCollector, RelatedInfo, Severity, codes};
pub use error::{ScopeError, check_cancelled};
pub use ids::DefId;
pub use imports::ImportValidator;
pub use index::{SymbolIndex, SymbolQuery};
pub use input::SourceFile;
pub use link::{Linked, LinkedReference, Linker, check_apps};
pub use resolve::{
    ReferenceContext, ResolveResult, Scope, ScopeEntry, ScopeProvider, ScopeTier,
    resolve_module_path,
};
pub use source::{DocumentStore, Documents};
pub use symbols::{
    ExportedSymbol, LocalSymbol, LocalSymbols, SymbolKind, compute_exports, compute_local_symbols,
};
