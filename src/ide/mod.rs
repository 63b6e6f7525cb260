//! IDE features: high-level queries over an analysed workspace.
//!
//! The functions here take data in and return data out; they use the crate's
//! own types and leave protocol conversion to the caller.
//!
//! ## Usage
//!
//! ```
//! use tao::base::DocumentUri;
//! use tao::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! host.set_file(DocumentUri::file("/p/ui/button.tao"), "share view Button {}").unwrap();
//! let app = host
//!     .set_file(DocumentUri::file("/p/app.tao"), "use ./ui Button\nview Main { Button }")
//!     .unwrap();
//!
//! let analysis = host.analysis();
//! assert!(analysis.diagnostics(app).unwrap().is_empty());
//! ```

mod analysis;
mod completion;
mod document_links;
mod goto;

pub use analysis::{Analysis, AnalysisHost};
pub use completion::{CompletionItem, completions};
pub use document_links::{DocumentLink, document_links};
pub use goto::{GotoTarget, goto_definition};
