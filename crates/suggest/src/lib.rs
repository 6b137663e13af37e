//! # Prose Suggest
//!
//! Grammar and spelling suggestions from two sources, merged into one ordered list.
//!
//! ```text
//! Text snapshot
//!     │
//!     ├──> Remote checker (GrammarChecker, may fail)
//!     │      └─> Suggestion[] (source = remote)
//!     │
//!     ├──> LocalDictionary (fixed misspelling table, never fails)
//!     │      └─> Suggestion[] (source = local)
//!     │
//!     └──> reconcile: remote first, dedupe exact spans, sort by start
//!            └─> SuggestionReport { suggestions, degraded }
//! ```
//!
//! Retrying the remote checker is the caller's concern; this crate performs single calls.

mod apply;
mod error;
mod local;
mod reconciler;
pub mod remote;
pub mod span;

pub use apply::{apply_all, apply_suggestion, rebase_suggestions};
pub use error::{is_network_error, ApplyError, Result, SourceError, NETWORK_ERROR_PHRASES};
pub use local::LocalDictionary;
pub use reconciler::{reconcile, RemoteOutcome};
pub use remote::{
    fetch_remote_suggestions, GrammarChecker, HttpGrammarChecker, RemoteMatch, DEFAULT_LANGUAGE,
};
