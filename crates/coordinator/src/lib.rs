//! Resilience layer between an editor and the Prose analyzers.
//!
//! Each open document gets a [`DocumentSession`] that debounces edits, retries the remote
//! grammar checker with exponential backoff, and drops any result produced for text the user
//! has since changed. When the remote checker cannot be reached the session still delivers
//! local dictionary results, flagged as degraded.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod registry;
pub mod retry;
pub mod session;

#[cfg(test)]
mod test_support;

pub use analyzer::DocumentAnalyzer;
pub use config::{EngineConfig, DEBOUNCE_MS_ENV, REMOTE_URL_ENV};
pub use error::{CoordinatorError, Result};
pub use registry::SessionRegistry;
pub use retry::{retry_transient, RetryDecision, RetryPolicy};
pub use session::{DocumentSession, SessionConfig, SessionState, SessionStatus};

impl From<&EngineConfig> for SessionConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            debounce: config.debounce(),
        }
    }
}
