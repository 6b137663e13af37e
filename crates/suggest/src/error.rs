use thiserror::Error;

/// Result type for suggestion source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Lower-cased phrases that mark a remote failure as network-class.
pub const NETWORK_ERROR_PHRASES: &[&str] = &[
    "network",
    "fetch",
    "timeout",
    "timed out",
    "connection",
    "connect error",
    "econnrefused",
    "econnreset",
    "enotfound",
    "dns",
    "unreachable",
    "socket",
];

#[must_use]
pub fn is_network_error(message: &str) -> bool {
    let lowered = message.to_lowercase();
    NETWORK_ERROR_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

/// Failures of a suggestion source. Never surfaced to callers of the reconciler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network-class failure; eligible for retry
    #[error("Transient source error: {0}")]
    Transient(String),

    /// Anything else, such as a rejected request or malformed payload
    #[error("Permanent source error: {0}")]
    Permanent(String),
}

impl SourceError {
    /// Sorts a raw failure message into transient or permanent by phrase match.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_network_error(&message) {
            Self::Transient(message)
        } else {
            Self::Permanent(message)
        }
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Transient(msg) | Self::Permanent(msg) => msg,
        }
    }
}

/// Errors from applying a suggestion to a text snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("Span {start}..{end} is outside text of {len} characters")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Span no longer holds {expected:?} (found {found:?})")]
    StaleSpan { expected: String, found: String },
}
