use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors returned synchronously to the caller; neither kind is ever retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Text size or shape is outside the accepted limits
    #[error("Validation error: {0}")]
    Validation(String),

    /// Text has no words or no sentences to measure
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AnalysisError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
