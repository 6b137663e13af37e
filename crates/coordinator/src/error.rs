use prose_analysis::AnalysisError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoordinatorError>;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// Input rejected before any work was scheduled
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Session for document {0} is closed")]
    SessionClosed(String),

    #[error("No open session for document {0}")]
    UnknownDocument(String),
}

impl CoordinatorError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True for the errors a caller can fix by changing its input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Analysis(_))
    }
}
