use crate::SourceError;
use log::{debug, warn};
use prose_protocol::{Suggestion, SuggestionReport};
use std::collections::HashSet;

/// What the remote source produced for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Completed(Vec<Suggestion>),
    Failed(SourceError),
    /// No remote checker configured
    Unavailable,
}

impl From<crate::Result<Vec<Suggestion>>> for RemoteOutcome {
    fn from(result: crate::Result<Vec<Suggestion>>) -> Self {
        match result {
            Ok(suggestions) => Self::Completed(suggestions),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Merges remote and local suggestions.
///
/// Remote entries come first, so on an exact `(start, end)` collision the remote entry is the
/// one kept. The result is sorted by `start` with a stable sort, preserving that precedence
/// among entries sharing a start offset.
#[must_use]
pub fn reconcile(remote: RemoteOutcome, local: Vec<Suggestion>) -> SuggestionReport {
    let (remote, degraded) = match remote {
        RemoteOutcome::Completed(suggestions) => (suggestions, false),
        RemoteOutcome::Failed(err) => {
            warn!("Remote suggestions unavailable, using local dictionary only: {err}");
            (Vec::new(), true)
        }
        RemoteOutcome::Unavailable => (Vec::new(), true),
    };

    let mut seen = HashSet::new();
    let mut merged: Vec<Suggestion> = remote
        .into_iter()
        .chain(local)
        .filter(|s| seen.insert(s.span()))
        .collect();
    merged.sort_by_key(|s| s.start);

    debug!(
        "Reconciled {} suggestions (degraded={degraded})",
        merged.len()
    );
    SuggestionReport {
        suggestions: merged,
        degraded,
    }
}
