use async_trait::async_trait;
use prose_suggest::remote::{RemoteCategory, RemoteRule, Replacement};
use prose_suggest::{GrammarChecker, RemoteMatch, SourceError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory checker that replays queued failures, then returns fixed matches.
pub(crate) struct ScriptedChecker {
    calls: AtomicUsize,
    failures: Mutex<VecDeque<SourceError>>,
    matches: Vec<RemoteMatch>,
    slow: Option<(&'static str, Duration)>,
}

impl ScriptedChecker {
    pub(crate) fn returning(matches: Vec<RemoteMatch>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failures: Mutex::new(VecDeque::new()),
            matches,
            slow: None,
        }
    }

    pub(crate) fn failing_first(mut self, failures: Vec<SourceError>) -> Self {
        self.failures = Mutex::new(failures.into());
        self
    }

    /// Delays any check whose text contains `marker`.
    pub(crate) fn slow_on(mut self, marker: &'static str, delay: Duration) -> Self {
        self.slow = Some((marker, delay));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrammarChecker for ScriptedChecker {
    async fn check(&self, text: &str, _language: &str) -> prose_suggest::Result<Vec<RemoteMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((marker, delay)) = self.slow {
            if text.contains(marker) {
                tokio::time::sleep(delay).await;
            }
        }
        let failure = self
            .failures
            .lock()
            .expect("failures lock")
            .pop_front();
        match failure {
            Some(err) => Err(err),
            None => Ok(self.matches.clone()),
        }
    }
}

pub(crate) fn typo_match(offset: usize, length: usize, replacement: &str) -> RemoteMatch {
    RemoteMatch {
        message: "Possible spelling mistake found.".to_string(),
        offset,
        length,
        replacements: vec![Replacement {
            value: replacement.to_string(),
        }],
        rule: RemoteRule {
            id: "MORFOLOGIK_RULE_EN_US".to_string(),
            category: RemoteCategory {
                id: "TYPOS".to_string(),
            },
        },
    }
}

pub(crate) fn network_error() -> SourceError {
    SourceError::classify("network error: connection refused")
}
