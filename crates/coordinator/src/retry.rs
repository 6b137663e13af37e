//! Backoff policy for the remote checker, kept separate from the call it wraps.

use log::{debug, warn};
use prose_suggest::SourceError;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(Duration),
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    /// Attempts allowed after the first one
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_retries: 3,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(base_delay: Duration, max_retries: u32) -> Self {
        Self {
            base_delay,
            max_retries,
        }
    }

    /// Never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Duration::ZERO, 0)
    }

    /// Decision after the zero-based attempt `attempt` failed transiently.
    #[must_use]
    pub fn next_delay(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::GiveUp;
        }
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        RetryDecision::Retry(self.base_delay.saturating_mul(factor))
    }

    /// Total time spent sleeping if every retry is used.
    #[must_use]
    pub fn backoff_ceiling(&self) -> Duration {
        (0..self.max_retries)
            .filter_map(|attempt| match self.next_delay(attempt) {
                RetryDecision::Retry(delay) => Some(delay),
                RetryDecision::GiveUp => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Runs `op` until it succeeds, fails permanently, or the policy gives up.
///
/// `op` receives the zero-based attempt index.
pub async fn retry_transient<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, SourceError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0u32;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => {
                warn!("Remote check failed permanently on attempt {}: {err}", attempt + 1);
                return Err(err);
            }
            Err(err) => match policy.next_delay(attempt) {
                RetryDecision::Retry(delay) => {
                    debug!(
                        "Remote check attempt {} failed ({err}); retrying in {}ms",
                        attempt + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp => {
                    warn!("Remote check gave up after {} attempts: {err}", attempt + 1);
                    return Err(err);
                }
            },
        }
    }
}
