//! Per-document analysis session.
//!
//! A session is one tokio task that owns the document's generation counter. Edits and
//! analysis completions both arrive through its `select!` loop, so the generation captured at
//! dispatch is compared at completion without any edit slipping in between.
//!
//! ```text
//! Idle ──edit──> Pending ──debounce elapsed──> Running ──current result──> Idle
//!                  ^                              │
//!                  └────────────edit──────────────┘   (older result arrives: discarded)
//! ```
//!
//! A rejected edit (blank or oversized text) still takes a generation and returns the session
//! to Idle, so nothing computed for the earlier text is delivered.

use crate::analyzer::DocumentAnalyzer;
use crate::{CoordinatorError, Result};
use log::{debug, info, warn};
use prose_analysis::{validate_text, AnalysisKind};
use prose_protocol::{AnalysisReport, AnalysisRequest};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{self, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Pending,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub document_id: String,
    pub state: SessionState,
    /// Generation of the most recent edit
    pub generation: u64,
    pub last_delivered: Option<u64>,
    pub in_flight: usize,
    pub stale_discarded: u64,
    pub degraded_deliveries: u64,
    pub last_error: Option<String>,
}

impl SessionStatus {
    fn initial(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            state: SessionState::Idle,
            generation: 0,
            last_delivered: None,
            in_flight: 0,
            stale_discarded: 0,
            degraded_deliveries: 0,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1_000),
        }
    }
}

#[derive(Clone)]
pub struct DocumentSession {
    inner: Arc<DocumentSessionInner>,
}

struct DocumentSessionInner {
    document_id: String,
    command_tx: mpsc::Sender<SessionCommand>,
    update_tx: broadcast::Sender<AnalysisReport>,
    status_tx: watch::Sender<SessionStatus>,
}

enum SessionCommand {
    Edit {
        text: String,
        ack: oneshot::Sender<u64>,
    },
    /// Rejected edit: bumps the generation without scheduling analysis
    Invalidate {
        reason: String,
        ack: oneshot::Sender<u64>,
    },
    Flush,
    Shutdown,
}

struct Completion {
    generation: u64,
    result: Result<AnalysisReport>,
}

impl DocumentSession {
    /// Starts the session task. Must be called inside a tokio runtime.
    #[must_use]
    pub fn open(
        document_id: impl Into<String>,
        analyzer: Arc<DocumentAnalyzer>,
        config: SessionConfig,
    ) -> Self {
        let document_id = document_id.into();
        let (command_tx, command_rx) = mpsc::channel(64);
        let (update_tx, _) = broadcast::channel(16);
        let (status_tx, _) = watch::channel(SessionStatus::initial(&document_id));

        spawn_session_loop(
            document_id.clone(),
            analyzer,
            config,
            command_rx,
            update_tx.clone(),
            status_tx.clone(),
        );
        debug!("Opened session for {document_id}");

        Self {
            inner: Arc::new(DocumentSessionInner {
                document_id,
                command_tx,
                update_tx,
                status_tx,
            }),
        }
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.inner.document_id
    }

    /// Records a new snapshot of the document and restarts the debounce timer.
    ///
    /// Returns the generation assigned to this edit. Invalid text is never analyzed: the error
    /// comes back to the caller, but the edit still takes a generation so results computed for
    /// the previous text are discarded.
    pub async fn edit(&self, text: impl Into<String>) -> Result<u64> {
        let text = text.into();
        if let Err(err) = validate_text(&text, AnalysisKind::Suggestions) {
            let (ack, ack_rx) = oneshot::channel();
            self.send(SessionCommand::Invalidate {
                reason: err.to_string(),
                ack,
            })
            .await?;
            ack_rx.await.map_err(|_| self.closed())?;
            return Err(err.into());
        }

        let (ack, ack_rx) = oneshot::channel();
        self.send(SessionCommand::Edit { text, ack }).await?;
        ack_rx.await.map_err(|_| self.closed())
    }

    /// Skips the rest of the debounce window for a pending edit.
    pub async fn flush(&self) -> Result<()> {
        self.send(SessionCommand::Flush).await
    }

    /// Delivered reports, one per generation that was still current on completion.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisReport> {
        self.inner.update_tx.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.inner.status_tx.borrow().clone()
    }

    #[must_use]
    pub fn status_stream(&self) -> watch::Receiver<SessionStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Stops the session task. Analyses still running finish but are never delivered.
    pub async fn close(self) {
        let _ = self.inner.command_tx.send(SessionCommand::Shutdown).await;
    }

    async fn send(&self, command: SessionCommand) -> Result<()> {
        self.inner
            .command_tx
            .send(command)
            .await
            .map_err(|_| self.closed())
    }

    fn closed(&self) -> CoordinatorError {
        CoordinatorError::SessionClosed(self.inner.document_id.clone())
    }
}

impl Drop for DocumentSession {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            let _ = self.inner.command_tx.try_send(SessionCommand::Shutdown);
        }
    }
}

struct DebounceState {
    debounce: Duration,
    deadline: Option<Instant>,
}

impl DebounceState {
    const fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
        }
    }

    fn record_edit(&mut self) {
        self.deadline = Some(Instant::now() + self.debounce);
    }

    fn force_now(&mut self) {
        if self.deadline.is_some() {
            self.deadline = Some(Instant::now());
        }
    }

    const fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn reset(&mut self) {
        self.deadline = None;
    }
}

fn spawn_session_loop(
    document_id: String,
    analyzer: Arc<DocumentAnalyzer>,
    config: SessionConfig,
    mut command_rx: mpsc::Receiver<SessionCommand>,
    update_tx: broadcast::Sender<AnalysisReport>,
    status_tx: watch::Sender<SessionStatus>,
) {
    tokio::spawn(async move {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut debounce = DebounceState::new(config.debounce);
        let mut status = SessionStatus::initial(&document_id);
        let mut latest_text = String::new();

        loop {
            let next_deadline = debounce.next_deadline();

            tokio::select! {
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Edit { text, ack }) => {
                            status.generation += 1;
                            latest_text = text;
                            debounce.record_edit();
                            status.state = SessionState::Pending;
                            status_tx.send_replace(status.clone());
                            let _ = ack.send(status.generation);
                        }
                        Some(SessionCommand::Invalidate { reason, ack }) => {
                            status.generation += 1;
                            latest_text.clear();
                            debounce.reset();
                            status.state = SessionState::Idle;
                            status.last_error = Some(reason);
                            debug!(
                                "Rejected edit of {document_id}; generation {} has no analysis",
                                status.generation
                            );
                            status_tx.send_replace(status.clone());
                            let _ = ack.send(status.generation);
                        }
                        Some(SessionCommand::Flush) => debounce.force_now(),
                        Some(SessionCommand::Shutdown) | None => break,
                    }
                }
                Some(done) = done_rx.recv() => {
                    status.in_flight = status.in_flight.saturating_sub(1);
                    if done.generation == status.generation {
                        status.state = SessionState::Idle;
                        let report = record_completion(&document_id, done, &mut status);
                        status_tx.send_replace(status.clone());
                        if let Some(report) = report {
                            let _ = update_tx.send(report);
                        }
                    } else {
                        status.stale_discarded += 1;
                        debug!(
                            "Discarding stale analysis of {document_id} (generation {} < {})",
                            done.generation, status.generation
                        );
                        status_tx.send_replace(status.clone());
                    }
                }
                () = async {
                    if let Some(deadline) = next_deadline {
                        time::sleep_until(deadline).await;
                    }
                }, if next_deadline.is_some() => {
                    debounce.reset();
                    let request = AnalysisRequest {
                        text: latest_text.clone(),
                        document_id: document_id.clone(),
                        generation: status.generation,
                    };
                    status.state = SessionState::Running;
                    status.in_flight += 1;
                    status_tx.send_replace(status.clone());
                    debug!("Dispatching analysis of {document_id} generation {}", request.generation);

                    let analyzer = analyzer.clone();
                    let done_tx = done_tx.clone();
                    tokio::spawn(async move {
                        let generation = request.generation;
                        let result = analyzer.analyze(&request).await;
                        let _ = done_tx.send(Completion { generation, result });
                    });
                }
            }
        }

        debug!("Session for {document_id} closed");
    });
}

/// Folds a current-generation completion into `status`, returning the report to publish.
fn record_completion(
    document_id: &str,
    done: Completion,
    status: &mut SessionStatus,
) -> Option<AnalysisReport> {
    match done.result {
        Ok(report) => {
            status.last_delivered = Some(done.generation);
            status.last_error = None;
            if report.suggestions.degraded {
                status.degraded_deliveries += 1;
            }
            info!(
                "Analysis of {document_id} generation {} ready: {} suggestions{}",
                done.generation,
                report.suggestions.suggestions.len(),
                if report.suggestions.degraded { " (degraded)" } else { "" }
            );
            Some(report)
        }
        Err(err) => {
            warn!("Analysis of {document_id} generation {} failed: {err}", done.generation);
            status.last_error = Some(err.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{typo_match, ScriptedChecker};
    use pretty_assertions::assert_eq;
    use tokio::sync::broadcast::error::TryRecvError;

    const DEBOUNCE: Duration = Duration::from_millis(100);

    fn session_with(checker: Option<Arc<ScriptedChecker>>) -> DocumentSession {
        let mut analyzer = DocumentAnalyzer::default();
        if let Some(checker) = checker {
            analyzer = analyzer.with_remote(checker);
        }
        DocumentSession::open(
            "d1",
            Arc::new(analyzer),
            SessionConfig { debounce: DEBOUNCE },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_coalesce_into_one_analysis() {
        let checker = Arc::new(ScriptedChecker::returning(vec![]));
        let session = session_with(Some(checker.clone()));
        let mut updates = session.subscribe();

        assert_eq!(session.edit("Teh").await.unwrap(), 1);
        time::sleep(Duration::from_millis(40)).await;
        assert_eq!(session.edit("Teh qick").await.unwrap(), 2);
        time::sleep(Duration::from_millis(40)).await;
        assert_eq!(session.edit("Teh qick brown fox.").await.unwrap(), 3);
        assert_eq!(session.status().state, SessionState::Pending);

        let report = updates.recv().await.unwrap();
        assert_eq!(report.generation, 3);
        assert_eq!(report.suggestions.suggestions.len(), 2);
        assert_eq!(checker.calls(), 1);
        assert_eq!(session.status().state, SessionState::Idle);
        assert_eq!(session.status().last_delivered, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_result_is_never_delivered() {
        let checker = Arc::new(
            ScriptedChecker::returning(vec![typo_match(0, 3, "the")])
                .slow_on("first", Duration::from_secs(10)),
        );
        let session = session_with(Some(checker.clone()));
        let mut updates = session.subscribe();

        session.edit("Teh first draft").await.unwrap();
        time::sleep(DEBOUNCE * 2).await;
        assert_eq!(session.status().state, SessionState::Running);

        session.edit("Teh second draft").await.unwrap();
        assert_eq!(session.status().state, SessionState::Pending);

        let report = updates.recv().await.unwrap();
        assert_eq!(report.generation, 2);

        time::sleep(Duration::from_secs(20)).await;
        assert!(matches!(updates.try_recv(), Err(TryRecvError::Empty)));

        let status = session.status();
        assert_eq!(status.stale_discarded, 1);
        assert_eq!(status.last_delivered, Some(2));
        assert_eq!(status.in_flight, 0);
        assert_eq!(status.state, SessionState::Idle);
        assert_eq!(checker.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_while_running_keeps_session_pending() {
        let checker =
            Arc::new(ScriptedChecker::returning(vec![]).slow_on("slow", Duration::from_secs(5)));
        let session = session_with(Some(checker));

        session.edit("slow text").await.unwrap();
        time::sleep(DEBOUNCE * 2).await;
        session.edit("slow text, edited").await.unwrap();
        time::sleep(Duration::from_secs(5)).await;

        // First run finished as stale; second is still running.
        let status = session.status();
        assert_eq!(status.stale_discarded, 1);
        assert_eq!(status.last_delivered, None);
        assert_eq!(status.state, SessionState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_remote_delivers_degraded_local_results() {
        let session = session_with(None);
        let mut updates = session.subscribe();

        session.edit("Teh qick brown fox.").await.unwrap();
        let report = updates.recv().await.unwrap();

        assert!(report.suggestions.degraded);
        let first = &report.suggestions.suggestions[0];
        assert_eq!((first.start, first.end, first.suggested_text.as_str()), (0, 3, "the"));
        assert_eq!(session.status().degraded_deliveries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_edit_is_rejected_synchronously() {
        let session = session_with(None);
        let mut updates = session.subscribe();
        let err = session.edit("x".repeat(50_001)).await.unwrap_err();
        assert!(err.is_validation());

        time::sleep(DEBOUNCE * 5).await;
        let status = session.status();
        assert_eq!(status.generation, 1);
        assert_eq!(status.state, SessionState::Idle);
        assert_eq!(status.in_flight, 0);
        assert!(status.last_error.is_some());
        assert!(matches!(updates.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_the_document_discards_running_analysis() {
        let checker = Arc::new(
            ScriptedChecker::returning(vec![typo_match(0, 3, "the")])
                .slow_on("fox", Duration::from_secs(5)),
        );
        let session = session_with(Some(checker));
        let mut updates = session.subscribe();

        assert_eq!(session.edit("Teh qick brown fox.").await.unwrap(), 1);
        time::sleep(DEBOUNCE * 2).await;
        assert_eq!(session.status().state, SessionState::Running);

        let err = session.edit("").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.status().generation, 2);

        time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(updates.try_recv(), Err(TryRecvError::Empty)));
        let status = session.status();
        assert_eq!(status.stale_discarded, 1);
        assert_eq!(status.last_delivered, None);
        assert_eq!(status.in_flight, 0);

        // A valid edit afterwards is analyzed normally.
        assert_eq!(session.edit("Teh dog.").await.unwrap(), 3);
        assert_eq!(updates.recv().await.unwrap().generation, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_edit_cancels_pending_debounce() {
        let checker = Arc::new(ScriptedChecker::returning(vec![]));
        let session = session_with(Some(checker.clone()));

        session.edit("Teh qick brown fox.").await.unwrap();
        session.edit("   ").await.unwrap_err();
        time::sleep(DEBOUNCE * 5).await;

        assert_eq!(checker.calls(), 0);
        assert_eq!(session.status().generation, 2);
        assert_eq!(session.status().state, SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_skips_remaining_debounce() {
        let session = DocumentSession::open(
            "d1",
            Arc::new(DocumentAnalyzer::default()),
            SessionConfig {
                debounce: Duration::from_secs(60),
            },
        );
        let mut updates = session.subscribe();
        let started = Instant::now();

        session.edit("Teh qick brown fox.").await.unwrap();
        session.flush().await.unwrap();
        let report = updates.recv().await.unwrap();

        assert_eq!(report.generation, 1);
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_session_rejects_edits() {
        let session = session_with(None);
        let handle = session.clone();
        session.close().await;
        time::sleep(Duration::from_millis(10)).await;

        let err = handle.edit("Teh qick brown fox.").await.unwrap_err();
        assert!(matches!(err, CoordinatorError::SessionClosed(id) if id == "d1"));
    }
}
