use crate::config::EngineConfig;
use crate::retry::{retry_transient, RetryPolicy};
use crate::Result;
use log::debug;
use prose_analysis::{
    limits, readability_from_metrics, validate_text, AnalysisError, AnalysisKind, TextMetrics,
    ToneClassifier,
};
use prose_protocol::{AnalysisReport, AnalysisRequest, SuggestionReport, REPORT_SCHEMA_VERSION};
use prose_suggest::{
    fetch_remote_suggestions, reconcile, GrammarChecker, HttpGrammarChecker, LocalDictionary,
    RemoteOutcome, DEFAULT_LANGUAGE,
};
use std::sync::Arc;

/// Runs the full analysis of one text snapshot: tone, readability and reconciled suggestions.
///
/// Stateless between calls; shared by every session through an `Arc`.
pub struct DocumentAnalyzer {
    checker: Option<Arc<dyn GrammarChecker>>,
    dictionary: LocalDictionary,
    tone: ToneClassifier,
    retry: RetryPolicy,
    language: String,
}

impl Default for DocumentAnalyzer {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl DocumentAnalyzer {
    /// Analyzer without a remote checker; suggestions are always degraded.
    #[must_use]
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            checker: None,
            dictionary: LocalDictionary::new(),
            tone: ToneClassifier::new(),
            retry,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        let analyzer = Self::new(config.retry_policy()).with_language(&config.remote.language);
        match config.remote.url.as_deref() {
            Some(url) => analyzer.with_remote(Arc::new(HttpGrammarChecker::new(url))),
            None => analyzer,
        }
    }

    #[must_use]
    pub fn with_remote(mut self, checker: Arc<dyn GrammarChecker>) -> Self {
        self.checker = Some(checker);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    #[must_use]
    pub const fn has_remote(&self) -> bool {
        self.checker.is_some()
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Remote outcome after retries. Never an error: failures become `RemoteOutcome::Failed`.
    async fn remote_outcome(&self, text: &str) -> RemoteOutcome {
        let Some(checker) = self.checker.as_deref() else {
            return RemoteOutcome::Unavailable;
        };
        let language = self.language.as_str();
        retry_transient(&self.retry, move |attempt| {
            debug!("Remote check attempt {}", attempt + 1);
            fetch_remote_suggestions(checker, text, language)
        })
        .await
        .into()
    }

    async fn reconciled(&self, text: &str) -> SuggestionReport {
        let remote = self.remote_outcome(text).await;
        reconcile(remote, self.dictionary.check(text))
    }

    /// Suggestions for `text`, validated as a standalone request.
    pub async fn suggestions(&self, text: &str) -> Result<SuggestionReport> {
        validate_text(text, AnalysisKind::Suggestions)?;
        Ok(self.reconciled(text).await)
    }

    /// Full report for `request`.
    ///
    /// Oversized or blank text is rejected. Tone and readability are left out, rather than
    /// failing the whole report, when the text is below their minimum length or has nothing
    /// to measure.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let text = request.text.as_str();
        validate_text(text, AnalysisKind::Suggestions)?;

        let tone = limits::meets_minimum(text, AnalysisKind::Tone)
            .then(|| self.tone.classify(text));

        let readability = if limits::meets_minimum(text, AnalysisKind::Readability) {
            match readability_from_metrics(&TextMetrics::compute(text)) {
                Ok(report) => Some(report),
                Err(AnalysisError::InvalidInput(reason)) => {
                    debug!("Skipping readability for {}: {reason}", request.document_id);
                    None
                }
                Err(err) => return Err(err.into()),
            }
        } else {
            None
        };

        let suggestions = self.reconciled(text).await;

        Ok(AnalysisReport {
            schema_version: REPORT_SCHEMA_VERSION,
            document_id: request.document_id.clone(),
            generation: request.generation,
            tone,
            readability,
            suggestions,
        })
    }
}
