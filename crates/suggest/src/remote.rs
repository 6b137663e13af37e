//! Adapter over an external grammar checker.
//!
//! The checker is a black box behind [`GrammarChecker`]; [`HttpGrammarChecker`] talks to a
//! LanguageTool-compatible `/v2/check` endpoint. Matches are mapped to [`Suggestion`]s with
//! character offsets into the checked text.

use crate::span::{char_len, char_slice};
use crate::{Result, SourceError};
use async_trait::async_trait;
use log::{debug, warn};
use prose_protocol::{IssueType, Suggestion, SuggestionSource};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub matches: Vec<RemoteMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMatch {
    #[serde(default)]
    pub message: String,
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    #[serde(default)]
    pub rule: RemoteRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub category: RemoteCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCategory {
    #[serde(default)]
    pub id: String,
}

/// A single request/response grammar check.
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    async fn check(&self, text: &str, language: &str) -> Result<Vec<RemoteMatch>>;
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Issue type from rule and category identifiers. Spelling beats style beats clarity; anything
/// unrecognised is grammar.
#[must_use]
pub fn classify_issue(rule_id: &str, category_id: &str) -> IssueType {
    let haystack = format!("{} {}", category_id.to_lowercase(), rule_id.to_lowercase());

    if contains_any(&haystack, &["typo", "spell"]) {
        IssueType::Spelling
    } else if contains_any(&haystack, &["style", "redundancy"]) {
        IssueType::Style
    } else if contains_any(&haystack, &["clarity", "confused"]) {
        IssueType::Clarity
    } else {
        IssueType::Grammar
    }
}

/// Maps checker matches onto `text`. Matches whose span does not fit the text are dropped.
#[must_use]
pub fn map_matches(text: &str, matches: Vec<RemoteMatch>) -> Vec<Suggestion> {
    let len = char_len(text);
    let mut out = Vec::with_capacity(matches.len());

    for (idx, m) in matches.into_iter().enumerate() {
        let start = m.offset;
        let Some(end) = start.checked_add(m.length).filter(|end| *end <= len) else {
            warn!(
                "Dropping remote match {} at {}+{}: outside text of {len} characters",
                m.rule.id, m.offset, m.length
            );
            continue;
        };
        let original = char_slice(text, start, end).unwrap_or_default().to_string();
        let suggested = m
            .replacements
            .into_iter()
            .next()
            .map_or_else(|| original.clone(), |r| r.value);

        out.push(Suggestion {
            id: format!("remote-{idx}-{start}-{end}"),
            start,
            end,
            issue_type: classify_issue(&m.rule.id, &m.rule.category.id),
            original_text: original,
            suggested_text: suggested,
            explanation: m.message,
            source: SuggestionSource::Remote,
        });
    }
    out
}

/// Runs one check and maps the result. No retry here; see the coordinator's retry policy.
pub async fn fetch_remote_suggestions(
    checker: &dyn GrammarChecker,
    text: &str,
    language: &str,
) -> Result<Vec<Suggestion>> {
    let matches = checker.check(text, language).await?;
    debug!("Remote checker returned {} matches", matches.len());
    Ok(map_matches(text, matches))
}

/// HTTP client for a LanguageTool-compatible service.
#[derive(Debug, Clone)]
pub struct HttpGrammarChecker {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGrammarChecker {
    /// `base_url` is the service root, e.g. `http://localhost:8081`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/v2/check", base_url.trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GrammarChecker for HttpGrammarChecker {
    async fn check(&self, text: &str, language: &str) -> Result<Vec<RemoteMatch>> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("text", text), ("language", language)])
            .send()
            .await
            .map_err(|err| {
                SourceError::Transient(format!("network error contacting grammar service: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::classify(format!(
                "grammar service returned HTTP {status}"
            )));
        }

        let body = response.bytes().await.map_err(|err| {
            SourceError::Transient(format!("network error reading grammar response: {err}"))
        })?;
        let parsed: CheckResponse = serde_json::from_slice(&body)
            .map_err(|err| SourceError::Permanent(format!("malformed grammar response: {err}")))?;
        Ok(parsed.matches)
    }
}
