use crate::analyzer::DocumentAnalyzer;
use crate::session::{DocumentSession, SessionConfig};
use crate::{CoordinatorError, Result};
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

/// Open documents keyed by id. Sessions share one analyzer but nothing else.
pub struct SessionRegistry {
    analyzer: Arc<DocumentAnalyzer>,
    config: SessionConfig,
    sessions: HashMap<String, DocumentSession>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(analyzer: Arc<DocumentAnalyzer>, config: SessionConfig) -> Self {
        Self {
            analyzer,
            config,
            sessions: HashMap::new(),
        }
    }

    /// Returns the session for `document_id`, starting one if needed.
    pub fn open(&mut self, document_id: &str) -> DocumentSession {
        if let Some(session) = self.sessions.get(document_id) {
            return session.clone();
        }
        info!("Opening document {document_id}");
        let session = DocumentSession::open(document_id, self.analyzer.clone(), self.config);
        self.sessions
            .insert(document_id.to_string(), session.clone());
        session
    }

    #[must_use]
    pub fn get(&self, document_id: &str) -> Option<&DocumentSession> {
        self.sessions.get(document_id)
    }

    pub async fn edit(&self, document_id: &str, text: impl Into<String>) -> Result<u64> {
        let session = self
            .sessions
            .get(document_id)
            .ok_or_else(|| CoordinatorError::UnknownDocument(document_id.to_string()))?;
        session.edit(text).await
    }

    /// Closes and forgets the session. Returns false if it was not open.
    pub async fn close(&mut self, document_id: &str) -> bool {
        match self.sessions.remove(document_id) {
            Some(session) => {
                info!("Closing document {document_id}");
                session.close().await;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[must_use]
    pub fn document_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
