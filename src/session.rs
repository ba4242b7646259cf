//! Per-caller document sessions.
//!
//! Each session id owns at most one processed document. An upload replaces
//! only its own session's entry; the swap happens under a short write lock
//! after the document is fully built, so readers see either the old or the
//! new document, never a partial one.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::rag::ProcessedDocument;

/// Request header carrying the caller's session id.
pub const SESSION_HEADER: &str = "x-session-id";
/// Session used when the caller sends no header.
pub const DEFAULT_SESSION: &str = "default";

const MAX_SESSION_ID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Validate a caller-supplied id; `None` or blank selects the default session.
    pub fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(Self(DEFAULT_SESSION.to_string()));
        }
        let valid_chars = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if raw.len() > MAX_SESSION_ID_LEN || !valid_chars {
            return Err(ApiError::validation(format!(
                "Invalid {SESSION_HEADER}: use up to {MAX_SESSION_ID_LEN} characters of A-Z, a-z, 0-9, '-' or '_'"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(SESSION_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| ApiError::validation(format!("{SESSION_HEADER} must be ASCII")))?,
            ),
            None => None,
        };
        SessionId::parse(header)
    }
}

/// One caller's current document.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub document: ProcessedDocument,
    pub uploaded_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, document: ProcessedDocument) -> Self {
        Self {
            id,
            document,
            uploaded_at: Utc::now(),
        }
    }
}

/// All live sessions, bounded by `max_sessions`.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Install `session`, replacing whatever that id held before. Returns the
    /// replaced session. A new id beyond capacity evicts the oldest upload.
    pub fn replace(&self, session: Session) -> Option<Arc<Session>> {
        let mut sessions = self.sessions.write();

        if !sessions.contains_key(&session.id) && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.uploaded_at)
                .map(|s| s.id.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                tracing::warn!(
                    "Session limit ({}) reached, evicted session {oldest}",
                    self.max_sessions
                );
            }
        }

        let id = session.id.clone();
        let previous = sessions.insert(id.clone(), Arc::new(session));
        drop(sessions);

        if previous.is_some() {
            tracing::info!("Session {id} document replaced");
        } else {
            tracing::info!("Session {id} created");
        }
        previous
    }

    pub fn remove(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::AnswerChain;
    use async_trait::async_trait;
    use uuid::Uuid;

    struct EchoChain;

    #[async_trait]
    impl AnswerChain for EchoChain {
        async fn query(&self, question: &str) -> anyhow::Result<String> {
            Ok(question.to_string())
        }
    }

    fn session(id: &str, text: &str) -> Session {
        Session::new(
            SessionId::parse(Some(id)).unwrap(),
            ProcessedDocument {
                id: Uuid::new_v4(),
                filename: format!("{id}.pdf"),
                text: text.to_string(),
                page_count: 1,
                chunk_count: 1,
                chain: Arc::new(EchoChain),
            },
        )
    }

    #[test]
    fn test_parse_default_when_missing_or_blank() {
        assert_eq!(SessionId::parse(None).unwrap().as_str(), DEFAULT_SESSION);
        assert_eq!(SessionId::parse(Some("  ")).unwrap().as_str(), DEFAULT_SESSION);
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert!(SessionId::parse(Some("../etc")).is_err());
        assert!(SessionId::parse(Some(&"a".repeat(65))).is_err());
        assert!(SessionId::parse(Some("team-a_01")).is_ok());
    }

    #[test]
    fn test_replace_only_touches_own_session() {
        let store = SessionStore::new(8);
        store.replace(session("alice", "alice text"));
        store.replace(session("bob", "bob text"));

        let previous = store.replace(session("alice", "alice v2"));
        assert_eq!(previous.unwrap().document.text, "alice text");

        let bob = SessionId::parse(Some("bob")).unwrap();
        assert_eq!(store.get(&bob).unwrap().document.text, "bob text");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reader_keeps_old_document_after_replace() {
        let store = SessionStore::new(8);
        store.replace(session("alice", "v1"));
        let id = SessionId::parse(Some("alice")).unwrap();

        let held = store.get(&id).unwrap();
        store.replace(session("alice", "v2"));
        assert_eq!(held.document.text, "v1");
        assert_eq!(store.get(&id).unwrap().document.text, "v2");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = SessionStore::new(2);
        let mut first = session("first", "1");
        first.uploaded_at = Utc::now() - chrono::Duration::minutes(5);
        store.replace(first);
        store.replace(session("second", "2"));
        store.replace(session("third", "3"));

        assert_eq!(store.len(), 2);
        assert!(store.get(&SessionId::parse(Some("first")).unwrap()).is_none());
        assert!(store.get(&SessionId::parse(Some("third")).unwrap()).is_some());
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new(2);
        store.replace(session("gone", "x"));
        let id = SessionId::parse(Some("gone")).unwrap();
        assert!(store.remove(&id).is_some());
        assert!(store.remove(&id).is_none());
        assert!(store.is_empty());
    }
}
