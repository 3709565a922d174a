// Live interview sessions. Redis in production, an in-process map in tests.

pub mod redis_store;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::interview::InterviewSession;

pub use redis_store::RedisSessionStore;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Session store lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<InterviewSession>, SessionStoreError>;

    /// Inserts or replaces the session and refreshes its expiry.
    async fn put(&self, session: &InterviewSession) -> Result<(), SessionStoreError>;
}

/// Sessions kept in memory for the lifetime of the process. Never expire.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, InterviewSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: Uuid) -> Result<Option<InterviewSession>, SessionStoreError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionStoreError::Poisoned)?;
        Ok(sessions.get(&id).cloned())
    }

    async fn put(&self, session: &InterviewSession) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .map_err(|_| SessionStoreError::Poisoned)?
            .insert(session.id, session.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_replaces_stored_session() {
        let store = InMemorySessionStore::new();
        let mut session = InterviewSession::new("Ada", "Backend Engineer");
        store.put(&session).await.unwrap();

        session.turn_count = 3;
        store.put(&session).await.unwrap();

        let loaded = store.get(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.turn_count, 3);
        assert_eq!(loaded.candidate_name, "Ada");
    }

    #[tokio::test]
    async fn test_unknown_session_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
