use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;
use uuid::Uuid;

use super::{SessionStore, SessionStoreError};
use crate::interview::InterviewSession;

const KEY_PREFIX: &str = "interview:session:";

fn session_key(id: Uuid) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// Sessions serialized as JSON strings with a sliding TTL.
pub struct RedisSessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, id: Uuid) -> Result<Option<InterviewSession>, SessionStoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(session_key(id)).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(SessionStoreError::from)
    }

    async fn put(&self, session: &InterviewSession) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(session_key(session.id), json, self.ttl_secs).await?;
        debug!(session_id = %session.id, ttl = self.ttl_secs, "Session stored");
        Ok(())
    }
}
