use crate::error::ApiError;
use crate::models::{AppConfig, EditSession, SessionId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Trait for edit session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store or replace a session
    async fn upsert(&self, session: EditSession) -> Result<(), ApiError>;

    /// Find session by ID
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<EditSession>, ApiError>;

    /// Remove a session, returning whether it existed
    async fn remove(&self, id: &SessionId) -> Result<bool, ApiError>;

    /// Number of live sessions
    async fn count(&self) -> Result<usize, ApiError>;
}

/// In-memory session storage with bounded size.
///
/// Every session pins its decoded original, so abandoned sessions are
/// reclaimed two ways:
///
/// - A session whose last edit (`updated_at`) is older than the TTL is
///   invisible to lookups and dropped on the next write.
/// - When a write pushes the store past `max_sessions`, the least recently
///   edited sessions are evicted. The session being written is never the
///   one evicted.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, EditSession>>>,
    max_sessions: usize,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(max_sessions: usize, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
            ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.max_sessions,
            Duration::from_secs(config.session_ttl_secs),
        )
    }

    fn is_expired(&self, session: &EditSession, now: DateTime<Utc>) -> bool {
        // A timestamp in the future (clock skew) converts to Err: not expired
        (now - session.updated_at)
            .to_std()
            .is_ok_and(|idle| idle > self.ttl)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn upsert(&self, session: EditSession) -> Result<(), ApiError> {
        let now = Utc::now();
        let id = session.id.clone();
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), session);

        let before = sessions.len();
        sessions.retain(|key, s| *key == id || !self.is_expired(s, now));
        let expired = before - sessions.len();

        let mut evicted = 0;
        while sessions.len() > self.max_sessions {
            let oldest = sessions
                .iter()
                .filter(|(key, _)| **key != id)
                .min_by_key(|(_, s)| s.updated_at)
                .map(|(key, _)| key.clone());
            let Some(oldest) = oldest else { break };
            sessions.remove(&oldest);
            evicted += 1;
        }

        if expired > 0 || evicted > 0 {
            tracing::info!(expired, evicted, live = sessions.len(), "Dropped idle sessions");
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<EditSession>, ApiError> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();
        Ok(sessions
            .get(id)
            .filter(|s| !self.is_expired(s, now))
            .cloned())
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, ApiError> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        Ok(sessions
            .remove(id)
            .is_some_and(|s| !self.is_expired(&s, now)))
    }

    async fn count(&self) -> Result<usize, ApiError> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();
        Ok(sessions.values().filter(|s| !self.is_expired(s, now)).count())
    }
}
