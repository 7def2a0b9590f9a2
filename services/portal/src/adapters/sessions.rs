//! services/portal/src/adapters/sessions.rs
//!
//! In-process implementation of the `SessionStore` port. Login sessions only
//! live as long as the server process; nothing is written to the store.

use async_trait::async_trait;
use attendance_core::domain::{AuthSession, UserId};
use attendance_core::ports::{PortError, PortResult, SessionStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, AuthSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let now = Utc::now();
        let session = AuthSession {
            token: token.to_string(),
            user_id,
            expires_at,
        };
        let mut sessions = self.sessions.write().await;
        // Abandoned sessions are never looked up again, so sweep them here.
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }
        sessions.insert(token.to_string(), session);
        debug!("Session opened for user {}", user_id);
        Ok(())
    }

    async fn validate_session(&self, token: &str) -> PortResult<UserId> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return Err(PortError::Unauthorized),
                Some(session) if !session.is_expired_at(now) => return Ok(session.user_id),
                Some(_) => {}
            }
        }

        // Expired: evict under the write lock, re-checking in case it was renewed.
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(token) {
            if session.is_expired_at(now) {
                debug!("Session for user {} expired", session.user_id);
                sessions.remove(token);
            } else {
                return Ok(session.user_id);
            }
        }
        Err(PortError::Unauthorized)
    }

    async fn delete_session(&self, token: &str) -> PortResult<()> {
        if let Some(session) = self.sessions.write().await.remove(token) {
            debug!("Session closed for user {}", session.user_id);
        }
        Ok(())
    }
}
