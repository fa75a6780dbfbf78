//! Session store: one `ConversationState` per client session, kept in memory only.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::conversation::state::ConversationState;
use crate::errors::AppError;

pub const SESSION_HEADER: &str = "x-session-id";
/// Used when a client sends no session header, so single-user clients keep working.
pub const DEFAULT_SESSION: &str = "default";
const MAX_SESSION_KEY_LEN: usize = 128;

/// Handle to one session's state. Lock it for the duration of a state mutation only.
pub type SessionHandle = Arc<Mutex<ConversationState>>;

struct SessionEntry {
    state: SessionHandle,
    last_active: DateTime<Utc>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `key`, creating an empty one on first use.
    pub async fn get_or_create(&self, key: &str) -> SessionHandle {
        self.get_or_create_at(key, Utc::now()).await
    }

    async fn get_or_create_at(&self, key: &str, now: DateTime<Utc>) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(key.to_string()).or_insert_with(|| SessionEntry {
            state: Arc::new(Mutex::new(ConversationState::default())),
            last_active: now,
        });
        entry.last_active = now;
        Arc::clone(&entry.state)
    }

    /// Drops sessions idle for longer than `max_idle`. Returns how many were removed.
    pub async fn evict_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_active <= max_idle);
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Spawns the background sweeper. A TTL of zero minutes disables eviction.
pub fn spawn_idle_sweeper(store: Arc<SessionStore>, idle_minutes: i64) {
    if idle_minutes <= 0 {
        info!("Session eviction disabled");
        return;
    }
    let max_idle = Duration::minutes(idle_minutes);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(max_idle, Utc::now()).await;
            if evicted > 0 {
                info!(
                    "Evicted {evicted} idle session(s), {} still active",
                    store.active_count().await
                );
            }
        }
    });
}

/// Session key extracted from the `x-session-id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SESSION_HEADER) else {
            return Ok(SessionKey(DEFAULT_SESSION.to_string()));
        };
        let key = value
            .to_str()
            .map_err(|_| AppError::Validation(format!("{SESSION_HEADER} must be ASCII")))?
            .trim();
        if key.is_empty()
            || key.len() > MAX_SESSION_KEY_LEN
            || !key.chars().all(|c| c.is_ascii_graphic())
        {
            return Err(AppError::Validation(format!(
                "{SESSION_HEADER} must be 1-{MAX_SESSION_KEY_LEN} visible ASCII characters"
            )));
        }
        Ok(SessionKey(key.to_string()))
    }
}
