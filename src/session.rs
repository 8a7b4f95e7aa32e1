//! # Sessions
//!
//! Per-user quiz progress.
//!
//! The browser only ever holds an opaque UUID cookie; the state itself
//! lives server-side in one map, partitioned per user, so no request ever
//! contends with another session's writes. Handlers load the state, hand
//! it to the quiz logic by value, and store it back.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Cookie carrying the opaque session id.
pub const SESSION_COOKIE: &str = "park_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Cursor into the catalog, `0..=TOTAL_SCENARIOS`. Equal to the
    /// catalog length once the quiz is complete.
    pub position: usize,
    /// Scenario id (as text) to recorded answer. Overwrite on duplicate.
    pub decisions: HashMap<String, bool>,
    /// Correlation key attached to forwarded votes. Stable for the
    /// session's lifetime.
    pub session_uuid: Uuid,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            position: 0,
            decisions: HashMap::new(),
            session_uuid: Uuid::new_v4(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionState>>,
}

impl SessionStore {
    pub async fn load(&self, id: Uuid) -> Option<SessionState> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn save(&self, id: Uuid, state: SessionState) {
        self.sessions.write().await.insert(id, state);
    }

    pub async fn remove(&self, id: Uuid) {
        self.sessions.write().await.remove(&id);
    }
}
