//! In-memory session store.
//!
//! Maps opaque session identifiers to conversation transcripts. Transcripts
//! are created lazily on first reference, append-only, and live only as long
//! as the process (no persistence across restarts).
//!
//! ## Locking discipline
//!
//! The identifier map sits behind an [`RwLock`]; each session owns its
//! transcript behind its own [`Mutex`]. Chat calls hold the per-session
//! mutex for the whole read-compose-append cycle, so concurrent calls on the
//! same session serialize while different sessions proceed independently.
//! `delete` detaches the entry under the map write lock: an in-flight chat
//! call finishes against the detached transcript, which is then dropped, so
//! a delete racing an append is always observed as "delete wins".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Display label used when rendering transcript history into a prompt.
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One message in a transcript. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A single conversation context owning its transcript.
#[derive(Debug, Default)]
pub struct Session {
    transcript: Mutex<Vec<Turn>>,
}

impl Session {
    /// Lock the transcript for a read-compose-append cycle.
    pub async fn lock(&self) -> MutexGuard<'_, Vec<Turn>> {
        self.transcript.lock().await
    }

    /// Number of turns currently in the transcript.
    pub async fn len(&self) -> usize {
        self.transcript.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Store of active sessions.
///
/// Constructed once at process start and injected into request handlers.
/// No eviction, TTL, or size bound.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session, creating it (and its id, when absent or empty)
    /// as needed. Never fails.
    pub async fn resolve_or_create(&self, id: Option<&str>) -> (String, Arc<Session>) {
        let id = match id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(id.clone())
            .or_insert_with(|| {
                tracing::debug!(session_id = %id, "Session created");
                Arc::new(Session::default())
            })
            .clone();

        (id, session)
    }

    /// Get an existing session without creating one.
    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Remove a session. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Remove every session. Returns the number removed.
    pub async fn clear_all(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        count
    }

    /// Number of active sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Identifiers of all active sessions.
    pub async fn list_ids(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }
}
