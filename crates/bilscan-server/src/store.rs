//! Session-keyed storage for finished scan batches.
//!
//! A session holds at most one batch. Storing a new batch replaces the old
//! one, and entries older than the configured TTL are treated as gone.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bilscan_core::Batch;
use tokio::sync::RwLock;
use uuid::Uuid;

struct StoredBatch {
    batch: Arc<Batch>,
    stored_at: Instant,
}

impl StoredBatch {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

#[derive(Clone)]
pub struct BatchStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredBatch>>>,
    ttl: Duration,
}

impl BatchStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores `batch` for `session`, replacing any earlier batch.
    pub async fn put(&self, session: Uuid, batch: Batch) {
        let entry = StoredBatch {
            batch: Arc::new(batch),
            stored_at: Instant::now(),
        };
        self.sessions.write().await.insert(session, entry);
    }

    /// Returns the session's batch, or `None` if there is none or it has
    /// expired. Expired entries are evicted on the way out.
    pub async fn get(&self, session: Uuid) -> Option<Arc<Batch>> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&session) {
                None => return None,
                Some(entry) if !entry.is_expired(self.ttl) => {
                    return Some(Arc::clone(&entry.batch));
                }
                Some(_) => {}
            }
        }
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&session)
            .is_some_and(|entry| entry.is_expired(self.ttl))
        {
            sessions.remove(&session);
            tracing::debug!(%session, "evicted expired session batch");
        }
        None
    }

    /// Drops the session's batch. Returns whether one was stored.
    pub async fn clear(&self, session: Uuid) -> bool {
        self.sessions.write().await.remove(&session).is_some()
    }

    /// Evicts every expired batch and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(self.ttl));
        before - sessions.len()
    }
}
