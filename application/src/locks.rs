//! Per-session command serialization.
//!
//! One operator console mutates while any number of displays poll; all
//! mutating commands on a given session must serialize so that, for
//! example, two concurrent `start` calls cannot both pass the
//! single-active-item check. Reads never take these locks.

use plenum_domain::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per session.
#[derive(Default)]
pub struct SessionLocks {
    inner: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the session's lock, creating it on first use. The guard is
    /// held for the whole load-mutate-save critical section.
    pub async fn acquire(&self, id: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry for a removed session. No-op while any command
    /// still holds or awaits the lock; a later command on the same id
    /// would simply recreate the entry.
    pub async fn release(&self, id: &SessionId) {
        let mut map = self.inner.lock().await;
        if let Some(lock) = map.get(id)
            && Arc::strong_count(lock) == 1
        {
            map.remove(id);
        }
    }
}
