//! Per-draft mutation locks.
//!
//! Every state-changing handler holds the draft's lock for the duration of
//! the repository call and the event publish. The database's row lock
//! already serializes the mutation itself; this lock additionally covers
//! the publish, so subscribers observe one draft's events in commit order.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Registry of one async mutex per draft id.
///
/// Entries are created on first use and kept for the life of the process;
/// the map is bounded by the number of distinct drafts seen, which is small
/// relative to the scan traffic they serialize.
pub struct DraftLocks {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl DraftLocks {
    /// Create an empty lock registry.
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Acquire the lock for `draft_id`, waiting if another request holds it.
    ///
    /// The returned guard is owned, so it can be held across await points
    /// without borrowing `self`.
    pub async fn acquire(&self, draft_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.write().await;
            Arc::clone(
                locks
                    .entry(draft_id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Number of drafts that have ever been locked.
    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }

    /// Whether no draft has been locked yet.
    pub async fn is_empty(&self) -> bool {
        self.locks.read().await.is_empty()
    }
}

impl Default for DraftLocks {
    fn default() -> Self {
        Self::new()
    }
}
