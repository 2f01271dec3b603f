use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Prune idle lock entries once the map grows past this many users.
const PRUNE_THRESHOLD: usize = 1024;

/// One async mutex per user id.
///
/// Holding the guard serializes the whole get → route → complete → put
/// sequence for that user; different users never contend.
#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s session.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = self.entry(user_id);
        lock.lock_owned().await
    }

    fn entry(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks.len() > PRUNE_THRESHOLD {
            // Entries referenced only by the map are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    pub fn tracked_users(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_user_is_serialized() {
        let locks = UserLocks::new();
        let guard = locks.acquire("u1").await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire("u1")).await;
        assert!(second.is_err(), "second acquire should wait");
        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.acquire("u1")).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn different_users_do_not_contend() {
        let locks = UserLocks::new();
        let _a = locks.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = UserLocks::new();
        for i in 0..=PRUNE_THRESHOLD {
            drop(locks.acquire(&format!("user-{i}")).await);
        }
        assert_eq!(locks.tracked_users(), PRUNE_THRESHOLD + 1);
        let _held = locks.acquire("trigger").await;
        assert_eq!(locks.tracked_users(), 1);
    }
}
