pub mod locks;
pub mod memory;
pub mod sqlite;

pub use locks::UserLocks;
pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use thiserror::Error;

use crate::models::Session;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored session for {user_id} is unreadable: {reason}")]
    Corrupt { user_id: String, reason: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Key-value persistence for per-user sessions.
///
/// Backends implement `load`/`save`/`remove`; the dialogue layer uses the
/// provided `get`/`put`/`clear`/`snapshot` operations. Callers serialize
/// access per user through [`UserLocks`], so backends only need to be
/// internally consistent per call.
pub trait SessionStore: Send + Sync {
    /// Backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    fn load(&self, user_id: &str) -> Result<Option<Session>, StoreError>;

    fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Returns whether a session existed.
    fn remove(&self, user_id: &str) -> Result<bool, StoreError>;

    /// Current session, or a fresh step-0 session if none exists.
    /// Does not persist the fresh session.
    fn get(&self, user_id: &str) -> Result<Session, StoreError> {
        Ok(self
            .load(user_id)?
            .unwrap_or_else(|| Session::new(user_id)))
    }

    /// Stamp and persist a session under its own user id.
    fn put(&self, session: &mut Session) -> Result<(), StoreError> {
        session.touch();
        self.save(session)
    }

    fn clear(&self, user_id: &str) -> Result<bool, StoreError> {
        self.remove(user_id)
    }

    /// Read-only view; absence is preserved rather than defaulted.
    fn snapshot(&self, user_id: &str) -> Result<Option<Session>, StoreError> {
        self.load(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_defaults_without_persisting() {
        let store = MemorySessionStore::new();
        let session = store.get("u1").unwrap();
        assert_eq!(session.onboarding_step, 0);
        assert!(store.snapshot("u1").unwrap().is_none());
    }

    #[test]
    fn put_then_snapshot_returns_state() {
        let store = MemorySessionStore::new();
        let mut session = store.get("u1").unwrap();
        session.medication_streak = 5;
        let before = session.updated_at;
        store.put(&mut session).unwrap();
        let stored = store.snapshot("u1").unwrap().unwrap();
        assert_eq!(stored.medication_streak, 5);
        assert!(stored.updated_at >= before);
    }

    #[test]
    fn clear_removes_session() {
        let store = MemorySessionStore::new();
        let mut session = store.get("u1").unwrap();
        store.put(&mut session).unwrap();
        assert!(store.clear("u1").unwrap());
        assert!(store.snapshot("u1").unwrap().is_none());
        assert!(!store.clear("u1").unwrap());
    }

    #[test]
    fn rusqlite_errors_map_to_unavailable() {
        let err: StoreError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
