use std::collections::HashMap;
use std::sync::RwLock;

use super::{SessionStore, StoreError};
use crate::models::Session;

/// Process-local session map. Sessions are lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("session map lock poisoned".into())
}

impl SessionStore for MemorySessionStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, user_id: &str) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions.get(user_id).cloned())
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        sessions.insert(session.user_id.clone(), session.clone());
        Ok(())
    }

    fn remove(&self, user_id: &str) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        Ok(sessions.remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_overwrites_previous_state() {
        let store = MemorySessionStore::new();
        let mut session = Session::new("u1");
        store.save(&session).unwrap();
        session.onboarding_step = 2;
        store.save(&session).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("u1").unwrap().unwrap().onboarding_step, 2);
    }

    #[test]
    fn users_are_isolated() {
        let store = MemorySessionStore::new();
        let mut a = Session::new("a");
        a.emergency_mode = true;
        store.save(&a).unwrap();
        store.save(&Session::new("b")).unwrap();
        assert!(store.load("a").unwrap().unwrap().emergency_mode);
        assert!(!store.load("b").unwrap().unwrap().emergency_mode);
        store.remove("a").unwrap();
        assert!(store.load("b").unwrap().is_some());
    }

    #[test]
    fn empty_store() {
        let store = MemorySessionStore::new();
        assert!(store.is_empty());
        assert!(store.load("nobody").unwrap().is_none());
    }
}
