//! The signed-in user, shared across services.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::users::User;

pub mod storage;

pub use storage::{FileStorage, LocalStorage, MemoryStorage};

pub const SESSION_KEY: &str = "currentUser";

#[derive(Clone)]
pub struct SessionState {
    current: Arc<watch::Sender<Option<User>>>,
    storage: Arc<dyn LocalStorage>,
}

impl SessionState {
    /// Restores a previously persisted session. A stored value that no longer
    /// parses is dropped.
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        let restored = restore(storage.as_ref());
        if let Some(user) = &restored {
            log::info!("Restored session for user {}.", user.id);
        }

        let (current, _) = watch::channel(restored);

        Self {
            current: Arc::new(current),
            storage,
        }
    }

    pub fn current(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    /// Persists and publishes `user`; `None` clears both.
    pub fn set(&self, user: Option<User>) {
        let persisted = match &user {
            Some(user) => serde_json::to_string(user)
                .map_err(anyhow::Error::from)
                .and_then(|raw| self.storage.set_item(SESSION_KEY, &raw)),
            None => self.storage.remove_item(SESSION_KEY),
        };

        if let Err(e) = persisted {
            log::error!("Could not persist session: {}", e);
        }

        self.current.send_replace(user);
    }

    pub fn clear(&self) {
        self.set(None);
    }
}

fn restore(storage: &dyn LocalStorage) -> Option<User> {
    let raw = storage.get_item(SESSION_KEY)?;

    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Discarding unreadable stored session: {}", e);
            if let Err(e) = storage.remove_item(SESSION_KEY) {
                log::error!("Could not remove stored session: {}", e);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: 7,
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_starts_empty_without_stored_session() {
        let session = SessionState::new(Arc::new(MemoryStorage::new()));

        assert!(!session.is_authenticated());
        assert_eq!(session.current(), None);
    }

    #[test]
    fn test_set_persists_and_restores() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        let session = SessionState::new(storage.clone());
        let user = user();

        session.set(Some(user.clone()));
        assert!(storage.get_item(SESSION_KEY).is_some());

        let restored = SessionState::new(storage);
        assert_eq!(restored.current(), Some(user));
    }

    #[test]
    fn test_unreadable_session_is_discarded() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        storage.set_item(SESSION_KEY, "{not json").unwrap();

        let session = SessionState::new(storage.clone());

        assert_eq!(session.current(), None);
        assert_eq!(storage.get_item(SESSION_KEY), None);
    }

    #[test]
    fn test_clear_removes_persisted_session() {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
        let session = SessionState::new(storage.clone());
        session.set(Some(user()));

        session.clear();

        assert_eq!(session.current(), None);
        assert_eq!(storage.get_item(SESSION_KEY), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let session = SessionState::new(Arc::new(MemoryStorage::new()));
        let mut receiver = session.subscribe();

        session.set(Some(user()));
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().as_ref().map(|u| u.id), Some(7));

        session.clear();
        receiver.changed().await.unwrap();
        assert!(receiver.borrow().is_none());
    }
}
