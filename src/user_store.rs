//! Local registry of users who started account creation from the chat.
//!
//! Kept behind a trait so the in-memory map can later be swapped for a real
//! persistence layer without touching the handlers.

use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub telegram_id: i64,
    pub name: String,
}

impl StoredUser {
    pub fn new(telegram_id: i64, name: &str) -> Self {
        let name = if name.is_empty() { "Unknown" } else { name };
        Self {
            telegram_id,
            name: name.to_string(),
        }
    }
}

pub trait UserStore: Send + Sync {
    fn lookup_user(&self, telegram_id: i64) -> Option<StoredUser>;
    fn register_user(&self, telegram_id: i64, name: &str);
}

/// Mutex-guarded map, good enough for a single bot process.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<i64, StoredUser>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn lookup_user(&self, telegram_id: i64) -> Option<StoredUser> {
        self.users
            .lock()
            .expect("user store lock poisoned")
            .get(&telegram_id)
            .cloned()
    }

    fn register_user(&self, telegram_id: i64, name: &str) {
        self.users
            .lock()
            .expect("user store lock poisoned")
            .insert(telegram_id, StoredUser::new(telegram_id, name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_lookup() {
        let store = InMemoryUserStore::new();
        assert!(store.lookup_user(69).is_none());

        store.register_user(69, "Licha");

        let user = store.lookup_user(69).unwrap();
        assert_eq!(user.telegram_id, 69);
        assert_eq!(user.name, "Licha");
    }

    #[test]
    fn test_empty_name_defaults_to_unknown() {
        let store = InMemoryUserStore::new();
        store.register_user(42, "");

        assert_eq!(store.lookup_user(42).unwrap().name, "Unknown");
    }

    #[test]
    fn test_reregistering_overwrites() {
        let store = InMemoryUserStore::new();
        store.register_user(1, "First");
        store.register_user(1, "Second");

        assert_eq!(store.lookup_user(1).unwrap().name, "Second");
    }
}
