//! Persisted login session
//!
//! The session is two string entries in a durable key-value store: the
//! bearer token and the serialized user profile. Both are written in one
//! atomic step and removed in one step, so a reader never sees a token
//! without its user or the other way round.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{RubikError, RubikResult};
use crate::models::User;

use super::file_io::{read_json, write_json_atomic};

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "auth_token";
/// Key holding the JSON-encoded user profile
pub const USER_KEY: &str = "user_data";

/// Durable string key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> RubikResult<Option<String>>;

    /// Set all entries in a single atomic write
    fn set_many(&self, entries: &[(&str, String)]) -> RubikResult<()>;

    /// Remove all keys in a single atomic write
    fn remove_many(&self, keys: &[&str]) -> RubikResult<()>;
}

fn lock_error(e: impl std::fmt::Display) -> RubikError {
    RubikError::Storage(format!("Failed to acquire session lock: {}", e))
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct KeyValueData {
    entries: BTreeMap<String, String>,
}

/// Key-value store backed by one JSON file, replaced atomically on write
pub struct FileKeyValueStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Open the store, loading existing entries if the file exists
    pub fn open(path: PathBuf) -> RubikResult<Self> {
        let file_data: KeyValueData = read_json(&path)?;
        Ok(Self {
            path,
            data: RwLock::new(file_data.entries),
        })
    }

    /// Persist `next` and, only once it is on disk, make it current
    fn commit(&self, next: BTreeMap<String, String>) -> RubikResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        let file_data = KeyValueData { entries: next };
        write_json_atomic(&self.path, &file_data)?;
        *data = file_data.entries;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> RubikResult<Option<String>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> RubikResult<()> {
        let mut next = self.data.read().map_err(lock_error)?.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), value.clone());
        }
        self.commit(next)
    }

    fn remove_many(&self, keys: &[&str]) -> RubikResult<()> {
        let mut next = self.data.read().map_err(lock_error)?.clone();
        for key in keys {
            next.remove(*key);
        }
        self.commit(next)
    }
}

/// Non-durable store for tests and offline runs
#[derive(Default)]
pub struct MemoryKeyValueStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> RubikResult<Option<String>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> RubikResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        for (key, value) in entries {
            data.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> RubikResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        for key in keys {
            data.remove(*key);
        }
        Ok(())
    }
}

/// An authenticated user together with their bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Typed access to the persisted session
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Session store kept in memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }

    /// Session store persisted to `path`
    pub fn open(path: PathBuf) -> RubikResult<Self> {
        Ok(Self::new(Arc::new(FileKeyValueStore::open(path)?)))
    }

    /// The stored user, if any. A profile that no longer parses is treated
    /// as absent.
    pub fn get_user(&self) -> RubikResult<Option<User>> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable stored user profile");
                Ok(None)
            }
        }
    }

    pub fn get_token(&self) -> RubikResult<Option<String>> {
        self.store.get(TOKEN_KEY)
    }

    /// The full session, present only when both user and token are stored
    pub fn get_session(&self) -> RubikResult<Option<Session>> {
        let token = match self.get_token()? {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(None),
        };
        Ok(self.get_user()?.map(|user| Session { user, token }))
    }

    pub fn set_session(&self, user: &User, token: &str) -> RubikResult<()> {
        let user_json = serde_json::to_string(user)?;
        self.store
            .set_many(&[(TOKEN_KEY, token.to_string()), (USER_KEY, user_json)])
    }

    pub fn clear_session(&self) -> RubikResult<()> {
        self.store.remove_many(&[TOKEN_KEY, USER_KEY])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> User {
        User::new("1", "Ana", "ana@example.com")
    }

    #[test]
    fn test_empty_store_has_no_session() {
        let sessions = SessionStore::in_memory();
        assert!(sessions.get_user().unwrap().is_none());
        assert!(sessions.get_token().unwrap().is_none());
        assert!(sessions.get_session().unwrap().is_none());
    }

    #[test]
    fn test_set_and_clear() {
        let sessions = SessionStore::in_memory();
        sessions.set_session(&user(), "tok-123").unwrap();

        let session = sessions.get_session().unwrap().unwrap();
        assert_eq!(session.user, user());
        assert_eq!(session.token, "tok-123");

        sessions.clear_session().unwrap();
        assert!(sessions.get_user().unwrap().is_none());
        assert!(sessions.get_token().unwrap().is_none());
    }

    #[test]
    fn test_session_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        SessionStore::open(path.clone())
            .unwrap()
            .set_session(&user(), "tok-123")
            .unwrap();

        let reopened = SessionStore::open(path.clone()).unwrap();
        assert_eq!(reopened.get_token().unwrap().as_deref(), Some("tok-123"));
        assert_eq!(reopened.get_user().unwrap(), Some(user()));

        reopened.clear_session().unwrap();
        let after_logout = SessionStore::open(path).unwrap();
        assert!(after_logout.get_session().unwrap().is_none());
    }

    #[test]
    fn test_token_without_user_is_not_a_session() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set_many(&[(TOKEN_KEY, "tok".into())]).unwrap();
        let sessions = SessionStore::new(store);

        assert!(sessions.get_session().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_user_profile_reads_as_absent() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store
            .set_many(&[(TOKEN_KEY, "tok".into()), (USER_KEY, "{oops".into())])
            .unwrap();
        let sessions = SessionStore::new(store);

        assert!(sessions.get_user().unwrap().is_none());
    }
}
