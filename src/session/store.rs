// ABOUTME: Key/value store backing the session registry
// File-backed in normal operation, in-memory for tests, no-op when no state dir exists

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Synchronous string key/value store. Implementations absorb their own
/// failures: a failed read is an absent key, a failed write is a no-op.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }
}

/// One file per key under a state directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read state key {:?}: {}", path, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::warn!("Failed to create state dir {:?}: {}", self.dir, e);
            return;
        }
        let path = self.key_path(key);
        if let Err(e) = fs::write(&path, value) {
            tracing::warn!("Failed to write state key {:?}: {}", path, e);
        }
    }
}

/// In-process store used as a test double for the registry.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }
}

/// Degraded mode for hosts without a usable state directory: every read is
/// absent and every write is dropped, so the registry behaves like a brand
/// new one on each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl KvStore for NoopStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_store_round_trips_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf());

        assert_eq!(store.get("market_agent_active_session"), None);
        store.set("market_agent_active_session", "s1");
        assert_eq!(
            store.get("market_agent_active_session"),
            Some("s1".to_string())
        );
        store.set("market_agent_active_session", "s2");
        assert_eq!(
            store.get("market_agent_active_session"),
            Some("s2".to_string())
        );
    }

    #[test]
    fn file_store_creates_missing_dir_on_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("state");
        let store = FileStore::new(nested.clone());

        store.set("k", "v");
        assert!(nested.join("k").exists());
    }

    #[test]
    fn noop_store_never_retains() {
        let store = NoopStore;
        store.set("k", "v");
        assert_eq!(store.get("k"), None);
    }
}
