use serde::Serialize;
use serde::de::DeserializeOwned;

use super::KeyValueStore;

/// Typed JSON view over a [`KeyValueStore`].
///
/// Reads never fail: a missing entry, a stored `null`, an unparsable value or
/// a backend error all come back as `None` (or the default). Writes never fail
/// either: backend errors are logged and the caller's in-memory state stays
/// authoritative until the next successful write.
#[derive(Debug, Clone)]
pub struct PersistentStorage<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistentStorage<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read persisted value; using default");
                return None;
            }
        };

        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding corrupt persisted value; using default");
                None
            }
        }
    }

    /// Read a value stored as plain text rather than JSON.
    ///
    /// A JSON-quoted string is unquoted, so entries written either way read
    /// back the same. Empty entries read as `None`.
    pub fn get_text(&self, key: &str) -> Option<String> {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read persisted value; using default");
                return None;
            }
        };

        let text = if raw.starts_with('"') {
            serde_json::from_str::<String>(&raw).unwrap_or(raw)
        } else {
            raw
        };
        (!text.is_empty()).then_some(text)
    }

    /// Write `value` verbatim, without JSON encoding.
    pub fn set_text(&self, key: &str, value: &str) {
        if let Err(err) = self.backend.write(key, value) {
            tracing::error!(key, error = %err, "failed to persist value");
        }
    }

    pub fn get_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.get(key).unwrap_or_default()
    }

    pub fn set<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(key, error = %err, "failed to serialize value for storage");
                return;
            }
        };

        if let Err(err) = self.backend.write(key, &payload) {
            tracing::error!(key, error = %err, "failed to persist value");
        }
    }

    /// `Some` writes the value, `None` removes the key.
    pub fn set_optional<T>(&self, key: &str, value: Option<&T>)
    where
        T: Serialize + ?Sized,
    {
        match value {
            Some(value) => self.set(key, value),
            None => self.remove(key),
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(err) = self.backend.remove(key) {
            tracing::error!(key, error = %err, "failed to remove persisted value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    /// Backend whose every call fails, like a browser with storage disabled.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }
    }

    #[test]
    fn typed_values_round_trip() {
        let storage = PersistentStorage::new(MemoryStore::new());
        storage.set("token", "abc");
        assert_eq!(storage.get::<String>("token").as_deref(), Some("abc"));

        storage.set("numbers", &vec![1u32, 2, 3]);
        assert_eq!(storage.get::<Vec<u32>>("numbers"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_null_and_corrupt_entries_read_as_default() {
        let backend = MemoryStore::new();
        let storage = PersistentStorage::new(backend.clone());
        assert_eq!(storage.get::<String>("token"), None);

        backend.write("token", "null").unwrap();
        assert_eq!(storage.get::<String>("token"), None);

        backend.write("cart", "[{\"id\": ").unwrap();
        assert_eq!(storage.get_or_default::<Vec<u32>>("cart"), Vec::<u32>::new());

        backend.write("cart", "{\"not\": \"a list\"}").unwrap();
        assert_eq!(storage.get_or_default::<Vec<u32>>("cart"), Vec::<u32>::new());
    }

    #[test]
    fn text_values_are_stored_verbatim() {
        let backend = MemoryStore::new();
        let storage = PersistentStorage::new(backend.clone());
        storage.set_text("token", "eyJhbGciOi.payload.sig");
        assert_eq!(
            backend.read("token").unwrap().as_deref(),
            Some("eyJhbGciOi.payload.sig")
        );
        assert_eq!(
            storage.get_text("token").as_deref(),
            Some("eyJhbGciOi.payload.sig")
        );
    }

    #[test]
    fn text_reads_accept_json_quoted_and_reject_empty() {
        let backend = MemoryStore::new();
        let storage = PersistentStorage::new(backend.clone());

        backend.write("token", "\"abc\"").unwrap();
        assert_eq!(storage.get_text("token").as_deref(), Some("abc"));

        backend.write("token", "").unwrap();
        assert_eq!(storage.get_text("token"), None);

        assert_eq!(PersistentStorage::new(BrokenStore).get_text("token"), None);
    }

    #[test]
    fn set_optional_none_removes_key() {
        let backend = MemoryStore::new();
        let storage = PersistentStorage::new(backend.clone());
        storage.set_optional("token", Some("abc"));
        assert!(backend.read("token").unwrap().is_some());

        storage.set_optional::<str>("token", None);
        assert!(backend.read("token").unwrap().is_none());
    }

    #[test]
    fn backend_failures_never_reach_the_caller() {
        let storage = PersistentStorage::new(BrokenStore);
        storage.set("cart", &vec![1u32]);
        storage.remove("cart");
        assert_eq!(storage.get::<Vec<u32>>("cart"), None);
        assert_eq!(storage.get_or_default::<Vec<u32>>("cart"), Vec::<u32>::new());
    }
}
