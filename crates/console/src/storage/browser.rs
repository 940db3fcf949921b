//! Browser `localStorage` backend (WASM builds).

use web_sys::Storage;

use super::{KeyValueStore, StorageError};

/// Handle onto the page's `window.localStorage`.
#[derive(Debug, Clone)]
pub struct BrowserStore {
    storage: Storage,
}

impl BrowserStore {
    /// Attach to `window.localStorage`.
    ///
    /// Fails when there is no window (workers) or storage is disabled.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage access denied: {e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("getItem('{key}') failed: {e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Throws on quota exhaustion.
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("setItem('{key}') failed: {e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("removeItem('{key}') failed: {e:?}")))
    }
}
