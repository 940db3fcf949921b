//! Persistent key-value bridge.
//!
//! A [`KeyValueStore`] is a synchronous, durable string store keyed by name
//! (browser local storage, a directory of files, or memory). On top of it,
//! [`PersistentStorage`] offers typed `get`/`set` with JSON serialisation where
//! a missing or corrupt entry reads as "absent" instead of failing the caller.

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod memory;
pub mod persistent;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStore;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistent::PersistentStorage;

/// Storage keys used by the console.
pub mod keys {
    /// Bearer token of the current session.
    pub const TOKEN: &str = "token";
    /// Identity of the current session.
    pub const USER: &str = "user";
    /// Cashier cart lines.
    pub const CART: &str = "cart";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Raw synchronous string store.
///
/// Methods take `&self`: backends are handles onto shared durable state, the
/// same way every script on a page shares one `localStorage`.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
