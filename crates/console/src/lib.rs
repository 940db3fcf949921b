//! `counterdesk-console`
//!
//! **Responsibility:** client-side core of the counterdesk retail console.
//!
//! This crate provides:
//! - A persistent key-value bridge (browser local storage, files, memory)
//! - The session store and the cashier cart store, both write-through
//! - The route table and the pre-navigation authorization gate
//! - The remote API client
//!
//! The API stays the authority; this crate only remembers who is signed in
//! and what is in the cart.

pub mod api;
pub mod cart;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod console;
pub mod guard;
pub mod router;
pub mod session;
pub mod storage;

pub use api::{
    Ack, ApiClient, ApiError, Dashboard, Page, PageRequest, RemoteApi, SaleReportQuery,
};
pub use cart::CartStore;
#[cfg(not(target_arch = "wasm32"))]
pub use config::{ConfigError, ConsoleConfig};
pub use console::{Console, ConsoleError};
pub use guard::{NavigationDecision, SessionView, authorize_navigation};
pub use router::{NavigationError, NavigationOutcome, ResolvedRoute, RouteName, Router};
pub use session::{Redirect, SessionStore};
pub use storage::{KeyValueStore, MemoryStore, PersistentStorage, StorageError};
