//! `counterdesk-core`: foundation building blocks for the console.
//!
//! This crate contains **pure domain** primitives (no storage, no transport).

pub mod audit;
pub mod entity;
pub mod error;
pub mod id;

pub use audit::{AuditInfo, Timestamp};
pub use entity::{Entity, position_of};
pub use error::{DomainError, DomainResult};
pub use id::{ProductId, SaleId, UserId};
