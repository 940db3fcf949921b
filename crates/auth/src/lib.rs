//! `counterdesk-auth`: identity and role-based access rules.
//!
//! This crate is intentionally decoupled from HTTP, storage and routing: it
//! answers "who is this" and "may they open that", nothing else.

pub mod access;
pub mod identity;
pub mod roles;

pub use access::{
    AccessError, AccessExplanation, DenialKind, RouteAccess, check_access, explain_access,
    has_any_role,
};
pub use identity::{AuthResponse, Credentials, Identity, NewUser, UserUpdate};
pub use roles::Role;
