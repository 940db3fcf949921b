//! Errors raised by the pure domain crates.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejected input or broken invariant, detected before any IO happens.
///
/// Transport, storage and navigation failures have their own error types in
/// the console crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A payload is not acceptable to send (missing name, short password...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Stored or received state contradicts a structural rule (e.g. a cart
    /// with two lines for one product).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// The detail text without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::InvariantViolation(msg) | Self::InvalidId(msg) => msg,
        }
    }
}
