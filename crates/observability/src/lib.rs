//! Tracing/logging setup shared by every counterdesk binary.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::{LogFormat, LogSettings, init};
