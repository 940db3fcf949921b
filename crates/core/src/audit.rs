//! Audit stamp shared by every record the remote API returns.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp exactly as the remote API rendered it.
///
/// The text is kept verbatim so persisted snapshots round-trip without loss;
/// [`Timestamp::parse`] interprets it when a typed value is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the timestamp.
    ///
    /// Accepts RFC 3339 and offset-less ISO 8601 (read as UTC). Returns `None`
    /// for empty or unrecognised text.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creation/update audit fields plus the soft-delete marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditInfo {
    #[serde(default)]
    pub created_date: Timestamp,
    #[serde(default)]
    pub updated_date: Timestamp,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_by: String,
    /// `false` once the record has been soft-deleted.
    #[serde(default = "active_by_default")]
    pub active_flag: bool,
}

fn active_by_default() -> bool {
    true
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self {
            created_date: Timestamp::default(),
            updated_date: Timestamp::default(),
            created_by: String::new(),
            updated_by: String::new(),
            active_flag: active_by_default(),
        }
    }
}

impl AuditInfo {
    pub fn is_active(&self) -> bool {
        self.active_flag
    }
}
