//! Seen-set persistence.
//!
//! The seen set is the only state that survives between runs: a flat map
//! from posting id to the ISO-8601 time it was first reported.
//!
//! ```text
//! seen_postings.json
//! {
//!   "3f1c…e9": "2026-10-18T09:00:00Z",
//!   "a07b…42": "2026-10-18T09:00:00Z"
//! }
//! ```

pub mod local;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Re-export for convenience
pub use local::LocalSeenStore;
pub use memory::MemorySeenStore;

/// Ids already reported, with the time each was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    entries: BTreeMap<String, String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Mark an id as seen. Returns false if it was already present, in
    /// which case the original timestamp is kept.
    pub fn record(&mut self, id: impl Into<String>, at: DateTime<Utc>) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries
            .insert(id, at.to_rfc3339_opts(SecondsFormat::Secs, true));
        true
    }

    /// First-seen timestamp of an id.
    pub fn first_seen(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trait for seen-set storage backends.
///
/// Concurrent writers are not supported; the last save wins.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Read the persisted set. Missing or unreadable state yields an empty
    /// set so a run is never blocked by it.
    async fn load(&self) -> SeenSet;

    /// Persist the whole set, replacing what was stored before.
    async fn save(&self, seen: &SeenSet) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_is_idempotent() {
        let first = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();

        let mut seen = SeenSet::new();
        assert!(seen.record("abc", first));
        assert!(!seen.record("abc", later));

        assert_eq!(seen.len(), 1);
        assert_eq!(seen.first_seen("abc"), Some("2026-01-05T09:00:00Z"));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let mut seen = SeenSet::new();
        seen.record("abc", at);

        let json = serde_json::to_string(&seen).unwrap();
        assert_eq!(json, r#"{"abc":"2026-01-05T09:00:00Z"}"#);
    }

    #[test]
    fn test_accepts_foreign_timestamps() {
        let seen: SeenSet =
            serde_json::from_str(r#"{"repo_123": "2025-06-01T09:00:00.123456"}"#).unwrap();
        assert!(seen.contains("repo_123"));
        assert!(!seen.contains("repo_456"));
    }
}
