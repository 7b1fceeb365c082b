//! In-memory seen store for dry runs and tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::Result;
use crate::storage::{SeenSet, SeenStore};

/// Seen store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySeenStore {
    seen: Mutex<SeenSet>,
    saves: AtomicUsize,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set.
    pub fn with_seen(seen: SeenSet) -> Self {
        Self {
            seen: Mutex::new(seen),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn load(&self) -> SeenSet {
        match self.seen.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        match self.seen.lock() {
            Ok(mut guard) => *guard = seen.clone(),
            Err(poisoned) => *poisoned.into_inner() = seen.clone(),
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_round_trip_and_count() {
        let store = MemorySeenStore::new();
        assert!(store.load().await.is_empty());

        let mut seen = SeenSet::new();
        seen.record("abc", Utc::now());
        store.save(&seen).await.unwrap();

        assert!(store.load().await.contains("abc"));
        assert_eq!(store.save_count(), 1);
    }
}
