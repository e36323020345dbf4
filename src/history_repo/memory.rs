// In-process history store (tests, --no-history). Same insert-only semantics as SQLite.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::HistoryStore;
use crate::models::{BatchTimestamp, HistoryEntry};

#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<BTreeMap<BatchTimestamp, HistoryEntry>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `entries`, as if written by an earlier process.
    pub fn with_entries(entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        Self {
            entries: Mutex::new(entries.into_iter().map(|e| (e.timestamp, e)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        Ok(self.entries.lock().await.values().cloned().collect())
    }

    async fn save(&self, entries: &[HistoryEntry]) -> anyhow::Result<u64> {
        let mut stored = self.entries.lock().await;
        let mut written = 0;
        for entry in entries {
            if !stored.contains_key(&entry.timestamp) {
                stored.insert(entry.timestamp, entry.clone());
                written += 1;
            }
        }
        Ok(written)
    }
}
