// Append-only history of update batches. The in-memory view is authoritative; persistence
// goes through the history writer task (worker.rs) and never blocks an update.
//
// Batch timestamps have microsecond resolution, so two batches sharing a key is not expected.
// If it happens anyway the first entry is kept and a warning is logged.

use std::collections::{BTreeMap, VecDeque};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::history_repo::HistoryStore;
use crate::models::{BatchTimestamp, HistoryEntry, HistorySnapshot, RawBatch};

#[derive(Default)]
pub struct HistoryLog {
    entries: BTreeMap<BatchTimestamp, HistoryEntry>,
    write_tx: Option<mpsc::Sender<HistoryEntry>>,
    /// Entries the writer channel could not take yet; re-sent on the next append.
    backlog: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    /// Empty log with no persistence.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Log seeded with the store's prior history. A failed load is reported and the log starts
    /// empty; nothing previously persisted is touched.
    pub async fn load(store: &dyn HistoryStore) -> Self {
        let mut log = Self::default();
        match store.load().await {
            Ok(entries) => {
                tracing::info!(
                    operation = "load_history",
                    entries_count = entries.len(),
                    "History loaded"
                );
                for entry in entries {
                    log.entries.entry(entry.timestamp).or_insert(entry);
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "load_history",
                    "Failed to load history; continuing with in-memory history only"
                );
            }
        }
        log
    }

    /// Forwards every new entry to `write_tx` for persistence.
    pub fn with_writer(mut self, write_tx: mpsc::Sender<HistoryEntry>) -> Self {
        self.write_tx = Some(write_tx);
        self
    }

    /// Adds one entry. Returns false (and keeps the existing entry) if the timestamp is taken.
    pub fn append(
        &mut self,
        timestamp: BatchTimestamp,
        snapshot: HistorySnapshot,
        raw: RawBatch,
    ) -> bool {
        if self.entries.contains_key(&timestamp) {
            tracing::warn!(
                operation = "append_history",
                timestamp = %timestamp,
                "History entry already exists for this timestamp; keeping the first"
            );
            return false;
        }
        let entry = HistoryEntry {
            timestamp,
            snapshot,
            raw,
        };
        if self.write_tx.is_some() {
            self.backlog.push_back(entry.clone());
            self.forward_backlog();
        }
        self.entries.insert(timestamp, entry);
        true
    }

    fn forward_backlog(&mut self) {
        let Some(tx) = &self.write_tx else {
            return;
        };
        while let Some(entry) = self.backlog.pop_front() {
            match tx.try_send(entry) {
                Ok(()) => {}
                Err(TrySendError::Full(entry)) => {
                    self.backlog.push_front(entry);
                    tracing::debug!(
                        backlog = self.backlog.len(),
                        "History writer busy; deferring persistence"
                    );
                    return;
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!(
                        unsaved = self.backlog.len() + 1,
                        "History writer channel closed; history kept in memory only"
                    );
                    self.backlog.clear();
                    self.write_tx = None;
                    return;
                }
            }
        }
    }

    /// Hands the remaining backlog to the writer and drops the sender so the writer can flush
    /// and exit.
    pub async fn close(&mut self) {
        let Some(tx) = self.write_tx.take() else {
            return;
        };
        while let Some(entry) = self.backlog.pop_front() {
            if tx.send(entry).await.is_err() {
                tracing::warn!(
                    unsaved = self.backlog.len() + 1,
                    "History writer gone; unsaved entries dropped on close"
                );
                self.backlog.clear();
                break;
            }
        }
    }

    pub fn get(&self, timestamp: &BatchTimestamp) -> Option<&HistoryEntry> {
        self.entries.get(timestamp)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.values().next_back()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = BatchTimestamp> + '_ {
        self.entries.keys().copied()
    }

    /// Entries ascending by timestamp.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries waiting for room in the writer channel.
    pub fn pending(&self) -> usize {
        self.backlog.len()
    }
}
