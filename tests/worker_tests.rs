// History writer: flush on threshold, on channel close, retry after a failed save

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use common::*;
use fridgetop::fridge_state::FridgeState;
use fridgetop::history_log::HistoryLog;
use fridgetop::history_repo::{HistoryRepo, HistoryStore, MemoryHistoryStore};
use fridgetop::models::HistoryEntry;
use fridgetop::worker::{HistoryWriterConfig, spawn_history_writer};
use tokio::sync::{Mutex, mpsc};

#[tokio::test]
async fn writer_flushes_history_on_shutdown() {
    let dir = tempfile::TempDir::new().unwrap();
    let db_path = dir.path().join("history.db");
    let path_str = db_path.to_str().unwrap();
    let repo = Arc::new(HistoryRepo::connect(path_str).await.unwrap());
    repo.init().await.unwrap();

    let entries_saved_total = Arc::new(AtomicU64::new(0));
    let (write_tx, write_rx) = mpsc::channel(8);
    let writer_handle = spawn_history_writer(
        write_rx,
        repo.clone(),
        HistoryWriterConfig {
            flush_rate: 10,
            flush_interval_secs: 60,
        },
        entries_saved_total.clone(),
    );

    let mut state = FridgeState::new(HistoryLog::load(repo.as_ref()).await.with_writer(write_tx));
    state.update_at([CYCLE_0], batch_ts(1));
    state.update_at([CYCLE_1], batch_ts(2));
    state.history_mut().close().await;
    writer_handle.await.unwrap();

    assert_eq!(entries_saved_total.load(Ordering::Relaxed), 2);
    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].snapshot.summaries[&0].num_of_cycles, 2);
}

#[tokio::test]
async fn writer_flushes_when_threshold_reached() {
    let store = Arc::new(MemoryHistoryStore::new());
    let entries_saved_total = Arc::new(AtomicU64::new(0));
    let (write_tx, write_rx) = mpsc::channel(8);
    let writer_handle = spawn_history_writer(
        write_rx,
        store.clone(),
        HistoryWriterConfig {
            flush_rate: 2,
            flush_interval_secs: 3600,
        },
        entries_saved_total.clone(),
    );

    write_tx.send(history_entry(&[CYCLE_0], 1)).await.unwrap();
    write_tx.send(history_entry(&[CYCLE_1], 2)).await.unwrap();

    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(3);
    while store.len().await < 2 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for flush"
        );
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }
    // Writer is still running: the flush came from the threshold.
    assert!(!writer_handle.is_finished());

    drop(write_tx);
    writer_handle.await.unwrap();
    assert_eq!(entries_saved_total.load(Ordering::Relaxed), 2);
}

/// Fails the first `failures` saves, then stores entries in memory.
struct FlakyStore {
    failures: Mutex<u32>,
    inner: MemoryHistoryStore,
}

#[async_trait]
impl HistoryStore for FlakyStore {
    async fn load(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        self.inner.load().await
    }

    async fn save(&self, entries: &[HistoryEntry]) -> anyhow::Result<u64> {
        let mut failures = self.failures.lock().await;
        if *failures > 0 {
            *failures -= 1;
            anyhow::bail!("disk busy");
        }
        self.inner.save(entries).await
    }
}

#[tokio::test]
async fn writer_retries_failed_save() {
    let store = Arc::new(FlakyStore {
        failures: Mutex::new(1),
        inner: MemoryHistoryStore::new(),
    });
    let entries_saved_total = Arc::new(AtomicU64::new(0));
    let (write_tx, write_rx) = mpsc::channel(8);
    let writer_handle = spawn_history_writer(
        write_rx,
        store.clone(),
        HistoryWriterConfig {
            flush_rate: 1,
            flush_interval_secs: 3600,
        },
        entries_saved_total.clone(),
    );

    // First save fails; the entry stays buffered and goes out with the final flush.
    write_tx.send(history_entry(&[CYCLE_0], 1)).await.unwrap();
    drop(write_tx);
    writer_handle.await.unwrap();

    assert_eq!(store.inner.len().await, 1);
    assert_eq!(entries_saved_total.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn writer_gives_up_quietly_when_store_is_down() {
    let entries_saved_total = Arc::new(AtomicU64::new(0));
    let (write_tx, write_rx) = mpsc::channel(8);
    let writer_handle = spawn_history_writer(
        write_rx,
        Arc::new(FailingHistoryStore),
        HistoryWriterConfig {
            flush_rate: 1,
            flush_interval_secs: 3600,
        },
        entries_saved_total.clone(),
    );

    write_tx.send(history_entry(&[CYCLE_0], 1)).await.unwrap();
    drop(write_tx);
    writer_handle.await.unwrap();
    assert_eq!(entries_saved_total.load(Ordering::Relaxed), 0);
}
