// History writer: dedicated task that receives history entries from the history log and
// saves them through the history store. Updates never wait on this task.

use crate::history_repo::HistoryStore;
use crate::models::HistoryEntry;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};

/// Batching for the history writer task.
pub struct HistoryWriterConfig {
    pub flush_rate: u64,
    pub flush_interval_secs: u64,
}

/// Spawns the task that saves history entries.
/// Flushes when buffer len >= flush_rate, every flush_interval_secs, and when the channel
/// closes. A failed flush keeps the buffer and is retried on the next tick.
pub fn spawn_history_writer(
    mut write_rx: mpsc::Receiver<HistoryEntry>,
    store: Arc<dyn HistoryStore>,
    config: HistoryWriterConfig,
    entries_saved_total: Arc<AtomicU64>,
) -> tokio::task::JoinHandle<()> {
    let flush_interval = Duration::from_secs(config.flush_interval_secs);
    tokio::spawn(async move {
        let mut buffer: Vec<HistoryEntry> = Vec::new();
        let mut flush_tick = interval(flush_interval);
        flush_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = write_rx.recv() => {
                    match result {
                        Some(entry) => {
                            buffer.push(entry);
                            if buffer.len() >= config.flush_rate as usize
                                && let Err(e) = flush_buffer(store.as_ref(), &mut buffer, &entries_saved_total).await
                            {
                                tracing::warn!(error = %e, "history writer: save failed, will retry");
                            }
                        }
                        None => break,
                    }
                }
                _ = flush_tick.tick() => {
                    if let Err(e) = flush_buffer(store.as_ref(), &mut buffer, &entries_saved_total).await {
                        tracing::warn!(error = %e, "history writer: save failed, will retry");
                    }
                }
            }
        }
        if let Err(e) = flush_buffer(store.as_ref(), &mut buffer, &entries_saved_total).await {
            tracing::warn!(
                error = %e,
                unsaved = buffer.len(),
                "history writer: final flush failed"
            );
        }
        tracing::debug!("History writer shutting down");
    })
}

async fn flush_buffer(
    store: &dyn HistoryStore,
    buffer: &mut Vec<HistoryEntry>,
    entries_saved_total: &AtomicU64,
) -> anyhow::Result<()> {
    if buffer.is_empty() {
        return Ok(());
    }
    let n = buffer.len();
    let written = store.save(buffer).await?;
    entries_saved_total.fetch_add(written, std::sync::atomic::Ordering::Relaxed);
    buffer.clear();
    tracing::debug!(
        operation = "save_history",
        entries_count = n,
        written,
        "History entries saved"
    );
    Ok(())
}
