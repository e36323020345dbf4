// `watch`: initial load, render, then re-apply the log file on every change

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::cli::WatchArgs;
use crate::config::{AppConfig, ServerConfig};
use crate::format::{self, ReportOptions};
use crate::fridge_state::{FridgeState, FridgeUpdate, SharedFridgeState};
use crate::history_log::HistoryLog;
use crate::routes;
use crate::watcher::{self, WatchEvent};
use crate::worker::{self, HistoryWriterConfig};

pub async fn run(config: &AppConfig, args: WatchArgs) -> anyhow::Result<()> {
    let options = args.display.report_options();
    let store = super::open_history_store(&config.history, !args.no_history).await;

    let history = HistoryLog::load(store.as_ref()).await;
    let (write_tx, write_rx) = mpsc::channel(config.history.writer_capacity);
    let entries_saved_total = Arc::new(AtomicU64::new(0));
    let writer_handle = worker::spawn_history_writer(
        write_rx,
        store,
        HistoryWriterConfig {
            flush_rate: config.history.flush_rate,
            flush_interval_secs: config.history.flush_interval_secs,
        },
        entries_saved_total.clone(),
    );

    let fridges = FridgeState::new(history.with_writer(write_tx))
        .with_policy(config.validation.policy())
        .into_shared();
    let (updates_tx, _) = broadcast::channel(config.server.broadcast_capacity);

    apply_file(&fridges, &updates_tx, &args.input_file, &options).await;

    let debounce = Duration::from_millis(config.watch.debounce_ms);
    let result = serve_and_watch(config, &args, &fridges, &updates_tx, &options, debounce).await;

    // Flush queued history even when serving or watching failed.
    fridges.write().await.history_mut().close().await;
    if let Err(e) = writer_handle.await {
        tracing::warn!(error = %e, "History writer task failed");
    }
    tracing::info!(
        entries_saved = entries_saved_total.load(Ordering::Relaxed),
        "History writer stopped"
    );
    result
}

async fn serve_and_watch(
    config: &AppConfig,
    args: &WatchArgs,
    fridges: &SharedFridgeState,
    updates_tx: &broadcast::Sender<FridgeUpdate>,
    options: &ReportOptions,
    debounce: Duration,
) -> anyhow::Result<()> {
    let server_handle = if args.serve {
        Some(spawn_server(&config.server, fridges.clone(), updates_tx.clone()).await?)
    } else {
        None
    };

    let result = if args.once {
        Ok(())
    } else {
        watch_loop(fridges, updates_tx, &args.input_file, options, debounce).await
    };

    if let Some(handle) = server_handle {
        handle.abort();
    }
    result
}

/// Reads the whole file, applies it as one batch, publishes the update and prints the report.
/// A missing or unreadable file is reported and leaves the state untouched.
pub async fn apply_file(
    fridges: &SharedFridgeState,
    updates_tx: &broadcast::Sender<FridgeUpdate>,
    path: &Path,
    options: &ReportOptions,
) -> bool {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Cannot read log file; waiting for changes"
            );
            return false;
        }
    };

    let mut state = fridges.write().await;
    let report = state.update(content.lines());
    let summaries = report
        .fridges_touched
        .iter()
        .filter_map(|fridge_id| state.summary(*fridge_id).cloned())
        .collect();
    println!(
        "{}",
        format::format_report(state.summaries(), state.cycle_store(), options)
    );
    drop(state);

    // No subscribers is fine.
    let _ = updates_tx.send(FridgeUpdate { report, summaries });
    true
}

async fn spawn_server(
    config: &ServerConfig,
    fridges: SharedFridgeState,
    updates_tx: broadcast::Sender<FridgeUpdate>,
) -> anyhow::Result<JoinHandle<()>> {
    let app = routes::app(fridges, updates_tx);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::warn!(error = %e, "HTTP server stopped");
        }
    }))
}

async fn watch_loop(
    fridges: &SharedFridgeState,
    updates_tx: &broadcast::Sender<FridgeUpdate>,
    path: &Path,
    options: &ReportOptions,
    debounce: Duration,
) -> anyhow::Result<()> {
    let (_watcher, mut events) = watcher::watch_file(path)?;
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::warn!("File watcher stopped");
                    break;
                };
                match watcher::settle(&mut events, event, debounce).await {
                    // A remove followed by a re-create (atomic save) counts as a change.
                    WatchEvent::Removed if !path.exists() => {
                        println!("Exiting: file {} was deleted", path.display());
                        break;
                    }
                    _ => {
                        tracing::info!(path = %path.display(), "Log file changed");
                        apply_file(fridges, updates_tx, path, options).await;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
                break;
            }
        }
    }
    Ok(())
}
