// Subcommand entry points

pub mod history;
pub mod watch;

use std::sync::Arc;

use crate::config::HistoryConfig;
use crate::history_repo::{HistoryRepo, HistoryStore, MemoryHistoryStore};

/// Opens the SQLite history database and creates its table if needed.
pub async fn open_history_repo(config: &HistoryConfig) -> anyhow::Result<HistoryRepo> {
    let repo = HistoryRepo::connect(&config.path).await?;
    repo.init().await?;
    Ok(repo)
}

/// SQLite store when `persist` is set and the database opens; in-memory store otherwise.
pub async fn open_history_store(config: &HistoryConfig, persist: bool) -> Arc<dyn HistoryStore> {
    if !persist {
        tracing::info!("History persistence disabled; keeping history in memory");
        return Arc::new(MemoryHistoryStore::new());
    }
    match open_history_repo(config).await {
        Ok(repo) => {
            tracing::info!(path = %config.path, "History database opened");
            Arc::new(repo)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %config.path,
                "Failed to open history database; keeping history in memory"
            );
            Arc::new(MemoryHistoryStore::new())
        }
    }
}
