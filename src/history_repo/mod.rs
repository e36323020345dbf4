// Persisted update history. One row per batch, keyed by batch timestamp (microseconds).
// Snapshot parts are stored as versioned wincode BLOBs; rows are only ever inserted.

mod blob;
mod memory;
mod records;

pub use memory::MemoryHistoryStore;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

use crate::models::{HistoryEntry, HistorySnapshot};

/// Storage collaborator behind the history log: load everything once, then save new entries.
/// Saving an entry whose timestamp is already stored must leave the stored one untouched.
#[async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// All stored entries, ascending by timestamp.
    async fn load(&self) -> anyhow::Result<Vec<HistoryEntry>>;

    /// Adds entries not yet stored. Returns how many were newly written.
    async fn save(&self, entries: &[HistoryEntry]) -> anyhow::Result<u64>;
}

pub struct HistoryRepo {
    pool: SqlitePool,
}

impl HistoryRepo {
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fridge_history (
                batch_ts INTEGER PRIMARY KEY,
                summary_data BLOB NOT NULL,
                cycle_data BLOB NOT NULL,
                raw_data BLOB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fridge_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    fn parse_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<HistoryEntry> {
        let batch_ts: i64 = row.try_get("batch_ts")?;
        let summary_data: Vec<u8> = row.try_get("summary_data")?;
        let cycle_data: Vec<u8> = row.try_get("cycle_data")?;
        let raw_data: Vec<u8> = row.try_get("raw_data")?;

        Ok(HistoryEntry {
            timestamp: records::batch_from_micros(batch_ts)?,
            snapshot: HistorySnapshot {
                summaries: records::decode_summaries(&summary_data)?,
                cycles: records::decode_cycles(&cycle_data)?,
            },
            raw: records::decode_raw(&raw_data)?,
        })
    }
}

#[async_trait]
impl HistoryStore for HistoryRepo {
    #[instrument(skip(self), fields(repo = "history", operation = "load"))]
    async fn load(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            "SELECT batch_ts, summary_data, cycle_data, raw_data FROM fridge_history ORDER BY batch_ts ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match Self::parse_row(&row) {
                Ok(entry) => out.push(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable history row");
                }
            }
        }
        Ok(out)
    }

    #[instrument(skip(self, entries), fields(repo = "history", operation = "save", entries_count = entries.len()))]
    async fn save(&self, entries: &[HistoryEntry]) -> anyhow::Result<u64> {
        if entries.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for entry in entries {
            let summary_data = records::encode_summaries(&entry.snapshot.summaries)?;
            let cycle_data = records::encode_cycles(&entry.snapshot.cycles)?;
            let raw_data = records::encode_raw(&entry.raw)?;
            let r = sqlx::query(
                "INSERT OR IGNORE INTO fridge_history (batch_ts, summary_data, cycle_data, raw_data) VALUES ($1, $2, $3, $4)",
            )
            .bind(records::batch_micros(entry.timestamp))
            .bind(&summary_data)
            .bind(&cycle_data)
            .bind(&raw_data)
            .execute(&mut *tx)
            .await?;
            written += r.rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }
}
