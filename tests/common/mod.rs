// Shared test helpers
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use fridgetop::fridge_state::FridgeState;
use fridgetop::history_log::HistoryLog;
use fridgetop::history_repo::HistoryStore;
use fridgetop::models::{BatchTimestamp, HistoryEntry};

/// Fridge 0, cycle 0.
pub const CYCLE_0: &str =
    "0,0,2019-01-05 08:10:00,2019-01-06 14:27:00,2019-01-10 08:15:00,2019-01-11 09:12:00";
/// Fridge 0, cycle 1.
pub const CYCLE_1: &str =
    "0,1,2019-01-20 08:00:00,2019-01-21 08:00:00,2019-01-25 08:00:00,2019-01-26 08:00:00";
/// Fridge 3, single cycle of exactly one day per phase.
pub const FRIDGE_3_CYCLE_0: &str =
    "3,0,2019-02-01 00:00:00,2019-02-02 00:00:00,2019-02-03 00:00:00,2019-02-04 00:00:00";

// Seconds derived from CYCLE_0 / CYCLE_1.
pub const CYCLE_0_COOLDOWN: i64 = 109_020;
pub const CYCLE_0_RUNNING: i64 = 323_280;
pub const CYCLE_0_WARMUP: i64 = 89_820;
pub const CYCLE_0_WAIT: i64 = 773_280;
pub const DAY: i64 = 86_400;
pub const FRIDGE_0_TOTAL_TIME: i64 = 1_813_800;

pub fn batch_ts(secs: i64) -> BatchTimestamp {
    DateTime::from_timestamp(secs, 0).unwrap()
}

pub fn log_time(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// In-memory state after applying `lines` as one batch at `batch_ts(secs)`.
pub fn state_with(lines: &[&str], secs: i64) -> FridgeState {
    let mut state = FridgeState::new(HistoryLog::in_memory());
    state.update_at(lines.iter().copied(), batch_ts(secs));
    state
}

/// History entry produced by applying `lines` at `batch_ts(secs)`.
pub fn history_entry(lines: &[&str], secs: i64) -> HistoryEntry {
    state_with(lines, secs)
        .history()
        .latest()
        .cloned()
        .unwrap()
}

/// Store whose every call fails.
pub struct FailingHistoryStore;

#[async_trait]
impl HistoryStore for FailingHistoryStore {
    async fn load(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        anyhow::bail!("history storage unavailable")
    }

    async fn save(&self, _entries: &[HistoryEntry]) -> anyhow::Result<u64> {
        anyhow::bail!("history storage unavailable")
    }
}
