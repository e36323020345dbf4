// Cycle records: parsed log lines, stored records and the derived per-cycle view

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub type FridgeId = i64;
pub type CycleNumber = i64;

/// Processing time of one update batch. Keys history entries and stamps every record and
/// summary written by that batch.
pub type BatchTimestamp = DateTime<Utc>;

/// One validated log line, not yet stamped or merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub fridge_id: FridgeId,
    pub cycle_number: CycleNumber,
    pub cooldown_start: NaiveDateTime,
    pub cooldown_end: NaiveDateTime,
    pub warmup_start: NaiveDateTime,
    pub warmup_end: NaiveDateTime,
}

/// Durations in seconds. Negative values are kept as-is (inconsistent input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleMetrics {
    pub cooldown_time: i64,
    pub running_time: i64,
    pub warmup_time: i64,
    /// Absent for the highest cycle number of a fridge.
    pub next_cycle_start: Option<NaiveDateTime>,
    pub next_cycle_wait_time: Option<i64>,
}

/// Latest known record for one (fridge, cycle) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub fridge_id: FridgeId,
    pub cycle_number: CycleNumber,
    pub cooldown_start: NaiveDateTime,
    pub cooldown_end: NaiveDateTime,
    pub warmup_start: NaiveDateTime,
    pub warmup_end: NaiveDateTime,
    pub update_timestamp: BatchTimestamp,
    /// Filled by the deriver; `None` until the fridge has been derived.
    #[serde(default)]
    pub metrics: Option<CycleMetrics>,
}

impl CycleRecord {
    pub fn from_parsed(parsed: ParsedRecord, update_timestamp: BatchTimestamp) -> Self {
        Self {
            fridge_id: parsed.fridge_id,
            cycle_number: parsed.cycle_number,
            cooldown_start: parsed.cooldown_start,
            cooldown_end: parsed.cooldown_end,
            warmup_start: parsed.warmup_start,
            warmup_end: parsed.warmup_end,
            update_timestamp,
            metrics: None,
        }
    }

    pub fn key(&self) -> (FridgeId, CycleNumber) {
        (self.fridge_id, self.cycle_number)
    }

    /// Derived view of this cycle, or `None` if it has not been derived yet.
    pub fn durations(&self) -> Option<CycleDurations> {
        self.metrics
            .map(|metrics| CycleDurations::from_record(self, metrics))
    }
}

/// Per-cycle durations as consumed by the aggregator and by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDurations {
    pub fridge_id: FridgeId,
    pub cycle_number: CycleNumber,
    /// cooldown_start of the cycle.
    pub start: NaiveDateTime,
    /// warmup_end of the cycle.
    pub end: NaiveDateTime,
    pub cooldown_time: i64,
    pub running_time: i64,
    pub warmup_time: i64,
    pub next_cycle_start: Option<NaiveDateTime>,
    pub next_cycle_wait_time: Option<i64>,
}

impl CycleDurations {
    pub fn from_record(record: &CycleRecord, metrics: CycleMetrics) -> Self {
        Self {
            fridge_id: record.fridge_id,
            cycle_number: record.cycle_number,
            start: record.cooldown_start,
            end: record.warmup_end,
            cooldown_time: metrics.cooldown_time,
            running_time: metrics.running_time,
            warmup_time: metrics.warmup_time,
            next_cycle_start: metrics.next_cycle_start,
            next_cycle_wait_time: metrics.next_cycle_wait_time,
        }
    }
}
