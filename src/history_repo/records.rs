// wincode records for history BLOBs. Timestamps are stored as integers: log times as
// seconds (naive, read as UTC), batch times as microseconds since the epoch.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use wincode::{SchemaRead, SchemaWrite};

use super::blob::{BLOB_VERSION, blob_payload, with_version_prefix};
use crate::models::{
    BatchTimestamp, CycleMetrics, CycleRecord, DurationTable, FridgeId, FridgeSummary, RawBatch,
};
use crate::store::CycleStore;

#[derive(SchemaRead, SchemaWrite)]
struct StoredMetrics {
    cooldown_time: i64,
    running_time: i64,
    warmup_time: i64,
    next_cycle_start: Option<i64>,
    next_cycle_wait_time: Option<i64>,
}

#[derive(SchemaRead, SchemaWrite)]
struct StoredCycle {
    fridge_id: i64,
    cycle_number: i64,
    cooldown_start: i64,
    cooldown_end: i64,
    warmup_start: i64,
    warmup_end: i64,
    update_timestamp_us: i64,
    metrics: Option<StoredMetrics>,
}

#[derive(SchemaRead, SchemaWrite)]
struct StoredTotals {
    cooldown_time: i64,
    running_time: i64,
    warmup_time: i64,
    next_cycle_wait_time: i64,
}

#[derive(SchemaRead, SchemaWrite)]
struct StoredRatios {
    cooldown_time: Option<f64>,
    running_time: Option<f64>,
    warmup_time: Option<f64>,
    next_cycle_wait_time: Option<f64>,
}

#[derive(SchemaRead, SchemaWrite)]
struct StoredSummary {
    fridge_id: i64,
    num_of_cycles: u64,
    total_time: i64,
    totals: StoredTotals,
    averages: StoredRatios,
    percents: StoredRatios,
    update_timestamp_us: i64,
}

pub(super) fn batch_micros(timestamp: BatchTimestamp) -> i64 {
    timestamp.timestamp_micros()
}

pub(super) fn batch_from_micros(micros: i64) -> anyhow::Result<BatchTimestamp> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| anyhow::anyhow!("batch timestamp out of range: {}", micros))
}

fn log_secs(time: NaiveDateTime) -> i64 {
    time.and_utc().timestamp()
}

fn log_from_secs(secs: i64) -> anyhow::Result<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| anyhow::anyhow!("log timestamp out of range: {}", secs))
}

pub(super) fn encode_cycles(store: &CycleStore) -> anyhow::Result<Vec<u8>> {
    let stored: Vec<StoredCycle> = store
        .iter()
        .flat_map(|(_, cycles)| cycles.values())
        .map(|record| StoredCycle {
            fridge_id: record.fridge_id,
            cycle_number: record.cycle_number,
            cooldown_start: log_secs(record.cooldown_start),
            cooldown_end: log_secs(record.cooldown_end),
            warmup_start: log_secs(record.warmup_start),
            warmup_end: log_secs(record.warmup_end),
            update_timestamp_us: batch_micros(record.update_timestamp),
            metrics: record.metrics.map(|m| StoredMetrics {
                cooldown_time: m.cooldown_time,
                running_time: m.running_time,
                warmup_time: m.warmup_time,
                next_cycle_start: m.next_cycle_start.map(log_secs),
                next_cycle_wait_time: m.next_cycle_wait_time,
            }),
        })
        .collect();
    let payload = wincode::serialize(&stored).map_err(|e| anyhow::anyhow!("wincode: {}", e))?;
    Ok(with_version_prefix(BLOB_VERSION, payload))
}

pub(super) fn decode_cycles(bytes: &[u8]) -> anyhow::Result<CycleStore> {
    let stored: Vec<StoredCycle> = wincode::deserialize(blob_payload(bytes, BLOB_VERSION)?)
        .map_err(|e| anyhow::anyhow!("wincode deserialize cycles: {}", e))?;
    let mut store = CycleStore::new();
    for s in stored {
        let metrics = match s.metrics {
            Some(m) => Some(CycleMetrics {
                cooldown_time: m.cooldown_time,
                running_time: m.running_time,
                warmup_time: m.warmup_time,
                next_cycle_start: m.next_cycle_start.map(log_from_secs).transpose()?,
                next_cycle_wait_time: m.next_cycle_wait_time,
            }),
            None => None,
        };
        store.merge(CycleRecord {
            fridge_id: s.fridge_id,
            cycle_number: s.cycle_number,
            cooldown_start: log_from_secs(s.cooldown_start)?,
            cooldown_end: log_from_secs(s.cooldown_end)?,
            warmup_start: log_from_secs(s.warmup_start)?,
            warmup_end: log_from_secs(s.warmup_end)?,
            update_timestamp: batch_from_micros(s.update_timestamp_us)?,
            metrics,
        });
    }
    Ok(store)
}

pub(super) fn encode_summaries(
    summaries: &BTreeMap<FridgeId, FridgeSummary>,
) -> anyhow::Result<Vec<u8>> {
    let stored: Vec<StoredSummary> = summaries
        .values()
        .map(|s| StoredSummary {
            fridge_id: s.fridge_id,
            num_of_cycles: s.num_of_cycles as u64,
            total_time: s.total_time,
            totals: StoredTotals {
                cooldown_time: s.totals.cooldown_time,
                running_time: s.totals.running_time,
                warmup_time: s.totals.warmup_time,
                next_cycle_wait_time: s.totals.next_cycle_wait_time,
            },
            averages: stored_ratios(&s.averages),
            percents: stored_ratios(&s.percents),
            update_timestamp_us: batch_micros(s.update_timestamp),
        })
        .collect();
    let payload = wincode::serialize(&stored).map_err(|e| anyhow::anyhow!("wincode: {}", e))?;
    Ok(with_version_prefix(BLOB_VERSION, payload))
}

pub(super) fn decode_summaries(bytes: &[u8]) -> anyhow::Result<BTreeMap<FridgeId, FridgeSummary>> {
    let stored: Vec<StoredSummary> = wincode::deserialize(blob_payload(bytes, BLOB_VERSION)?)
        .map_err(|e| anyhow::anyhow!("wincode deserialize summaries: {}", e))?;
    let mut out = BTreeMap::new();
    for s in stored {
        let summary = FridgeSummary {
            fridge_id: s.fridge_id,
            num_of_cycles: s.num_of_cycles as usize,
            total_time: s.total_time,
            totals: DurationTable {
                cooldown_time: s.totals.cooldown_time,
                running_time: s.totals.running_time,
                warmup_time: s.totals.warmup_time,
                next_cycle_wait_time: s.totals.next_cycle_wait_time,
            },
            averages: ratio_table(s.averages),
            percents: ratio_table(s.percents),
            update_timestamp: batch_from_micros(s.update_timestamp_us)?,
        };
        out.insert(summary.fridge_id, summary);
    }
    Ok(out)
}

pub(super) fn encode_raw(raw: &RawBatch) -> anyhow::Result<Vec<u8>> {
    let payload =
        wincode::serialize(&raw.lines).map_err(|e| anyhow::anyhow!("wincode: {}", e))?;
    Ok(with_version_prefix(BLOB_VERSION, payload))
}

pub(super) fn decode_raw(bytes: &[u8]) -> anyhow::Result<RawBatch> {
    let lines: Vec<String> = wincode::deserialize(blob_payload(bytes, BLOB_VERSION)?)
        .map_err(|e| anyhow::anyhow!("wincode deserialize raw lines: {}", e))?;
    Ok(RawBatch::new(lines))
}

fn stored_ratios(table: &DurationTable<Option<f64>>) -> StoredRatios {
    StoredRatios {
        cooldown_time: table.cooldown_time,
        running_time: table.running_time,
        warmup_time: table.warmup_time,
        next_cycle_wait_time: table.next_cycle_wait_time,
    }
}

fn ratio_table(stored: StoredRatios) -> DurationTable<Option<f64>> {
    DurationTable {
        cooldown_time: stored.cooldown_time,
        running_time: stored.running_time,
        warmup_time: stored.warmup_time,
        next_cycle_wait_time: stored.next_cycle_wait_time,
    }
}
