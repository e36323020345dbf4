// Metric deriver: full recomputation of one fridge's cycles, in cycle-number order.
// A new cycle can change the previous cycle's wait time, so every cycle is redone each time.

use chrono::NaiveDateTime;

use crate::models::{CycleDurations, CycleMetrics, CycleRecord};
use crate::store::FridgeCycles;

/// Recomputes and stores metrics for every cycle of one fridge. Returns the derived cycles
/// in ascending cycle-number order; empty input is a no-op.
pub fn derive_cycles(cycles: &mut FridgeCycles) -> Vec<CycleDurations> {
    let next_starts: Vec<Option<NaiveDateTime>> = cycles
        .values()
        .skip(1)
        .map(|next| Some(next.cooldown_start))
        .chain(std::iter::once(None))
        .collect();

    cycles
        .values_mut()
        .zip(next_starts)
        .map(|(record, next_cycle_start)| {
            let metrics = derive_metrics(record, next_cycle_start);
            record.metrics = Some(metrics);
            CycleDurations::from_record(record, metrics)
        })
        .collect()
}

/// Metrics of one cycle given the cooldown_start of the following cycle, if any.
pub fn derive_metrics(
    record: &CycleRecord,
    next_cycle_start: Option<NaiveDateTime>,
) -> CycleMetrics {
    CycleMetrics {
        cooldown_time: seconds_between(record.cooldown_start, record.cooldown_end),
        running_time: seconds_between(record.cooldown_end, record.warmup_start),
        warmup_time: seconds_between(record.warmup_start, record.warmup_end),
        next_cycle_start,
        next_cycle_wait_time: next_cycle_start
            .map(|next_start| seconds_between(record.warmup_end, next_start)),
    }
}

pub(crate) fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds()
}
