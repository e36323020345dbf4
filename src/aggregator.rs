// Summary aggregator: reduces a fridge's derived cycles to totals, averages and percents.

use crate::deriver::seconds_between;
use crate::models::{BatchTimestamp, CycleDurations, DurationTable, FridgeId, FridgeSummary};

/// Builds the summary of one fridge from its derived cycles (ascending cycle number).
/// Returns `None` when there are no cycles.
pub fn summarize(
    fridge_id: FridgeId,
    cycles: &[CycleDurations],
    update_timestamp: BatchTimestamp,
) -> Option<FridgeSummary> {
    let first = cycles.first()?;
    let last = cycles.last()?;
    let total_time = seconds_between(first.start, last.end);

    let mut totals = DurationTable::<i64>::default();
    for cycle in cycles {
        totals.cooldown_time += cycle.cooldown_time;
        totals.running_time += cycle.running_time;
        totals.warmup_time += cycle.warmup_time;
        // Only the last cycle lacks a wait time.
        if let Some(wait) = cycle.next_cycle_wait_time {
            totals.next_cycle_wait_time += wait;
        }
    }

    let num_of_cycles = cycles.len();
    let n = num_of_cycles as i64;
    let averages = DurationTable {
        cooldown_time: ratio(totals.cooldown_time, n),
        running_time: ratio(totals.running_time, n),
        warmup_time: ratio(totals.warmup_time, n),
        next_cycle_wait_time: ratio(totals.next_cycle_wait_time, n - 1),
    };
    let percents = totals.map(|_, total| ratio(total, total_time));

    Some(FridgeSummary {
        fridge_id,
        num_of_cycles,
        total_time,
        totals,
        averages,
        percents,
        update_timestamp,
    })
}

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: i64, denominator: i64) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(numerator as f64 / denominator as f64)
}
