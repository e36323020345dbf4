// Text rendering of summaries and cycle tables for the terminal

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::Local;

use crate::models::{CycleNumber, DurationKind, FridgeId, FridgeSummary};
use crate::store::{CycleStore, FridgeCycles};

const NOT_AVAILABLE: &str = "N/A";
const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which parts of the report to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub fridge: Option<FridgeId>,
    pub cycle: Option<CycleNumber>,
    pub show_summary: bool,
    pub show_cycles: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            fridge: None,
            cycle: None,
            show_summary: true,
            show_cycles: true,
        }
    }
}

/// `Days DD, HH:MM:SS`. Fractional seconds are truncated; negative periods get a leading `-`.
pub fn format_time_period(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs().trunc() as i64;
    let (minutes, secs) = (total / 60, total % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    let (days, hours) = (hours / 24, hours % 24);
    format!("{sign}Days {days:02}, {hours:02}:{minutes:02}:{secs:02}")
}

fn format_seconds(seconds: i64) -> String {
    format_time_period(seconds as f64)
}

fn format_optional_period(seconds: Option<f64>) -> String {
    seconds.map_or_else(|| NOT_AVAILABLE.to_string(), format_time_period)
}

fn format_percent(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{:11.2}%", f * 100.0),
        None => format!("{NOT_AVAILABLE:>12}"),
    }
}

fn row_label(kind: DurationKind) -> &'static str {
    match kind {
        DurationKind::CooldownTime => "Cool Down Time:",
        DurationKind::RunningTime => "Running Time:",
        DurationKind::WarmupTime => "Warm Up Time:",
        DurationKind::NextCycleWaitTime => "Wait Time:",
    }
}

/// Totals / averages / percents table for one fridge.
pub fn format_summary(summary: &FridgeSummary) -> String {
    let mut out = format!(
        "  {:20}  {:^20}  {:^20}  {:^20}\n",
        "Times", "Total", "Average", "Percent"
    );
    for kind in DurationKind::ALL {
        let _ = writeln!(
            out,
            "  {:20}   {:^20}  {:^20}  {}",
            row_label(kind),
            format_seconds(summary.totals.get(kind)),
            format_optional_period(summary.averages.get(kind)),
            format_percent(summary.percents.get(kind)),
        );
    }
    out
}

/// One row per derived cycle in cycle-number order, optionally restricted to `only`.
pub fn format_cycles(cycles: &FridgeCycles, only: Option<CycleNumber>) -> String {
    let mut out = format!(
        "  Cycles {:^20}  {:^20}  {:^20}   {:^20}  {:^20}  {:^20}\n",
        "Start", "End", "Cooldown", "Running", "Warmup", "Wait"
    );
    let rows = cycles
        .values()
        .filter(|record| only.is_none_or(|n| record.cycle_number == n))
        .filter_map(|record| record.durations());
    for cycle in rows {
        let wait = cycle
            .next_cycle_wait_time
            .map_or_else(|| NOT_AVAILABLE.to_string(), format_seconds);
        let _ = writeln!(
            out,
            "  {:4}   {:20}   {:20}   {:20}   {:20}   {:20}  {}",
            cycle.cycle_number,
            cycle.start.format(STAMP_FORMAT).to_string(),
            cycle.end.format(STAMP_FORMAT).to_string(),
            format_seconds(cycle.cooldown_time),
            format_seconds(cycle.running_time),
            format_seconds(cycle.warmup_time),
            wait,
        );
    }
    out
}

fn format_footer(summary: &FridgeSummary) -> String {
    format!(
        "Fridge {}: Cycle Count: {}  Total Time: {}  Updated: {}\n",
        summary.fridge_id,
        summary.num_of_cycles,
        format_seconds(summary.total_time),
        summary
            .update_timestamp
            .with_timezone(&Local)
            .format(STAMP_FORMAT),
    )
}

/// Full report over every fridge (or the selected one). Works for the live state and for a
/// history snapshot alike.
pub fn format_report(
    summaries: &BTreeMap<FridgeId, FridgeSummary>,
    cycles: &CycleStore,
    options: &ReportOptions,
) -> String {
    let mut out = String::new();
    let fridges = cycles
        .iter()
        .filter(|(fridge_id, _)| options.fridge.is_none_or(|f| *fridge_id == f));
    for (fridge_id, fridge_cycles) in fridges {
        let Some(summary) = summaries.get(&fridge_id) else {
            let _ = writeln!(out, "Fridge {fridge_id}: No data\n");
            continue;
        };
        if options.show_summary {
            let _ = writeln!(out, "Fridge {fridge_id} Summary:");
            out.push_str(&format_summary(summary));
        }
        if options.show_cycles {
            let _ = writeln!(out, "Fridge {fridge_id} Cycle Data:");
            out.push_str(&format_cycles(fridge_cycles, options.cycle));
        }
        out.push_str(&format_footer(summary));
        out.push('\n');
    }
    if out.is_empty() {
        return match options.fridge {
            Some(fridge_id) => format!("Fridge {fridge_id}: No data"),
            None => "No data".to_string(),
        };
    }
    out.trim_end().to_string()
}
