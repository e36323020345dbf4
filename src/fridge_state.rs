// Fridge state: owns the cycle store, the summaries and the history log.
// `update` is the only mutating entry point: parse -> merge -> derive -> summarize -> history.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::aggregator;
use crate::deriver;
use crate::history_log::HistoryLog;
use crate::models::{
    BatchTimestamp, CycleDurations, CycleRecord, FridgeId, FridgeSummary, HistorySnapshot,
    RawBatch,
};
use crate::parser::{self, LineError, ValidationPolicy};
use crate::store::CycleStore;

/// Handle shared between the update loop and read-only consumers. `update` runs under the
/// write lock, so readers never see a half-applied batch.
pub type SharedFridgeState = Arc<RwLock<FridgeState>>;

/// A data line that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    /// 1-based position in the batch.
    pub line_number: usize,
    pub error: LineError,
}

/// Outcome of one `update` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateReport {
    pub timestamp: BatchTimestamp,
    pub lines_read: usize,
    pub accepted: usize,
    pub comments: usize,
    pub rejected: Vec<RejectedLine>,
    /// Fridges with at least one accepted record in this batch, ascending.
    pub fridges_touched: Vec<FridgeId>,
}

/// Published after every update: the report plus the new summaries of touched fridges.
#[derive(Debug, Clone, Serialize)]
pub struct FridgeUpdate {
    pub report: UpdateReport,
    pub summaries: Vec<FridgeSummary>,
}

pub struct FridgeState {
    cycles: CycleStore,
    summaries: BTreeMap<FridgeId, FridgeSummary>,
    history: HistoryLog,
    policy: ValidationPolicy,
}

impl FridgeState {
    pub fn new(history: HistoryLog) -> Self {
        Self {
            cycles: CycleStore::new(),
            summaries: BTreeMap::new(),
            history,
            policy: ValidationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn into_shared(self) -> SharedFridgeState {
        Arc::new(RwLock::new(self))
    }

    /// Applies one batch of raw log lines stamped with the current time.
    pub fn update<I, S>(&mut self, lines: I) -> UpdateReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.update_at(lines, Utc::now())
    }

    /// Applies one batch stamped with `timestamp`. Bad lines are skipped; the batch as a
    /// whole never fails.
    pub fn update_at<I, S>(&mut self, lines: I, timestamp: BatchTimestamp) -> UpdateReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim_end_matches(['\r', '\n']).to_string())
            .collect();

        let mut report = UpdateReport {
            timestamp,
            lines_read: raw.len(),
            accepted: 0,
            comments: 0,
            rejected: Vec::new(),
            fridges_touched: Vec::new(),
        };
        let mut touched = BTreeSet::new();

        for (idx, line) in raw.iter().enumerate() {
            match parser::parse_line(line, self.policy) {
                Ok(Some(parsed)) => {
                    self.cycles.merge(CycleRecord::from_parsed(parsed, timestamp));
                    touched.insert(parsed.fridge_id);
                    report.accepted += 1;
                }
                Ok(None) => report.comments += 1,
                Err(error) => {
                    tracing::warn!(
                        line_number = idx + 1,
                        error = %error,
                        "Rejected log line"
                    );
                    report.rejected.push(RejectedLine {
                        line_number: idx + 1,
                        error,
                    });
                }
            }
        }

        for &fridge_id in &touched {
            self.refresh_fridge(fridge_id, timestamp);
        }
        report.fridges_touched = touched.into_iter().collect();

        let snapshot = self.snapshot();
        self.history.append(timestamp, snapshot, RawBatch::new(raw));

        tracing::info!(
            operation = "update",
            lines_read = report.lines_read,
            accepted = report.accepted,
            rejected = report.rejected.len(),
            fridges_touched = report.fridges_touched.len(),
            "Batch applied"
        );
        report
    }

    /// Re-derives every cycle of one fridge and rebuilds its summary.
    fn refresh_fridge(&mut self, fridge_id: FridgeId, timestamp: BatchTimestamp) {
        let Some(cycles) = self.cycles.fridge_mut(fridge_id) else {
            return;
        };
        let durations = deriver::derive_cycles(cycles);
        match aggregator::summarize(fridge_id, &durations, timestamp) {
            Some(summary) => {
                self.summaries.insert(fridge_id, summary);
            }
            None => {
                self.summaries.remove(&fridge_id);
            }
        }
    }

    /// Current state in history-snapshot form.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            summaries: self.summaries.clone(),
            cycles: self.cycles.clone(),
        }
    }

    pub fn fridge_ids(&self) -> Vec<FridgeId> {
        self.cycles.fridge_ids().collect()
    }

    pub fn num_fridges(&self) -> usize {
        self.cycles.num_fridges()
    }

    pub fn num_cycles(&self, fridge_id: FridgeId) -> usize {
        self.cycles.num_cycles(fridge_id)
    }

    /// Derived cycles of one fridge in cycle-number order; `None` when there is no data.
    pub fn cycle_durations(&self, fridge_id: FridgeId) -> Option<Vec<CycleDurations>> {
        self.cycles
            .fridge(fridge_id)?
            .values()
            .map(CycleRecord::durations)
            .collect()
    }

    /// `None` when there is no data for the fridge.
    pub fn summary(&self, fridge_id: FridgeId) -> Option<&FridgeSummary> {
        self.summaries.get(&fridge_id)
    }

    pub fn summaries(&self) -> &BTreeMap<FridgeId, FridgeSummary> {
        &self.summaries
    }

    pub fn raw_batch(&self, timestamp: &BatchTimestamp) -> Option<&RawBatch> {
        self.history.get(timestamp).map(|entry| &entry.raw)
    }

    pub fn cycle_store(&self) -> &CycleStore {
        &self.cycles
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }
}
