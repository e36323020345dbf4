// History snapshot: cumulative derived state after one batch, plus that batch's raw lines

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BatchTimestamp, FridgeId, FridgeSummary};
use crate::store::CycleStore;

/// Full state (all summaries, full cycle store) as it stood right after one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub summaries: BTreeMap<FridgeId, FridgeSummary>,
    pub cycles: CycleStore,
}

/// Verbatim input lines of one update call. Audit only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBatch {
    pub lines: Vec<String>,
}

impl RawBatch {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One history record: batch timestamp, resulting snapshot and the batch's raw input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: BatchTimestamp,
    pub snapshot: HistorySnapshot,
    pub raw: RawBatch,
}
