// Domain models: cycle records, fridge summaries, history snapshots

mod cycle;
mod snapshot;
mod summary;

pub use cycle::{
    BatchTimestamp, CycleDurations, CycleMetrics, CycleNumber, CycleRecord, FridgeId,
    ParsedRecord,
};
pub use snapshot::{HistoryEntry, HistorySnapshot, RawBatch};
pub use summary::{DurationKind, DurationTable, FridgeSummary};
