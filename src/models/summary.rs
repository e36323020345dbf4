// Fridge-level summary: totals, averages and percents over the four duration kinds

use serde::{Deserialize, Serialize};

use super::{BatchTimestamp, FridgeId};

/// The four duration kinds tracked per cycle, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationKind {
    CooldownTime,
    RunningTime,
    WarmupTime,
    NextCycleWaitTime,
}

impl DurationKind {
    pub const ALL: [DurationKind; 4] = [
        DurationKind::CooldownTime,
        DurationKind::RunningTime,
        DurationKind::WarmupTime,
        DurationKind::NextCycleWaitTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DurationKind::CooldownTime => "cooldown_time",
            DurationKind::RunningTime => "running_time",
            DurationKind::WarmupTime => "warmup_time",
            DurationKind::NextCycleWaitTime => "next_cycle_wait_time",
        }
    }
}

/// One value per duration kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationTable<T> {
    pub cooldown_time: T,
    pub running_time: T,
    pub warmup_time: T,
    pub next_cycle_wait_time: T,
}

impl<T> DurationTable<T> {
    pub fn get_mut(&mut self, kind: DurationKind) -> &mut T {
        match kind {
            DurationKind::CooldownTime => &mut self.cooldown_time,
            DurationKind::RunningTime => &mut self.running_time,
            DurationKind::WarmupTime => &mut self.warmup_time,
            DurationKind::NextCycleWaitTime => &mut self.next_cycle_wait_time,
        }
    }
}

impl<T: Copy> DurationTable<T> {
    pub fn get(&self, kind: DurationKind) -> T {
        match kind {
            DurationKind::CooldownTime => self.cooldown_time,
            DurationKind::RunningTime => self.running_time,
            DurationKind::WarmupTime => self.warmup_time,
            DurationKind::NextCycleWaitTime => self.next_cycle_wait_time,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(DurationKind, T) -> U) -> DurationTable<U> {
        DurationTable {
            cooldown_time: f(DurationKind::CooldownTime, self.cooldown_time),
            running_time: f(DurationKind::RunningTime, self.running_time),
            warmup_time: f(DurationKind::WarmupTime, self.warmup_time),
            next_cycle_wait_time: f(DurationKind::NextCycleWaitTime, self.next_cycle_wait_time),
        }
    }
}

impl DurationTable<i64> {
    pub fn sum(&self) -> i64 {
        self.cooldown_time + self.running_time + self.warmup_time + self.next_cycle_wait_time
    }
}

/// Summary of every accumulated cycle of one fridge. Rebuilt wholesale whenever the fridge
/// is touched by an update.
///
/// `averages` and `percents` use `None` for an undefined ratio: the wait-time average of a
/// single-cycle fridge, and every percent when `total_time` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FridgeSummary {
    pub fridge_id: FridgeId,
    pub num_of_cycles: usize,
    /// Seconds from the first cycle's cooldown_start to the last cycle's warmup_end.
    pub total_time: i64,
    pub totals: DurationTable<i64>,
    pub averages: DurationTable<Option<f64>>,
    pub percents: DurationTable<Option<f64>>,
    pub update_timestamp: BatchTimestamp,
}
