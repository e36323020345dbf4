// Cycle store: latest record per (fridge_id, cycle_number). Last write wins, whole record.
// BTreeMaps keep fridges and cycles in ascending numeric order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CycleNumber, CycleRecord, FridgeId};

/// Cycles of one fridge, ordered by cycle number.
pub type FridgeCycles = BTreeMap<CycleNumber, CycleRecord>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleStore {
    fridges: BTreeMap<FridgeId, FridgeCycles>,
}

impl CycleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` at its key, replacing any previous record. Returns the replaced one.
    pub fn merge(&mut self, record: CycleRecord) -> Option<CycleRecord> {
        self.fridges
            .entry(record.fridge_id)
            .or_default()
            .insert(record.cycle_number, record)
    }

    pub fn get(&self, fridge_id: FridgeId, cycle_number: CycleNumber) -> Option<&CycleRecord> {
        self.fridges.get(&fridge_id)?.get(&cycle_number)
    }

    pub fn fridge(&self, fridge_id: FridgeId) -> Option<&FridgeCycles> {
        self.fridges.get(&fridge_id)
    }

    pub(crate) fn fridge_mut(&mut self, fridge_id: FridgeId) -> Option<&mut FridgeCycles> {
        self.fridges.get_mut(&fridge_id)
    }

    pub fn fridge_ids(&self) -> impl Iterator<Item = FridgeId> + '_ {
        self.fridges.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FridgeId, &FridgeCycles)> {
        self.fridges.iter().map(|(id, cycles)| (*id, cycles))
    }

    pub fn num_fridges(&self) -> usize {
        self.fridges.len()
    }

    pub fn num_cycles(&self, fridge_id: FridgeId) -> usize {
        self.fridges.get(&fridge_id).map_or(0, BTreeMap::len)
    }

    /// Total number of records across all fridges.
    pub fn len(&self) -> usize {
        self.fridges.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fridges.is_empty()
    }
}
