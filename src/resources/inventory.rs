//! Ore inventory with per-tick batching.
//!
//! Activations during a tick land in `pending`; the scheduler flushes them
//! into the confirmed counts once the tick is done. Only the flushed total is
//! ever persisted.

use super::catalog::{Ore, ORE_COUNT};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    confirmed: [u64; ORE_COUNT],
    pending: [u64; ORE_COUNT],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmed plus pending count.
    pub fn count(&self, ore: Ore) -> u64 {
        self.confirmed[ore.index()].saturating_add(self.pending[ore.index()])
    }

    /// Flushed count only; this is what a save records.
    pub fn confirmed(&self, ore: Ore) -> u64 {
        self.confirmed[ore.index()]
    }

    pub fn add_pending(&mut self, ore: Ore, units: u64) {
        let slot = &mut self.pending[ore.index()];
        *slot = slot.saturating_add(units);
    }

    /// Sets a confirmed count directly (used when restoring a save).
    pub fn set_confirmed(&mut self, ore: Ore, units: u64) {
        self.confirmed[ore.index()] = units;
    }

    /// Moves all pending units into the confirmed counts.
    /// Returns true if anything was pending.
    pub fn flush(&mut self) -> bool {
        let mut moved = false;
        for i in 0..ORE_COUNT {
            if self.pending[i] > 0 {
                self.confirmed[i] = self.confirmed[i].saturating_add(self.pending[i]);
                self.pending[i] = 0;
                moved = true;
            }
        }
        moved
    }

    /// Removes every unit of `ore` and returns how many there were.
    pub fn take(&mut self, ore: Ore) -> u64 {
        let units = self.count(ore);
        self.confirmed[ore.index()] = 0;
        self.pending[ore.index()] = 0;
        units
    }

    /// Coin value of everything held.
    pub fn total_value(&self) -> f64 {
        Ore::ALL
            .iter()
            .map(|ore| self.count(*ore) as f64 * ore.value())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        Ore::ALL.iter().all(|ore| self.count(*ore) == 0)
    }

    /// Iterates `(ore, count)` for ores with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (Ore, u64)> + '_ {
        Ore::ALL
            .iter()
            .copied()
            .map(move |ore| (ore, self.count(ore)))
            .filter(|(_, count)| *count > 0)
    }
}
