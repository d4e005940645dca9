//! Scheduled tile respawns on a virtual clock.
//!
//! A mined tile is not restored by a timer callback. Instead a
//! [`RespawnEvent`] is queued and the scheduler polls the queue each tick.
//! Rebuilding the grid bumps the queue's epoch; events from an older epoch
//! are discarded when they come due, so they can never touch the new tiles.

use crate::core::constants::RESPAWN_DELAY_SECONDS;
use crate::map::{Enchantment, TileGrid};
use crate::resources::{roll_tile_type, OreWeights, QualityBoost};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct RespawnEvent {
    pub tile: usize,
    /// Virtual clock time, in seconds.
    pub fire_at: f64,
    pub epoch: u64,
    /// Roll bias for the replacement ore.
    pub boost: Option<QualityBoost>,
    /// Enchantment stamped onto the respawned tile.
    pub enchant: Enchantment,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RespawnQueue {
    clock: f64,
    epoch: u64,
    pending: Vec<RespawnEvent>,
}

impl RespawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn advance(&mut self, dt_seconds: f64) {
        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            self.clock += dt_seconds;
        }
    }

    pub fn schedule(&mut self, tile: usize, boost: Option<QualityBoost>, enchant: Enchantment) {
        self.pending.push(RespawnEvent {
            tile,
            fire_at: self.clock + RESPAWN_DELAY_SECONDS,
            epoch: self.epoch,
            boost,
            enchant,
        });
    }

    /// Orphans every queued event. Called whenever the tiles are rebuilt.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Removes and returns the events that are due, oldest first.
    /// Events from a previous epoch are dropped silently.
    pub fn take_due(&mut self) -> Vec<RespawnEvent> {
        let now = self.clock;
        let epoch = self.epoch;
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|e| e.fire_at <= now);
        self.pending = waiting;
        self.pending.retain(|e| e.epoch == epoch);
        due.into_iter().filter(|e| e.epoch == epoch).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Seconds until `tile` respawns, if it is waiting.
    pub fn remaining(&self, tile: usize) -> Option<f64> {
        self.pending
            .iter()
            .filter(|e| e.tile == tile && e.epoch == self.epoch)
            .map(|e| (e.fire_at - self.clock).max(0.0))
            .reduce(f64::min)
    }
}

/// Restores one tile from a due event: fresh ore roll, cooldown cleared,
/// enchantment stamped. Returns false if the tile no longer exists.
pub fn apply_respawn<G: TileGrid, R: Rng>(
    grid: &mut G,
    event: &RespawnEvent,
    weights: &OreWeights,
    rng: &mut R,
) -> bool {
    let ore = roll_tile_type(weights, event.boost, rng);
    let Some(tile) = grid.tile_mut(event.tile) else {
        return false;
    };
    tile.ore = ore;
    tile.cooldown = false;
    tile.enchantment = event.enchant;
    true
}
