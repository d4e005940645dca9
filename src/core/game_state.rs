use crate::core::constants::{STARTING_COINS, STARTING_MAP_EXPANSIONS};
use crate::map::geometry::side_for_expansions;
use crate::miners::Roster;
use crate::resources::{effective_weights, Inventory, Ore, OreWeights, ResourceLevels};

/// All player progress. The tile grid lives beside it in a `Mine`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub coins: f64,
    /// Map side length minus one.
    pub map_expansions: u32,
    pub roster: Roster,
    pub resources: ResourceLevels,
    pub inventory: Inventory,
    pub active_play_seconds: f64,
    pub auto_sell_enabled: bool,
    pub left_handed_mode: bool,
    /// Epoch milliseconds of the last save.
    pub last_save_time: i64,
    pub lifetime_coins: f64,
    pub total_activations: u64,
}

impl GameState {
    /// A fresh game: no coins, no miners, only sand.
    pub fn new(current_time_ms: i64) -> Self {
        Self {
            coins: STARTING_COINS,
            map_expansions: STARTING_MAP_EXPANSIONS,
            roster: Roster::new(),
            resources: ResourceLevels::new(),
            inventory: Inventory::new(),
            active_play_seconds: 0.0,
            auto_sell_enabled: true,
            left_handed_mode: false,
            last_save_time: current_time_ms,
            lifetime_coins: 0.0,
            total_activations: 0,
        }
    }

    /// Map side length in tiles.
    pub fn side(&self) -> usize {
        side_for_expansions(self.map_expansions)
    }

    pub fn weights(&self) -> OreWeights {
        effective_weights(&self.resources)
    }

    /// Adds coins earned, keeping the lifetime total in step.
    pub fn credit(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.coins += amount;
            self.lifetime_coins += amount;
        }
    }

    /// Deducts `cost` if affordable.
    pub fn spend(&mut self, cost: f64) -> bool {
        if !cost.is_finite() || cost < 0.0 || self.coins < cost {
            return false;
        }
        self.coins -= cost;
        true
    }

    /// Books one activation. With auto-sell the whole payout becomes coins;
    /// without it the raw ore goes to the inventory and only the bonus share
    /// above the ore's plain value is paid out.
    pub fn credit_mining(&mut self, ore: Ore, units: u32, payout: f64) {
        self.total_activations += 1;
        if self.auto_sell_enabled {
            self.credit(payout);
        } else {
            self.inventory.add_pending(ore, u64::from(units));
            self.credit(payout - units as f64 * ore.value());
        }
    }
}
