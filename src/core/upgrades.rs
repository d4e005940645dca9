//! Purchases and their cost curves.
//!
//! Every purchase checks its preconditions before touching coins, so a
//! declined action leaves the state exactly as it was.

use crate::core::constants::*;
use crate::core::game_state::GameState;
use crate::map::geometry::clamp_to_map;
use crate::map::{Point, TileGrid};
use crate::miners::{ClassUpgrade, Specialization, SpecializationKind, Targeting};
use crate::mining::Mine;
use crate::resources::{can_increase_ore_generation, Ore};
use rand::Rng;
use tracing::{debug, info};

fn geometric(base: f64, growth: f64, level: u32) -> f64 {
    (base * growth.powi(level as i32)).ceil()
}

pub fn miner_cost(owned: usize) -> f64 {
    geometric(MINER_BASE_COST, MINER_COST_GROWTH, owned as u32)
}

pub fn speed_upgrade_cost(level: u32) -> f64 {
    geometric(SPEED_UPGRADE_BASE_COST, SPEED_UPGRADE_COST_GROWTH, level)
}

pub fn radius_upgrade_cost(level: u32) -> f64 {
    geometric(RADIUS_UPGRADE_BASE_COST, RADIUS_UPGRADE_COST_GROWTH, level)
}

pub fn class_upgrade_cost(upgrade: ClassUpgrade, level: u32) -> f64 {
    geometric(upgrade.base_cost(), CLASS_UPGRADE_COST_GROWTH, level)
}

pub fn map_expansion_cost(expansions: u32) -> f64 {
    geometric(MAP_EXPANSION_BASE_COST, MAP_EXPANSION_COST_GROWTH, expansions)
}

/// Price of the next generation level for `ore`; the gem tier is priced
/// by its shared level. `None` for sand.
pub fn ore_generation_cost(state: &GameState, ore: Ore) -> Option<f64> {
    let level = if ore.is_gem() {
        state.resources.gem_level()
    } else {
        state.resources.level(ore)
    };
    ore.generation_cost(level)
}

// ── Roster ──────────────────────────────────────────────────────

/// Hires one more miner, placed on the default ring.
pub fn buy_miner(state: &mut GameState) -> bool {
    if state.roster.is_full() {
        return false;
    }
    let cost = miner_cost(state.roster.len());
    if !state.spend(cost) {
        return false;
    }
    let side = state.side();
    let owned = state.roster.resize(state.roster.len() + 1, side);
    debug!(owned, cost, "bought miner");
    true
}

pub fn buy_miner_speed_upgrade(state: &mut GameState, miner: usize) -> bool {
    let Some(level) = state.roster.get(miner).map(|u| u.speed_level) else {
        return false;
    };
    if level >= MAX_SPEED_LEVEL || !state.spend(speed_upgrade_cost(level)) {
        return false;
    }
    if let Some(unit) = state.roster.get_mut(miner) {
        unit.speed_level += 1;
    }
    debug!(miner, level = level + 1, "speed upgrade");
    true
}

pub fn buy_miner_radius_upgrade(state: &mut GameState, miner: usize) -> bool {
    let Some(level) = state.roster.get(miner).map(|u| u.radius_level) else {
        return false;
    };
    if level >= MAX_RADIUS_LEVEL || !state.spend(radius_upgrade_cost(level)) {
        return false;
    }
    if let Some(unit) = state.roster.get_mut(miner) {
        unit.radius_level += 1;
    }
    debug!(miner, level = level + 1, "radius upgrade");
    true
}

/// One-off purchase that lets a miner pick a class.
pub fn unlock_specialization(state: &mut GameState, miner: usize) -> bool {
    match state.roster.get(miner) {
        Some(unit) if !unit.specialization_unlocked => {}
        _ => return false,
    }
    if !state.spend(SPECIALIZATION_UNLOCK_COST) {
        return false;
    }
    if let Some(unit) = state.roster.get_mut(miner) {
        unit.specialization_unlocked = true;
    }
    debug!(miner, "specialization unlocked");
    true
}

/// Switches class. Free once unlocked; class upgrades start over.
pub fn set_specialization(state: &mut GameState, miner: usize, kind: SpecializationKind) -> bool {
    let Some(unit) = state.roster.get_mut(miner) else {
        return false;
    };
    if !unit.specialization_unlocked || unit.kind() == kind {
        return false;
    }
    unit.specialization = Specialization::new(kind);
    debug!(miner, class = kind.name(), "specialization changed");
    true
}

pub fn buy_specialization_upgrade(
    state: &mut GameState,
    miner: usize,
    upgrade: ClassUpgrade,
) -> bool {
    let Some(level) = state
        .roster
        .get(miner)
        .filter(|u| u.specialization_unlocked)
        .and_then(|u| u.specialization.level(upgrade))
    else {
        return false;
    };
    if level >= upgrade.max_level() || !state.spend(class_upgrade_cost(upgrade, level)) {
        return false;
    }
    if let Some(slot) = state
        .roster
        .get_mut(miner)
        .and_then(|u| u.specialization.level_mut(upgrade))
    {
        *slot += 1;
    }
    debug!(miner, upgrade = upgrade.name(), level = level + 1, "class upgrade");
    true
}

pub fn set_targeting(state: &mut GameState, miner: usize, targeting: Targeting) -> bool {
    match state.roster.get_mut(miner) {
        Some(unit) => {
            unit.targeting = targeting;
            true
        }
        None => false,
    }
}

/// Moves a miner; the point is clamped into the map.
pub fn reposition_miner(state: &mut GameState, miner: usize, point: Point) -> bool {
    let side = state.side();
    match state.roster.get_mut(miner) {
        Some(unit) => {
            unit.position = clamp_to_map(point, side);
            true
        }
        None => false,
    }
}

// ── Resources ───────────────────────────────────────────────────

/// Raises the generation level of `ore` (all five gems for a gem).
pub fn buy_ore_generation(state: &mut GameState, ore: Ore) -> bool {
    if !can_increase_ore_generation(&state.resources, ore) {
        return false;
    }
    let Some(cost) = ore_generation_cost(state, ore) else {
        return false;
    };
    if !state.spend(cost) {
        return false;
    }
    if ore.is_gem() {
        let next = state.resources.gem_level() + 1;
        for gem in Ore::GEMS {
            state.resources.set_level(gem, next);
        }
        state.resources.sync_gem_levels();
    } else {
        let next = state.resources.level(ore) + 1;
        state.resources.set_level(ore, next);
    }
    info!(ore = ore.name(), cost, "ore generation raised");
    true
}

pub fn toggle_auto_sell(state: &mut GameState) -> bool {
    state.auto_sell_enabled = !state.auto_sell_enabled;
    state.auto_sell_enabled
}

/// Sells every held unit of `ore`; returns the coins received.
pub fn sell_ore(state: &mut GameState, ore: Ore) -> f64 {
    let units = state.inventory.take(ore);
    let coins = units as f64 * ore.value();
    state.credit(coins);
    coins
}

pub fn sell_all(state: &mut GameState) -> f64 {
    let coins: f64 = Ore::ALL.iter().map(|ore| sell_ore(state, *ore)).sum();
    if coins > 0.0 {
        debug!(coins, "sold inventory");
    }
    coins
}

// ── Map ─────────────────────────────────────────────────────────

/// Grows the map by one row and column and rebuilds every tile.
pub fn buy_map_expansion<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    rng: &mut R,
) -> bool {
    if state.map_expansions >= MAX_MAP_EXPANSIONS {
        return false;
    }
    let cost = map_expansion_cost(state.map_expansions);
    if !state.spend(cost) {
        return false;
    }
    state.map_expansions += 1;
    mine.rebuild(state.side(), &state.weights(), rng);
    info!(side = state.side(), cost, "map expanded");
    true
}

/// Wipes all progress and starts a fresh map.
pub fn reset_game<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    now_ms: i64,
    rng: &mut R,
) {
    *state = GameState::new(now_ms);
    mine.rebuild(state.side(), &state.weights(), rng);
    info!("game reset");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapGrid;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rich() -> GameState {
        let mut state = GameState::new(0);
        state.coins = 1e12;
        state
    }

    #[test]
    fn test_cost_curves() {
        assert_eq!(miner_cost(0), 20.0);
        assert_eq!(miner_cost(1), 32.0);
        assert_eq!(speed_upgrade_cost(0), 25.0);
        assert_eq!(speed_upgrade_cost(1), 34.0);
        assert_eq!(radius_upgrade_cost(0), 40.0);
        assert_eq!(radius_upgrade_cost(2), 79.0);
        assert_eq!(map_expansion_cost(2), 1350.0);
        assert_eq!(class_upgrade_cost(ClassUpgrade::Overtime, 0), 800.0);
        assert_eq!(class_upgrade_cost(ClassUpgrade::Overtime, 1), 1200.0);
    }

    #[test]
    fn test_buy_miner_needs_coins_and_room() {
        let mut state = GameState::new(0);
        assert!(!buy_miner(&mut state));
        state.coins = 20.0;
        assert!(buy_miner(&mut state));
        assert_eq!(state.roster.len(), 1);
        assert_eq!(state.coins, 0.0);

        let mut state = rich();
        while buy_miner(&mut state) {}
        assert_eq!(state.roster.len(), MAX_MINERS);
    }

    #[test]
    fn test_speed_upgrade_caps() {
        let mut state = rich();
        buy_miner(&mut state);
        for _ in 0..MAX_SPEED_LEVEL {
            assert!(buy_miner_speed_upgrade(&mut state, 0));
        }
        let coins = state.coins;
        assert!(!buy_miner_speed_upgrade(&mut state, 0));
        assert_eq!(state.coins, coins);
        assert!(!buy_miner_speed_upgrade(&mut state, 3));
    }

    #[test]
    fn test_radius_upgrade() {
        let mut state = rich();
        buy_miner(&mut state);
        assert!(buy_miner_radius_upgrade(&mut state, 0));
        assert_eq!(state.roster.get(0).unwrap().radius_level, 1);
    }

    #[test]
    fn test_specialization_flow() {
        let mut state = rich();
        buy_miner(&mut state);
        assert!(!set_specialization(&mut state, 0, SpecializationKind::Foreman));
        assert!(!buy_specialization_upgrade(&mut state, 0, ClassUpgrade::DoubleMin));
        assert!(unlock_specialization(&mut state, 0));
        assert!(!unlock_specialization(&mut state, 0));

        assert!(buy_specialization_upgrade(&mut state, 0, ClassUpgrade::DoubleMin));
        assert!(!buy_specialization_upgrade(&mut state, 0, ClassUpgrade::Overtime));

        assert!(set_specialization(&mut state, 0, SpecializationKind::Foreman));
        assert!(!set_specialization(&mut state, 0, SpecializationKind::Foreman));
        let unit = state.roster.get(0).unwrap();
        assert_eq!(unit.specialization.level(ClassUpgrade::Overtime), Some(0));

        assert!(set_specialization(&mut state, 0, SpecializationKind::Worker));
        let unit = state.roster.get(0).unwrap();
        assert_eq!(unit.specialization.level(ClassUpgrade::DoubleMin), Some(0));
    }

    #[test]
    fn test_class_upgrade_caps() {
        let mut state = rich();
        buy_miner(&mut state);
        unlock_specialization(&mut state, 0);
        set_specialization(&mut state, 0, SpecializationKind::Geologist);
        for _ in 0..ClassUpgrade::VeinQuality.max_level() {
            assert!(buy_specialization_upgrade(&mut state, 0, ClassUpgrade::VeinQuality));
        }
        assert!(!buy_specialization_upgrade(&mut state, 0, ClassUpgrade::VeinQuality));
    }

    #[test]
    fn test_buy_coal_generation() {
        let mut state = GameState::new(0);
        state.coins = 50.0;
        assert!(buy_ore_generation(&mut state, Ore::Coal));
        assert_eq!(state.resources.level(Ore::Coal), 1);
        assert_eq!(state.weights().weight(Ore::Coal), 600.0);
        assert!(!buy_ore_generation(&mut state, Ore::Sand));
    }

    #[test]
    fn test_gem_tier_moves_in_lockstep() {
        let mut state = rich();
        assert!(buy_ore_generation(&mut state, Ore::Ruby));
        for gem in Ore::GEMS {
            assert_eq!(state.resources.level(gem), 1);
        }
        let spent = 1e12 - state.coins;
        assert_eq!(spent, 200_000.0);
    }

    #[test]
    fn test_reposition_is_clamped() {
        let mut state = rich();
        buy_miner(&mut state);
        assert!(reposition_miner(&mut state, 0, Point::new(-10.0, 5000.0)));
        let p = state.roster.get(0).unwrap().position;
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, state.side() as f64 * TILE_SIZE_PX);
        assert!(!reposition_miner(&mut state, 4, Point::default()));
    }

    #[test]
    fn test_sell_inventory() {
        let mut state = GameState::new(0);
        state.inventory.add_pending(Ore::Gold, 2);
        state.inventory.add_pending(Ore::Coal, 1);
        state.inventory.flush();
        assert_eq!(sell_ore(&mut state, Ore::Gold), 250.0);
        assert_eq!(sell_all(&mut state), 3.0);
        assert!(state.inventory.is_empty());
        assert_eq!(state.coins, 253.0);
    }

    #[test]
    fn test_map_expansion_rebuilds_grid() {
        let mut state = rich();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut mine = Mine::generate(state.side(), &state.weights(), &mut rng);
        let epoch = mine.respawns.epoch();
        assert!(buy_map_expansion(&mut state, &mut mine, &mut rng));
        assert_eq!(mine.side(), 4);
        assert_eq!(mine.grid.len(), 16);
        assert_eq!(mine.respawns.epoch(), epoch + 1);

        state.map_expansions = MAX_MAP_EXPANSIONS;
        assert!(!buy_map_expansion(&mut state, &mut mine, &mut rng));
    }

    #[test]
    fn test_reset_game() {
        let mut state = rich();
        buy_miner(&mut state);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut mine: Mine<MapGrid> = Mine::generate(5, &state.weights(), &mut rng);
        reset_game(&mut state, &mut mine, 99, &mut rng);
        assert_eq!(state, GameState::new(99));
        assert_eq!(mine.side(), 3);
    }

    #[test]
    fn test_toggle_auto_sell() {
        let mut state = GameState::new(0);
        assert!(!toggle_auto_sell(&mut state));
        assert!(toggle_auto_sell(&mut state));
    }
}
