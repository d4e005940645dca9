//! Integration tests for the ore weighting engine and the purchase curve.
//!
//! Covers weight conservation across generation levels, locked ores never
//! being rolled, and the effect of speed upgrades on a miner's cooldown.

use idle_miner::core::upgrades::{buy_miner, buy_miner_speed_upgrade, buy_ore_generation};
use idle_miner::miners::MinerStats;
use idle_miner::resources::{effective_weights, roll_tile_type, Ore, ResourceLevels};
use idle_miner::GameState;
use rand::rngs::mock::StepRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SAND_BASE: f64 = 10_000.0;

#[test]
fn test_total_weight_is_conserved_across_levels() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..200 {
        let mut levels = ResourceLevels::new();
        for ore in Ore::ALL {
            levels.set_level(ore, rng.gen_range(0..8));
        }
        levels.sync_gem_levels();
        let weights = effective_weights(&levels);
        assert!((weights.total() - SAND_BASE).abs() < 1e-6);
        for ore in Ore::ALL {
            let w = weights.weight(ore);
            assert!(w >= 0.0);
            if !levels.is_unlocked(ore) {
                assert_eq!(w, 0.0, "{:?} is locked but weighted", ore);
            }
        }
    }
}

#[test]
fn test_locked_coal_never_rolls() {
    let weights = effective_weights(&ResourceLevels::new());
    assert_eq!(weights.weight(Ore::Coal), 0.0);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..10_000 {
        assert_eq!(roll_tile_type(&weights, None, &mut rng), Ore::Sand);
    }
}

#[test]
fn test_coal_level_one_takes_its_weight_from_sand() {
    let mut state = GameState::new(0);
    state.coins = 1e9;
    let before = state.weights();
    assert!(buy_ore_generation(&mut state, Ore::Coal));
    let after = state.weights();
    assert!((after.weight(Ore::Coal) - 600.0).abs() < 1e-9);
    assert!((before.weight(Ore::Sand) - after.weight(Ore::Sand) - 600.0).abs() < 1e-9);
    assert!((after.total() - before.total()).abs() < 1e-9);
}

#[test]
fn test_zero_rolls_land_on_sand() {
    let mut levels = ResourceLevels::new();
    levels.set_level(Ore::Coal, 3);
    levels.set_level(Ore::Gold, 1);
    let weights = effective_weights(&levels);
    let mut zeros = StepRng::new(0, 0);
    for _ in 0..100 {
        assert_eq!(roll_tile_type(&weights, None, &mut zeros), Ore::Sand);
    }
}

#[test]
fn test_speed_upgrade_shortens_cooldown() {
    let mut state = GameState::new(0);
    state.coins = 1e6;
    assert!(buy_miner(&mut state));
    let stats = MinerStats::resolve(&state.roster, 0).unwrap();
    assert!((stats.cooldown_seconds - 5.0).abs() < 1e-12);

    assert!(buy_miner_speed_upgrade(&mut state, 0));
    let stats = MinerStats::resolve(&state.roster, 0).unwrap();
    let expected = 1.0 / (1.0 / 5.0 + 0.1);
    assert!((stats.cooldown_seconds - expected).abs() < 1e-12);
}

#[test]
fn test_declined_purchase_changes_nothing() {
    let mut state = GameState::new(0);
    let before = state.clone();
    assert!(!buy_miner(&mut state));
    assert!(!buy_miner_speed_upgrade(&mut state, 0));
    assert!(!buy_ore_generation(&mut state, Ore::Coal));
    assert_eq!(state, before);
}
