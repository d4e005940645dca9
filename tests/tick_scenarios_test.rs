//! Integration tests for game_tick() and the activation pipeline.
//!
//! These drive the public API the way the front-end does: buy miners, assign
//! classes, then tick. Uses seeded ChaCha8Rng for deterministic behavior.

use idle_miner::core::constants::{MAX_MINERS, MAX_RADIUS_LEVEL, MAX_SPEED_LEVEL};
use idle_miner::core::upgrades::{
    buy_miner, reposition_miner, set_specialization, unlock_specialization,
};
use idle_miner::map::geometry::{covered_tiles, tile_bounds, tile_coverage};
use idle_miner::map::{MapGrid, Point, TileGrid};
use idle_miner::miners::{ClassUpgrade, MinerStats, SpecializationKind};
use idle_miner::mining::{activate_tile, get_activation_count_from_roll, Mine};
use idle_miner::resources::Ore;
use idle_miner::{game_tick, GameState, TickEvent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

/// A rich game with `count` miners of `kind`, all standing on `point`.
fn crew(count: usize, kind: SpecializationKind, point: Point) -> GameState {
    let mut state = GameState::new(0);
    state.map_expansions = 6;
    state.coins = 1e12;
    for i in 0..count {
        assert!(buy_miner(&mut state));
        if kind != SpecializationKind::Worker {
            assert!(unlock_specialization(&mut state, i));
            assert!(set_specialization(&mut state, i, kind));
        }
        assert!(reposition_miner(&mut state, i, point));
    }
    state
}

fn cooling_tiles(mine: &Mine) -> usize {
    mine.grid.len() - mine.grid.available_tiles().len()
}

#[test]
fn test_one_tick_never_mines_a_tile_twice() {
    let center = Point::new(140.0, 140.0);
    let mut state = crew(10, SpecializationKind::Demolitionist, center);
    for unit in state.roster.iter_mut() {
        unit.speed_level = MAX_SPEED_LEVEL;
        unit.radius_level = 10;
        *unit
            .specialization
            .level_mut(ClassUpgrade::BlastChance)
            .unwrap() = 15;
        *unit
            .specialization
            .level_mut(ClassUpgrade::BlastLength)
            .unwrap() = 8;
        unit.cooldown = 0.0;
    }
    let mut mine = Mine::new(MapGrid::filled(state.side(), Ore::Coal));
    let mut rng = test_rng();

    let result = game_tick(&mut state, &mut mine, 0.1, &mut rng);
    assert!(result.activations > 0);
    // Every activation this tick put a distinct tile on cooldown.
    assert_eq!(cooling_tiles(&mine) as u32, result.activations);
    assert_eq!(state.total_activations, u64::from(result.activations));
}

#[test]
fn test_chain_events_respect_blast_length() {
    let center = Point::new(140.0, 140.0);
    let mut state = crew(4, SpecializationKind::Demolitionist, center);
    for unit in state.roster.iter_mut() {
        *unit
            .specialization
            .level_mut(ClassUpgrade::BlastChance)
            .unwrap() = 15;
    }
    let length = MinerStats::resolve(&state.roster, 0)
        .and_then(|s| s.chain)
        .map(|c| c.length)
        .unwrap();
    let mut mine = Mine::new(MapGrid::filled(state.side(), Ore::Iron));
    let mut rng = test_rng();

    let mut chains = 0;
    for _ in 0..3_000 {
        let result = game_tick(&mut state, &mut mine, 0.1, &mut rng);
        for event in &result.events {
            if let TickEvent::ChainReaction { hops, .. } = event {
                assert!(*hops <= length);
                chains += 1;
            }
        }
    }
    assert!(chains > 0, "no blasts in 5 minutes of game time");
}

#[test]
fn test_worker_double_activation_strikes_fresh_tiles() {
    let mut state = crew(1, SpecializationKind::Worker, Point::new(140.0, 140.0));
    let worker = state.roster.get_mut(0).unwrap();
    // Roll range [1.0, 1.0]: exactly one extra strike per trigger.
    *worker
        .specialization
        .level_mut(ClassUpgrade::DoubleMin)
        .unwrap() = 10;
    worker.cooldown = 0.0;
    let mut mine = Mine::new(MapGrid::filled(state.side(), Ore::Coal));
    let mut rng = test_rng();

    let result = game_tick(&mut state, &mut mine, 0.01, &mut rng);
    assert_eq!(result.triggers, 1);
    assert_eq!(result.activations, 2);
    assert!(result
        .events
        .contains(&TickEvent::DoubleActivation { miner: 0, extra: 1 }));
    let mined: Vec<usize> = result
        .events
        .iter()
        .filter_map(|e| match e {
            TickEvent::TileMined { outcome, .. } => Some(outcome.tile),
            _ => None,
        })
        .collect();
    assert_eq!(mined.len(), 2);
    assert_ne!(mined[0], mined[1]);
    assert_eq!(cooling_tiles(&mine), 2);
}

#[test]
fn test_full_roster_under_lag_shares_tiles_evenly() {
    let center = Point::new(140.0, 140.0);
    let mut state = crew(MAX_MINERS, SpecializationKind::Worker, center);
    for unit in state.roster.iter_mut() {
        unit.speed_level = MAX_SPEED_LEVEL;
        unit.radius_level = MAX_RADIUS_LEVEL;
        unit.cooldown = 0.0;
    }
    let mut mine = Mine::new(MapGrid::filled(state.side(), Ore::Coal));
    let mut rng = test_rng();

    let mut mined = vec![0u32; MAX_MINERS];
    for _ in 0..200 {
        let result = game_tick(&mut state, &mut mine, 0.5, &mut rng);
        for event in &result.events {
            if let TickEvent::TileMined { miner, .. } = event {
                mined[*miner] += 1;
            }
        }
    }
    let least = *mined.iter().min().unwrap();
    let most = *mined.iter().max().unwrap();
    assert!(least > 0, "a miner never mined: {:?}", mined);
    assert!(most <= least * 4, "uneven share: {:?}", mined);
}

#[test]
fn test_activation_count_roll_mean() {
    let mut rng = test_rng();
    let trials = 20_000;
    let total: u32 = (0..trials)
        .map(|_| get_activation_count_from_roll(2.25, &mut rng))
        .sum();
    let mean = f64::from(total) / f64::from(trials);
    assert!((mean - 2.25).abs() < 0.03, "mean {}", mean);
}

#[test]
fn test_coverage_grows_with_radius() {
    let side = 7;
    let center = Point::new(131.0, 97.0);
    let mut previous_count = 0;
    let mut previous_coverage = vec![0.0; side * side];
    for step in 0..60 {
        let radius = step as f64 * 5.0;
        let covered = covered_tiles(side, &center, radius);
        assert!(covered.len() >= previous_count);
        previous_count = covered.len();
        for (i, previous) in previous_coverage.iter_mut().enumerate() {
            let coverage = tile_coverage(&tile_bounds(i, side), &center, radius);
            assert!(coverage >= *previous);
            *previous = coverage;
        }
    }
    assert_eq!(previous_count, side * side);
}

#[test]
fn test_foreman_buffs_worker_but_not_foreman() {
    let spot = Point::new(60.0, 60.0);
    let mut state = crew(3, SpecializationKind::Worker, spot);
    for i in [1, 2] {
        assert!(unlock_specialization(&mut state, i));
        assert!(set_specialization(&mut state, i, SpecializationKind::Foreman));
        *state
            .roster
            .get_mut(i)
            .unwrap()
            .specialization
            .level_mut(ClassUpgrade::Overtime)
            .unwrap() = 10;
    }

    let base = MinerStats::neutral().clicks_per_second;
    let worker = MinerStats::resolve(&state.roster, 0).unwrap();
    assert!(worker.clicks_per_second > base);
    for foreman in [1, 2] {
        let stats = MinerStats::resolve(&state.roster, foreman).unwrap();
        assert_eq!(stats.clicks_per_second, base);
    }
}

#[test]
fn test_cooling_tile_activation_has_no_side_effects() {
    let mut state = crew(1, SpecializationKind::Worker, Point::new(20.0, 20.0));
    let mut mine = Mine::new(MapGrid::filled(state.side(), Ore::Gold));
    let mut rng = test_rng();
    assert!(activate_tile(&mut state, &mut mine, 0, 0, &mut rng));

    let state_before = state.clone();
    let mine_before = mine.clone();
    assert!(!activate_tile(&mut state, &mut mine, 0, 0, &mut rng));
    assert_eq!(state, state_before);
    assert_eq!(mine, mine_before);
}

#[test]
fn test_idle_hour_earns_coins_and_respawns_tiles() {
    let mut state = GameState::new(0);
    state.coins = 1e6;
    for _ in 0..5 {
        assert!(buy_miner(&mut state));
    }
    let mut rng = test_rng();
    let mut mine = Mine::generate(state.side(), &state.weights(), &mut rng);
    let coins_before = state.coins;

    let mut respawns = 0;
    let mut triggers = 0;
    for _ in 0..36_000 {
        let result = game_tick(&mut state, &mut mine, 0.1, &mut rng);
        respawns += result.respawns;
        triggers += result.triggers;
    }
    // Five unupgraded miners fire about once every five seconds each.
    assert!((3_500..=3_700).contains(&triggers), "triggers {}", triggers);
    assert!(respawns > 0);
    assert!(state.coins > coins_before);
    assert!((state.active_play_seconds - 3_600.0).abs() < 1e-3);
}
