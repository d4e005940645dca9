//! The per-tick scheduler.
//!
//! `game_tick()` advances the virtual clock, restores due tiles, fires every
//! miner whose cooldown has run out and flushes the inventory. It returns a
//! [`TickResult`] describing what happened so the front-end can react
//! without the simulation knowing about any UI types.

use crate::core::constants::MAX_TRIGGERS_PER_TICK;
use crate::core::game_state::GameState;
use crate::map::geometry::covered_tiles;
use crate::map::{Enchantment, TileGrid};
use crate::miners::{choose_target_tile, MinerStats};
use crate::mining::{
    activate_with_stats, apply_respawn, get_activation_count_from_roll, trigger_chain_reaction,
    ActivationOutcome, Mine,
};
use crate::render::RenderRequest;
use crate::resources::Ore;
use rand::Rng;

/// A single event produced by a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    // ── Mining ──────────────────────────────────────────────────
    /// A miner's trigger (or a bonus double activation) mined a tile.
    TileMined {
        miner: usize,
        outcome: ActivationOutcome,
    },

    /// A blast or arc spread from `source` through `hops` more tiles.
    ChainReaction {
        miner: usize,
        source: usize,
        hops: u32,
    },

    /// A Worker's roll granted extra activations.
    DoubleActivation { miner: usize, extra: u32 },

    // ── Map ─────────────────────────────────────────────────────
    /// A cooling tile came back with a fresh ore.
    TileRespawned {
        tile: usize,
        ore: Ore,
        enchantment: Enchantment,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    pub events: Vec<TickEvent>,
    /// Primary miner triggers spent this tick.
    pub triggers: u32,
    /// Tiles mined, including chain hops and double activations.
    pub activations: u32,
    pub respawns: u32,
    pub coins_earned: f64,
    /// True if some miner still had cooldown debt when the budget ran out.
    pub budget_exhausted: bool,
    /// At most once per tick; set iff anything visible changed.
    pub render_requested: bool,
}

/// Runs one tick of `dt_seconds`.
pub fn game_tick<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    dt_seconds: f64,
    rng: &mut R,
) -> TickResult {
    let mut result = TickResult::default();
    let mut render = RenderRequest::new();
    let dt = if dt_seconds.is_finite() && dt_seconds > 0.0 {
        dt_seconds
    } else {
        0.0
    };
    let lifetime_before = state.lifetime_coins;

    // ── Respawns ────────────────────────────────────────────────
    mine.respawns.advance(dt);
    let due = mine.respawns.take_due();
    if !due.is_empty() {
        let weights = state.weights();
        for event in due {
            if apply_respawn(&mut mine.grid, &event, &weights, rng) {
                result.respawns += 1;
                if let Some(tile) = mine.grid.tile(event.tile) {
                    result.events.push(TickEvent::TileRespawned {
                        tile: tile.index,
                        ore: tile.ore,
                        enchantment: tile.enchantment,
                    });
                }
                render.request();
            }
        }
    }

    // ── Miners ──────────────────────────────────────────────────
    // One trigger per due miner per round; the first slot rotates each tick.
    let owned = state.roster.len();
    let start = mine.next_rotation(owned);
    let mut clocks: Vec<MinerClock> = (0..owned)
        .map(|offset| (start + offset) % owned)
        .filter_map(|miner| {
            let stats = MinerStats::resolve(&state.roster, miner)?;
            if !stats.cooldown_seconds.is_finite() {
                return None;
            }
            let cooldown = state.roster.get(miner)?.cooldown - dt;
            Some(MinerClock {
                miner,
                stats,
                cooldown,
            })
        })
        .collect();

    let mut budget = MAX_TRIGGERS_PER_TICK;
    while budget > 0 {
        let mut fired = false;
        for clock in clocks.iter_mut() {
            if budget == 0 {
                break;
            }
            if clock.cooldown > 0.0 {
                continue;
            }
            budget -= 1;
            clock.cooldown += clock.stats.cooldown_seconds;
            result.triggers += 1;
            fired = true;
            run_trigger(state, mine, clock.miner, &clock.stats, rng, &mut result, &mut render);
        }
        if !fired {
            break;
        }
    }

    for clock in clocks {
        let mut cooldown = clock.cooldown;
        if cooldown <= 0.0 {
            result.budget_exhausted = true;
            cooldown = cooldown.max(-clock.stats.cooldown_seconds);
        }
        if let Some(unit) = state.roster.get_mut(clock.miner) {
            unit.cooldown = cooldown;
        }
    }

    // ── Bookkeeping ─────────────────────────────────────────────
    if state.inventory.flush() {
        render.request();
    }
    state.active_play_seconds += dt;
    result.coins_earned = state.lifetime_coins - lifetime_before;
    result.render_requested = render.take();
    result
}

/// A miner's cooldown while the tick deals out triggers.
struct MinerClock {
    miner: usize,
    stats: MinerStats,
    cooldown: f64,
}

/// One primary trigger: mine, chain, then any bonus double activations.
fn run_trigger<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    miner: usize,
    stats: &MinerStats,
    rng: &mut R,
    result: &mut TickResult,
    render: &mut RenderRequest,
) {
    if !strike(state, mine, miner, stats, rng, result, render) {
        return;
    }
    let extra = get_activation_count_from_roll(stats.roll_double_activation(rng), rng);
    if extra == 0 {
        return;
    }
    result
        .events
        .push(TickEvent::DoubleActivation { miner, extra });
    for _ in 0..extra {
        strike(state, mine, miner, stats, rng, result, render);
    }
}

/// Picks an eligible tile, mines it and rolls the chain. False if the
/// miner had nothing to hit.
fn strike<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    miner: usize,
    stats: &MinerStats,
    rng: &mut R,
    result: &mut TickResult,
    render: &mut RenderRequest,
) -> bool {
    let Some(unit) = state.roster.get(miner) else {
        return false;
    };
    let (position, targeting, kind) = (unit.position, unit.targeting, unit.kind());
    let candidates: Vec<usize> = covered_tiles(mine.side(), &position, stats.effect_radius)
        .into_iter()
        .filter(|i| mine.grid.tile(*i).map(|t| !t.cooldown).unwrap_or(false))
        .collect();
    let Some(tile) = choose_target_tile(&mine.grid, &candidates, targeting, kind, rng) else {
        return false;
    };
    let Some(outcome) = activate_with_stats(state, mine, tile, stats, rng) else {
        return false;
    };
    result.activations += 1;
    result.events.push(TickEvent::TileMined { miner, outcome });
    render.request();

    let hops = trigger_chain_reaction(state, mine, stats, tile, rng);
    if hops > 0 {
        result.activations += hops;
        result.events.push(TickEvent::ChainReaction {
            miner,
            source: tile,
            hops,
        });
    }
    true
}
