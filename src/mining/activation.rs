//! Mining a single tile.

use super::Mine;
use crate::core::game_state::GameState;
use crate::map::{Enchantment, TileGrid};
use crate::miners::MinerStats;
use crate::resources::{Ore, QualityBoost};
use rand::Rng;

/// What one successful activation produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationOutcome {
    pub tile: usize,
    pub ore: Ore,
    pub units: u32,
    /// Total coin value of the haul, including crit and enrichment.
    pub payout: f64,
    pub crit: bool,
    /// Enchantment the tile carried and lost.
    pub consumed: Enchantment,
    /// Enchantment queued for the respawned tile.
    pub stamped: Enchantment,
}

/// Mines `index` with explicit stats.
///
/// Returns `None` without touching anything if the tile is missing or still
/// cooling. Otherwise the haul is credited, the tile goes on cooldown and a
/// respawn is scheduled.
pub fn activate_with_stats<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    index: usize,
    stats: &MinerStats,
    rng: &mut R,
) -> Option<ActivationOutcome> {
    let tile = mine.grid.tile_mut(index)?;
    if tile.cooldown {
        return None;
    }
    let ore = tile.ore;
    let consumed = std::mem::take(&mut tile.enchantment);
    tile.cooldown = true;

    let (extra_units, enriched) = match consumed {
        Enchantment::Bountiful { extra_units } => (extra_units, 1.0),
        Enchantment::Enriched { multiplier } => (0, multiplier),
        Enchantment::None => (0, 1.0),
    };
    let crit = stats.crit_chance > 0.0 && rng.gen::<f64>() < stats.crit_chance;
    let crit_multiplier = if crit { stats.crit_multiplier } else { 1.0 };
    let units = 1 + extra_units;
    let payout = units as f64 * ore.value() * enriched * crit_multiplier;
    state.credit_mining(ore, units, payout);

    let boost = (stats.vein_multiplier > 1.0).then_some(QualityBoost {
        ore,
        multiplier: stats.vein_multiplier,
    });
    let stamped = stats
        .enchant
        .map(|ability| ability.roll(rng))
        .unwrap_or_default();
    mine.respawns.schedule(index, boost, stamped);

    Some(ActivationOutcome {
        tile: index,
        ore,
        units,
        payout,
        crit,
        consumed,
        stamped,
    })
}

/// Mines `index` on behalf of roster slot `miner`. False if the tile is
/// cooling or the miner no longer exists.
pub fn activate_tile<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    index: usize,
    miner: usize,
    rng: &mut R,
) -> bool {
    let Some(stats) = MinerStats::resolve(&state.roster, miner) else {
        return false;
    };
    activate_with_stats(state, mine, index, &stats, rng).is_some()
}

/// The player's own click: a classless activation.
pub fn mine_tile_manually<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    index: usize,
    rng: &mut R,
) -> Option<ActivationOutcome> {
    activate_with_stats(state, mine, index, &MinerStats::neutral(), rng)
}

/// Whole activations from a fractional roll: the integer part always, plus
/// one more with probability equal to the fractional part.
pub fn get_activation_count_from_roll<R: Rng>(roll: f64, rng: &mut R) -> u32 {
    if !roll.is_finite() || roll <= 0.0 {
        return 0;
    }
    let whole = roll.floor();
    let extra = rng.gen::<f64>() < roll - whole;
    whole as u32 + u32::from(extra)
}
