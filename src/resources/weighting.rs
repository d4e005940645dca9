//! Effective spawn weights and weighted ore rolls.
//!
//! Every unlocked ore borrows its target weight from the combined pool of the
//! ores below it on the ladder, proportionally to their current weight. Mass is
//! only ever moved, so the total always equals sand's base weight. When the
//! pool cannot cover a target the ore simply receives what is available.
//!
//! Gems form one tier: each gem borrows from the six non-gem ores only, and
//! the combined gem weight is split evenly across all five gems afterwards.

use super::catalog::{Ore, ResourceLevels, ORE_COUNT};
use crate::core::constants::ORE_WEIGHT_GROWTH_PER_LEVEL;
use rand::Rng;

/// Nominal weight of `ore` at a generation level, before redistribution.
///
/// Sand always returns its base weight. Every other ore is 0 at level 0 and
/// `base × 1.2^(level − 1)` above that.
pub fn get_ore_weight_for_level(ore: Ore, level: u32) -> f64 {
    if !ore.is_upgradable() {
        return ore.base_weight();
    }
    if level == 0 {
        return 0.0;
    }
    ore.base_weight() * ORE_WEIGHT_GROWTH_PER_LEVEL.powi(level as i32 - 1)
}

/// Post-redistribution weights for every ore.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OreWeights {
    weights: [f64; ORE_COUNT],
}

impl OreWeights {
    pub fn weight(&self, ore: Ore) -> f64 {
        self.weights[ore.index()]
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Combined weight of the pooled gem tier.
    pub fn gem_total(&self) -> f64 {
        Ore::GEMS.iter().map(|gem| self.weight(*gem)).sum()
    }

    /// Probability of `ore` on an unboosted roll.
    pub fn probability(&self, ore: Ore) -> f64 {
        let total = self.total();
        if total > 0.0 {
            self.weight(ore) / total
        } else if ore == Ore::Sand {
            1.0
        } else {
            0.0
        }
    }

    /// Expected coin value of one unboosted roll.
    pub fn expected_value(&self) -> f64 {
        Ore::ALL
            .iter()
            .map(|ore| self.probability(*ore) * ore.value())
            .sum()
    }
}

static LADDER: [Ore; 6] = Ore::LADDER;

/// Ores an ore may borrow weight from.
fn lower_pool(ore: Ore) -> &'static [Ore] {
    if ore.is_gem() {
        return &LADDER;
    }
    let rank = LADDER.iter().position(|o| *o == ore).unwrap_or(0);
    &LADDER[..rank]
}

/// Redistributes a set of nominal targets. `f64::INFINITY` marks a probe
/// (take everything available).
fn redistribute_targets(targets: &[f64; ORE_COUNT]) -> OreWeights {
    let mut weights = [0.0; ORE_COUNT];
    weights[Ore::Sand.index()] = targets[Ore::Sand.index()];

    for ore in Ore::ALL.iter().copied().filter(|o| o.is_upgradable()) {
        let target = targets[ore.index()];
        if target <= 0.0 || target.is_nan() {
            continue;
        }
        let pool = lower_pool(ore);
        let available: f64 = pool.iter().map(|o| weights[o.index()]).sum();
        if available <= 0.0 {
            continue;
        }
        let take = target.min(available);
        let keep = (1.0 - take / available).max(0.0);
        for lower in pool {
            weights[lower.index()] = (weights[lower.index()] * keep).max(0.0);
        }
        weights[ore.index()] = take;
    }

    let gem_share =
        Ore::GEMS.iter().map(|g| weights[g.index()]).sum::<f64>() / Ore::GEMS.len() as f64;
    for gem in Ore::GEMS {
        weights[gem.index()] = gem_share;
    }

    OreWeights { weights }
}

fn nominal_targets(levels: &ResourceLevels) -> [f64; ORE_COUNT] {
    let mut targets = [0.0; ORE_COUNT];
    for ore in Ore::ALL {
        targets[ore.index()] = get_ore_weight_for_level(ore, levels.level(ore));
    }
    targets
}

/// Effective weights for the current generation levels.
pub fn effective_weights(levels: &ResourceLevels) -> OreWeights {
    redistribute_targets(&nominal_targets(levels))
}

/// Whether raising `ore` one generation level is achievable from the supply
/// currently available below it.
///
/// Probes redistribution with the ore's level unbounded and compares the
/// weight it manages to claim with its next-level target. The gem tier is
/// probed as a whole since its levels move in lockstep.
pub fn can_increase_ore_generation(levels: &ResourceLevels, ore: Ore) -> bool {
    if !ore.is_upgradable() {
        return false;
    }
    let mut targets = nominal_targets(levels);
    if ore.is_gem() {
        let next = levels.gem_level() + 1;
        for gem in Ore::GEMS {
            targets[gem.index()] = f64::INFINITY;
        }
        let achievable = redistribute_targets(&targets).gem_total();
        let needed: f64 = Ore::GEMS
            .iter()
            .map(|gem| get_ore_weight_for_level(*gem, next))
            .sum();
        achievable >= needed
    } else {
        targets[ore.index()] = f64::INFINITY;
        let achievable = redistribute_targets(&targets).weight(ore);
        achievable >= get_ore_weight_for_level(ore, levels.level(ore) + 1)
    }
}

/// A roll bias toward one ore: its candidate weight is multiplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityBoost {
    pub ore: Ore,
    pub multiplier: f64,
}

/// Rolls an ore type for a respawning tile.
///
/// The candidates are the six non-gem ores and one pooled gem bucket. A boost
/// toward a gem multiplies the bucket; a boost toward a non-gem multiplies
/// that candidate. Landing in the bucket picks one of the five gems uniformly.
pub fn roll_tile_type<R: Rng>(
    weights: &OreWeights,
    boost: Option<QualityBoost>,
    rng: &mut R,
) -> Ore {
    let boost_for = |matches: bool| match boost {
        Some(b) if matches && b.multiplier.is_finite() && b.multiplier > 0.0 => b.multiplier,
        _ => 1.0,
    };

    // Index 6 is the gem bucket.
    let mut candidates = [0.0; 7];
    for (i, ore) in Ore::LADDER.iter().enumerate() {
        let boosted = boost.map(|b| b.ore == *ore).unwrap_or(false);
        candidates[i] = weights.weight(*ore) * boost_for(boosted);
    }
    let gem_boosted = boost.map(|b| b.ore.is_gem()).unwrap_or(false);
    candidates[6] = weights.gem_total() * boost_for(gem_boosted);

    let total: f64 = candidates.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Ore::Sand;
    }

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, weight) in candidates.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if roll < cumulative {
            if i == 6 {
                return Ore::GEMS[rng.gen_range(0..Ore::GEMS.len())];
            }
            return Ore::LADDER[i];
        }
    }

    Ore::Sand
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EPS: f64 = 1e-6;

    fn sand_base() -> f64 {
        Ore::Sand.base_weight()
    }

    #[test]
    fn test_weight_for_level_zero_and_one() {
        for ore in Ore::ALL.iter().copied().filter(|o| o.is_upgradable()) {
            assert_eq!(get_ore_weight_for_level(ore, 0), 0.0);
            assert_eq!(get_ore_weight_for_level(ore, 1), ore.base_weight());
        }
        assert_eq!(get_ore_weight_for_level(Ore::Sand, 0), sand_base());
    }

    #[test]
    fn test_weight_for_level_growth() {
        let w3 = get_ore_weight_for_level(Ore::Coal, 3);
        assert!((w3 - 600.0 * 1.2 * 1.2).abs() < EPS);
    }

    #[test]
    fn test_all_locked_is_pure_sand() {
        let weights = effective_weights(&ResourceLevels::new());
        assert_eq!(weights.weight(Ore::Sand), sand_base());
        for ore in Ore::ALL.iter().skip(1) {
            assert_eq!(weights.weight(*ore), 0.0);
        }
    }

    #[test]
    fn test_unlocking_coal_borrows_from_sand() {
        let mut levels = ResourceLevels::new();
        levels.set_level(Ore::Coal, 1);
        let weights = effective_weights(&levels);
        assert!((weights.weight(Ore::Coal) - 600.0).abs() < EPS);
        assert!((weights.weight(Ore::Sand) - (sand_base() - 600.0)).abs() < EPS);
        assert!((weights.total() - sand_base()).abs() < EPS);
    }

    #[test]
    fn test_higher_ore_borrows_proportionally() {
        let mut levels = ResourceLevels::new();
        levels.set_level(Ore::Coal, 1);
        levels.set_level(Ore::Copper, 1);
        let weights = effective_weights(&levels);
        // Copper takes 300 out of a 10 000 pool (9 400 sand + 600 coal).
        let keep = 1.0 - 300.0 / 10_000.0;
        assert!((weights.weight(Ore::Copper) - 300.0).abs() < EPS);
        assert!((weights.weight(Ore::Coal) - 600.0 * keep).abs() < EPS);
        assert!((weights.weight(Ore::Sand) - 9_400.0 * keep).abs() < EPS);
    }

    #[test]
    fn test_locked_ores_stay_zero_with_higher_unlocked() {
        let mut levels = ResourceLevels::new();
        levels.set_level(Ore::Iron, 2);
        let weights = effective_weights(&levels);
        assert_eq!(weights.weight(Ore::Coal), 0.0);
        assert_eq!(weights.weight(Ore::Copper), 0.0);
        assert!(weights.weight(Ore::Iron) > 0.0);
    }

    #[test]
    fn test_gems_split_evenly() {
        let mut levels = ResourceLevels::new();
        levels.set_level(Ore::Diamond, 2);
        // Unsynced on purpose: the split ignores individual levels.
        let weights = effective_weights(&levels);
        let share = weights.weight(Ore::Amethyst);
        assert!(share > 0.0);
        for gem in Ore::GEMS {
            assert!((weights.weight(gem) - share).abs() < EPS);
        }
    }

    #[test]
    fn test_shortfall_never_goes_negative() {
        let mut levels = ResourceLevels::new();
        for ore in Ore::ALL {
            levels.set_level(ore, 60);
        }
        let weights = effective_weights(&levels);
        for ore in Ore::ALL {
            assert!(weights.weight(ore) >= 0.0, "{:?} negative", ore);
        }
        assert!((weights.total() - sand_base()).abs() < 1e-3);
    }

    #[test]
    fn test_can_increase_when_supply_exists() {
        let levels = ResourceLevels::new();
        assert!(can_increase_ore_generation(&levels, Ore::Coal));
        assert!(can_increase_ore_generation(&levels, Ore::Gold));
        assert!(can_increase_ore_generation(&levels, Ore::Ruby));
        assert!(!can_increase_ore_generation(&levels, Ore::Sand));
    }

    #[test]
    fn test_cannot_increase_past_supply() {
        let mut levels = ResourceLevels::new();
        // 600 × 1.2^19 ≈ 19 200 > 10 000 available.
        levels.set_level(Ore::Coal, 19);
        assert!(!can_increase_ore_generation(&levels, Ore::Coal));
        levels.set_level(Ore::Coal, 5);
        assert!(can_increase_ore_generation(&levels, Ore::Coal));
    }

    #[test]
    fn test_roll_all_locked_is_sand() {
        let weights = effective_weights(&ResourceLevels::new());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            assert_eq!(roll_tile_type(&weights, None, &mut rng), Ore::Sand);
        }
    }

    #[test]
    fn test_roll_zero_total_falls_back_to_sand() {
        let weights = OreWeights {
            weights: [0.0; ORE_COUNT],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(roll_tile_type(&weights, None, &mut rng), Ore::Sand);
    }

    #[test]
    fn test_roll_never_returns_locked_ore() {
        let mut levels = ResourceLevels::new();
        levels.set_level(Ore::Coal, 3);
        levels.set_level(Ore::Silver, 1);
        let weights = effective_weights(&levels);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..5_000 {
            let ore = roll_tile_type(&weights, None, &mut rng);
            assert!(matches!(ore, Ore::Sand | Ore::Coal | Ore::Silver));
        }
    }

    #[test]
    fn test_boost_raises_frequency() {
        let mut levels = ResourceLevels::new();
        levels.set_level(Ore::Coal, 1);
        let weights = effective_weights(&levels);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let boost = Some(QualityBoost {
            ore: Ore::Coal,
            multiplier: 4.0,
        });
        let trials = 20_000;
        let plain = (0..trials)
            .filter(|_| roll_tile_type(&weights, None, &mut rng) == Ore::Coal)
            .count();
        let boosted = (0..trials)
            .filter(|_| roll_tile_type(&weights, boost, &mut rng) == Ore::Coal)
            .count();
        assert!(boosted > plain * 3, "plain={} boosted={}", plain, boosted);
    }

    #[test]
    fn test_gem_boost_applies_to_bucket() {
        let mut levels = ResourceLevels::new();
        for gem in Ore::GEMS {
            levels.set_level(gem, 1);
        }
        let weights = effective_weights(&levels);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let boost = Some(QualityBoost {
            ore: Ore::Ruby,
            multiplier: 50.0,
        });
        let gems = (0..10_000)
            .filter(|_| roll_tile_type(&weights, boost, &mut rng).is_gem())
            .count();
        // Bucket is 20 / 10 000 unboosted, ×50 boosted ≈ 9%.
        assert!(gems > 500, "gems={}", gems);
    }

    #[test]
    fn test_expected_value_pure_sand() {
        let weights = effective_weights(&ResourceLevels::new());
        assert!((weights.expected_value() - Ore::Sand.value()).abs() < EPS);
    }
}
