//! Which eligible tile a miner hits.

use crate::map::TileGrid;
use crate::miners::specialization::SpecializationKind;
use crate::resources::Ore;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Targeting {
    #[default]
    Random,
    HighQuality,
    LowQuality,
}

impl Targeting {
    pub const ALL: [Targeting; 3] = [
        Targeting::Random,
        Targeting::HighQuality,
        Targeting::LowQuality,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Targeting::Random => "Random",
            Targeting::HighQuality => "High quality",
            Targeting::LowQuality => "Low quality",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Targeting::Random => "random",
            Targeting::HighQuality => "high-quality",
            Targeting::LowQuality => "low-quality",
        }
    }

    pub fn from_key(key: &str) -> Option<Targeting> {
        Targeting::ALL.iter().copied().find(|t| t.key() == key)
    }

    pub fn next(&self) -> Targeting {
        match self {
            Targeting::Random => Targeting::HighQuality,
            Targeting::HighQuality => Targeting::LowQuality,
            Targeting::LowQuality => Targeting::Random,
        }
    }
}

/// Narrows `candidates` for enchanting classes: un-enchanted resource tiles
/// first, then any resource tile, then any un-enchanted tile, then anything.
fn enchanter_pool<G: TileGrid>(grid: &G, candidates: &[usize]) -> Vec<usize> {
    let filters: [&dyn Fn(usize) -> bool; 3] = [
        &|i: usize| {
            grid.tile(i)
                .map(|t| t.ore != Ore::Sand && t.enchantment.is_none())
                .unwrap_or(false)
        },
        &|i: usize| grid.tile(i).map(|t| t.ore != Ore::Sand).unwrap_or(false),
        &|i: usize| grid.tile(i).map(|t| t.enchantment.is_none()).unwrap_or(false),
    ];
    for keep in filters {
        let pool: Vec<usize> = candidates.iter().copied().filter(|i| keep(*i)).collect();
        if !pool.is_empty() {
            return pool;
        }
    }
    candidates.to_vec()
}

/// Picks one tile out of `candidates` (already filtered to eligible,
/// non-cooling tiles). Returns `None` when there is nothing to hit.
pub fn choose_target_tile<G: TileGrid, R: Rng>(
    grid: &G,
    candidates: &[usize],
    targeting: Targeting,
    kind: SpecializationKind,
    rng: &mut R,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let pool = if kind.is_enchanter() {
        enchanter_pool(grid, candidates)
    } else {
        candidates.to_vec()
    };

    let value_of = |i: usize| grid.tile(i).map(|t| t.ore.value()).unwrap_or(0.0);
    let pool = match targeting {
        Targeting::Random => pool,
        Targeting::HighQuality => {
            let best = pool.iter().map(|i| value_of(*i)).fold(f64::MIN, f64::max);
            pool.into_iter().filter(|i| value_of(*i) == best).collect()
        }
        Targeting::LowQuality => {
            let worst = pool.iter().map(|i| value_of(*i)).fold(f64::MAX, f64::min);
            pool.into_iter().filter(|i| value_of(*i) == worst).collect()
        }
    };
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Enchantment, MapGrid};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mixed_grid() -> MapGrid {
        let mut grid = MapGrid::filled(2, Ore::Sand);
        grid.tile_mut(1).unwrap().ore = Ore::Gold;
        grid.tile_mut(2).unwrap().ore = Ore::Coal;
        grid.tile_mut(3).unwrap().ore = Ore::Gold;
        grid
    }

    #[test]
    fn test_empty_candidates() {
        let grid = mixed_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pick = choose_target_tile(
            &grid,
            &[],
            Targeting::Random,
            SpecializationKind::Worker,
            &mut rng,
        );
        assert_eq!(pick, None);
    }

    #[test]
    fn test_high_quality_picks_among_best() {
        let grid = mixed_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let pick = choose_target_tile(
                &grid,
                &[0, 1, 2, 3],
                Targeting::HighQuality,
                SpecializationKind::Worker,
                &mut rng,
            )
            .unwrap();
            seen[pick] = true;
        }
        assert_eq!(seen, [false, true, false, true]);
    }

    #[test]
    fn test_low_quality_picks_worst() {
        let grid = mixed_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let pick = choose_target_tile(
                &grid,
                &[1, 2, 3],
                Targeting::LowQuality,
                SpecializationKind::Worker,
                &mut rng,
            );
            assert_eq!(pick, Some(2));
        }
    }

    #[test]
    fn test_enchanter_prefers_unenchanted_resources() {
        let mut grid = mixed_grid();
        grid.tile_mut(1).unwrap().enchantment = Enchantment::Bountiful { extra_units: 1 };
        grid.tile_mut(3).unwrap().enchantment = Enchantment::Enriched { multiplier: 2.0 };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            let pick = choose_target_tile(
                &grid,
                &[0, 1, 2, 3],
                Targeting::Random,
                SpecializationKind::Arcanist,
                &mut rng,
            );
            assert_eq!(pick, Some(2));
        }
    }

    #[test]
    fn test_enchanter_falls_back_to_enchanted_resources() {
        let mut grid = mixed_grid();
        grid.tile_mut(1).unwrap().enchantment = Enchantment::Bountiful { extra_units: 1 };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let pick = choose_target_tile(
            &grid,
            &[0, 1],
            Targeting::Random,
            SpecializationKind::Enricher,
            &mut rng,
        );
        assert_eq!(pick, Some(1));
    }

    #[test]
    fn test_targeting_keys() {
        for t in Targeting::ALL {
            assert_eq!(Targeting::from_key(t.key()), Some(t));
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.key()));
        }
        assert_eq!(Targeting::from_key("nearest"), None);
    }
}
