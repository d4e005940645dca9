//! Blast and arc chains that spread from a mined tile to its neighbours.

use super::activation::activate_with_stats;
use super::Mine;
use crate::core::game_state::GameState;
use crate::map::geometry::neighbors;
use crate::map::TileGrid;
use crate::miners::MinerStats;
use rand::Rng;

/// Rolls the miner's chain ability from `source` and walks it.
///
/// Each hop moves to a random 4-neighbour of the current tile that has not
/// been visited and is not cooling. Arcs prefer metal neighbours with
/// probability `metal_bias`, and every hop after the first only happens with
/// probability `efficiency`. The walk stops early when no neighbour is
/// available or an activation fails. Returns the number of extra tiles mined.
pub fn trigger_chain_reaction<G: TileGrid, R: Rng>(
    state: &mut GameState,
    mine: &mut Mine<G>,
    stats: &MinerStats,
    source: usize,
    rng: &mut R,
) -> u32 {
    let Some(chain) = stats.chain else {
        return 0;
    };
    if chain.length == 0 || rng.gen::<f64>() >= chain.chance {
        return 0;
    }

    let side = mine.grid.side();
    let mut visited = vec![false; mine.grid.len()];
    if let Some(slot) = visited.get_mut(source) {
        *slot = true;
    }
    let mut current = source;
    let mut mined = 0;

    for hop in 0..chain.length {
        if hop > 0 && rng.gen::<f64>() >= chain.efficiency {
            break;
        }
        let open: Vec<usize> = neighbors(current, side)
            .into_iter()
            .filter(|n| !visited.get(*n).copied().unwrap_or(true))
            .filter(|n| mine.grid.tile(*n).map(|t| !t.cooldown).unwrap_or(false))
            .collect();
        if open.is_empty() {
            break;
        }
        let metals: Vec<usize> = open
            .iter()
            .copied()
            .filter(|n| mine.grid.tile(*n).map(|t| t.ore.is_metal()).unwrap_or(false))
            .collect();
        let pool = if !metals.is_empty() && rng.gen::<f64>() < chain.metal_bias {
            metals
        } else {
            open
        };
        let next = pool[rng.gen_range(0..pool.len())];
        visited[next] = true;
        if activate_with_stats(state, mine, next, stats, rng).is_none() {
            break;
        }
        mined += 1;
        current = next;
    }
    mined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapGrid;
    use crate::miners::ChainProfile;
    use crate::resources::Ore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn chain_stats(length: u32, metal_bias: f64, efficiency: f64) -> MinerStats {
        MinerStats {
            chain: Some(ChainProfile {
                chance: 1.0,
                length,
                metal_bias,
                efficiency,
            }),
            ..MinerStats::neutral()
        }
    }

    #[test]
    fn test_no_chain_ability_means_no_hops() {
        let mut state = GameState::new(0);
        let mut mine = Mine::new(MapGrid::filled(3, Ore::Coal));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let stats = MinerStats::neutral();
        let hops = trigger_chain_reaction(&mut state, &mut mine, &stats, 4, &mut rng);
        assert_eq!(hops, 0);
        assert_eq!(state.total_activations, 0);
    }

    #[test]
    fn test_chain_never_revisits_or_exceeds_length() {
        for seed in 0..200 {
            let mut state = GameState::new(0);
            let mut mine = Mine::new(MapGrid::filled(5, Ore::Coal));
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let source = 12;
            mine_source(&mut state, &mut mine, source, &mut rng);
            let hops = trigger_chain_reaction(
                &mut state,
                &mut mine,
                &chain_stats(6, 0.0, 1.0),
                source,
                &mut rng,
            );
            assert!(hops <= 6);
            // One respawn per mined tile, each on a distinct tile.
            mine.respawns.advance(100.0);
            let mut tiles: Vec<usize> = mine.respawns.take_due().iter().map(|e| e.tile).collect();
            assert_eq!(tiles.len() as u32, hops + 1);
            tiles.sort_unstable();
            tiles.dedup();
            assert_eq!(tiles.len() as u32, hops + 1);
        }
    }

    fn mine_source(
        state: &mut GameState,
        mine: &mut Mine<MapGrid>,
        source: usize,
        rng: &mut ChaCha8Rng,
    ) {
        activate_with_stats(state, mine, source, &MinerStats::neutral(), rng).unwrap();
    }

    #[test]
    fn test_chain_stops_when_boxed_in() {
        let mut state = GameState::new(0);
        let mut mine = Mine::new(MapGrid::filled(3, Ore::Coal));
        for n in [1, 3, 5, 7] {
            mine.grid.tile_mut(n).unwrap().cooldown = true;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let stats = chain_stats(5, 0.0, 1.0);
        let hops = trigger_chain_reaction(&mut state, &mut mine, &stats, 4, &mut rng);
        assert_eq!(hops, 0);
    }

    #[test]
    fn test_full_efficiency_runs_the_whole_length_in_open_ground() {
        let mut state = GameState::new(0);
        let mut mine = Mine::new(MapGrid::filled(8, Ore::Coal));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let stats = chain_stats(3, 0.0, 1.0);
        let hops = trigger_chain_reaction(&mut state, &mut mine, &stats, 0, &mut rng);
        assert_eq!(hops, 3);
    }

    #[test]
    fn test_full_metal_bias_prefers_metal() {
        let mut state = GameState::new(0);
        let mut grid = MapGrid::filled(3, Ore::Coal);
        grid.tile_mut(5).unwrap().ore = Ore::Copper;
        let mine = Mine::new(grid);
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut fresh = mine.clone();
            let coins_before = state.coins;
            trigger_chain_reaction(&mut state, &mut fresh, &chain_stats(1, 1.0, 1.0), 4, &mut rng);
            assert!(fresh.grid.tile(5).unwrap().cooldown);
            assert_eq!(state.coins - coins_before, Ore::Copper.value());
        }
    }
}
