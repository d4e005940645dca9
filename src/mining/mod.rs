//! Tile activation, chain reactions and respawn scheduling.

pub mod activation;
pub mod chain;
pub mod respawn;

pub use activation::{
    activate_tile, activate_with_stats, get_activation_count_from_roll, mine_tile_manually,
    ActivationOutcome,
};
pub use chain::trigger_chain_reaction;
pub use respawn::{apply_respawn, RespawnEvent, RespawnQueue};

use crate::map::grid::roll_tiles;
use crate::map::{MapGrid, TileGrid};
use crate::resources::OreWeights;
use rand::Rng;

/// The playing field: the tiles plus their pending respawns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mine<G: TileGrid = MapGrid> {
    pub grid: G,
    pub respawns: RespawnQueue,
    /// Roster slot served first on the next tick.
    rotation: usize,
}

impl Mine<MapGrid> {
    pub fn generate<R: Rng>(side: usize, weights: &OreWeights, rng: &mut R) -> Self {
        Self::new(MapGrid::generate(side, weights, rng))
    }
}

impl<G: TileGrid> Mine<G> {
    pub fn new(grid: G) -> Self {
        Self {
            grid,
            respawns: RespawnQueue::new(),
            rotation: 0,
        }
    }

    pub fn side(&self) -> usize {
        self.grid.side()
    }

    /// Returns the slot to serve first among `owned` miners this tick and
    /// moves the rotation on by one.
    pub fn next_rotation(&mut self, owned: usize) -> usize {
        if owned == 0 {
            return 0;
        }
        let start = self.rotation % owned;
        self.rotation = (start + 1) % owned;
        start
    }

    /// Rolls every tile afresh at `side` and orphans pending respawns.
    pub fn rebuild<R: Rng>(&mut self, side: usize, weights: &OreWeights, rng: &mut R) {
        self.grid.replace_tiles(side, roll_tiles(side, weights, rng));
        self.respawns.bump_epoch();
    }
}
