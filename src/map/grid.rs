//! Tile storage and the grid query surface the simulation runs against.

use crate::resources::{roll_tile_type, Ore, OreWeights};
use rand::Rng;

/// Enchantment stamped onto a tile; consumed by the next activation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Enchantment {
    #[default]
    None,
    /// Extra ore units on the next activation.
    Bountiful { extra_units: u32 },
    /// Coin value multiplier on the next activation.
    Enriched { multiplier: f64 },
}

impl Enchantment {
    pub fn is_none(&self) -> bool {
        matches!(self, Enchantment::None)
    }

    /// Persisted/display tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Enchantment::None => "none",
            Enchantment::Bountiful { .. } => "bountiful",
            Enchantment::Enriched { .. } => "enriched",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub index: usize,
    pub ore: Ore,
    /// True while mined and waiting to respawn.
    pub cooldown: bool,
    pub enchantment: Enchantment,
}

impl Tile {
    pub fn new(index: usize, ore: Ore) -> Self {
        Self {
            index,
            ore,
            cooldown: false,
            enchantment: Enchantment::None,
        }
    }
}

/// What the simulation needs from a grid representation.
pub trait TileGrid {
    /// Side length in tiles.
    fn side(&self) -> usize;

    fn tile(&self, index: usize) -> Option<&Tile>;

    fn tile_mut(&mut self, index: usize) -> Option<&mut Tile>;

    /// Replaces every tile, e.g. after a map expansion.
    fn replace_tiles(&mut self, side: usize, tiles: Vec<Tile>);

    fn len(&self) -> usize {
        self.side() * self.side()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices of tiles that are not currently on cooldown.
    fn available_tiles(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|i| self.tile(*i).map(|t| !t.cooldown).unwrap_or(false))
            .collect()
    }
}

/// In-memory square grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapGrid {
    side: usize,
    tiles: Vec<Tile>,
}

impl MapGrid {
    /// A grid with every tile freshly rolled.
    pub fn generate<R: Rng>(side: usize, weights: &OreWeights, rng: &mut R) -> Self {
        let mut grid = Self::default();
        grid.replace_tiles(side, roll_tiles(side, weights, rng));
        grid
    }

    /// A grid filled with one ore, mostly for tests.
    pub fn filled(side: usize, ore: Ore) -> Self {
        Self {
            side,
            tiles: (0..side * side).map(|i| Tile::new(i, ore)).collect(),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

impl TileGrid for MapGrid {
    fn side(&self) -> usize {
        self.side
    }

    fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    fn tile_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    fn replace_tiles(&mut self, side: usize, tiles: Vec<Tile>) {
        self.side = side;
        self.tiles = tiles;
    }

    fn len(&self) -> usize {
        self.tiles.len()
    }
}

/// Rolls a fresh `side × side` tile set.
pub fn roll_tiles<R: Rng>(side: usize, weights: &OreWeights, rng: &mut R) -> Vec<Tile> {
    (0..side * side)
        .map(|i| Tile::new(i, roll_tile_type(weights, None, rng)))
        .collect()
}
