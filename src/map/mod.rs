//! Map geometry and the tile grid.

pub mod geometry;
pub mod grid;

pub use geometry::Point;
pub use grid::{Enchantment, MapGrid, Tile, TileGrid};
