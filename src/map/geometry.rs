//! Spatial math for the square tile map. Everything here is pure.
//!
//! Map coordinates are pixels with the origin at the top-left corner of tile 0.
//! Tile `i` sits at row `i / side`, column `i % side`.

use crate::core::constants::{COVERAGE_SAMPLES_PER_AXIS, MIN_TILE_COVERAGE, TILE_SIZE_PX};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned tile rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl TileBounds {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

/// Side length of the map in tiles for a number of expansions.
pub fn side_for_expansions(expansions: u32) -> usize {
    expansions as usize + 1
}

pub fn map_size_px(side: usize) -> f64 {
    side as f64 * TILE_SIZE_PX
}

/// Linear index → `(row, column)`.
pub fn row_col(index: usize, side: usize) -> (usize, usize) {
    if side == 0 {
        return (0, 0);
    }
    (index / side, index % side)
}

pub fn tile_bounds(index: usize, side: usize) -> TileBounds {
    let (row, col) = row_col(index, side);
    TileBounds {
        x: col as f64 * TILE_SIZE_PX,
        y: row as f64 * TILE_SIZE_PX,
        size: TILE_SIZE_PX,
    }
}

/// Fraction of a tile inside a circle, sampled on a fixed 5×5 grid of
/// cell-centred points. A point exactly on the circle counts as inside.
pub fn tile_coverage(bounds: &TileBounds, center: &Point, radius: f64) -> f64 {
    if !(radius > 0.0) {
        return 0.0;
    }
    let n = COVERAGE_SAMPLES_PER_AXIS;
    let step = bounds.size / n as f64;
    let mut inside = 0usize;
    for sy in 0..n {
        for sx in 0..n {
            let sample = Point::new(
                bounds.x + (sx as f64 + 0.5) * step,
                bounds.y + (sy as f64 + 0.5) * step,
            );
            if sample.distance(center) <= radius {
                inside += 1;
            }
        }
    }
    inside as f64 / (n * n) as f64
}

pub fn is_tile_eligible(index: usize, side: usize, center: &Point, radius: f64) -> bool {
    tile_coverage(&tile_bounds(index, side), center, radius) >= MIN_TILE_COVERAGE
}

/// All tile indices of a `side × side` map covered by the circle.
pub fn covered_tiles(side: usize, center: &Point, radius: f64) -> Vec<usize> {
    (0..side * side)
        .filter(|i| is_tile_eligible(*i, side, center, radius))
        .collect()
}

/// 4-neighbourhood of a tile, computed with row/column arithmetic so that
/// neighbours never wrap across rows.
pub fn neighbors(index: usize, side: usize) -> Vec<usize> {
    let total = side * side;
    if index >= total {
        return Vec::new();
    }
    let (row, col) = row_col(index, side);
    let mut out = Vec::with_capacity(4);
    if row > 0 {
        out.push(index - side);
    }
    if row + 1 < side {
        out.push(index + side);
    }
    if col > 0 {
        out.push(index - 1);
    }
    if col + 1 < side {
        out.push(index + 1);
    }
    out
}

/// Default placement for miner `slot` of `count`: evenly spaced on a ring
/// around the map centre, starting at the top. A lone miner sits at the centre.
pub fn ring_position(slot: usize, count: usize, side: usize) -> Point {
    let size = map_size_px(side);
    let center = Point::new(size / 2.0, size / 2.0);
    if count <= 1 {
        return center;
    }
    let ring = size * 0.25;
    let angle = std::f64::consts::TAU * slot as f64 / count as f64 - std::f64::consts::FRAC_PI_2;
    Point::new(center.x + ring * angle.cos(), center.y + ring * angle.sin())
}

/// Clamps a point into the map; non-finite input lands on the centre.
pub fn clamp_to_map(point: Point, side: usize) -> Point {
    let size = map_size_px(side);
    if !point.is_finite() {
        return Point::new(size / 2.0, size / 2.0);
    }
    Point::new(point.x.clamp(0.0, size), point.y.clamp(0.0, size))
}
