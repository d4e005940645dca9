//! Ore catalog, generation levels, weighting engine and inventory.

pub mod catalog;
pub mod inventory;
pub mod weighting;

pub use catalog::{Ore, OreCategory, OreDefinition, ResourceLevels, ORE_COUNT};
pub use inventory::Inventory;
pub use weighting::{
    can_increase_ore_generation, effective_weights, get_ore_weight_for_level, roll_tile_type,
    OreWeights, QualityBoost,
};
