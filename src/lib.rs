//! Idle Miner - simulation core of a tile-mining idle game.
//!
//! The library owns every rule of the game: the ore catalog, the tile map,
//! miners and their classes, the tick scheduler, purchases and saves. The
//! terminal front-end in `main.rs` only reads state and calls operations.

pub mod build_info;
pub mod core;
pub mod map;
pub mod miners;
pub mod mining;
pub mod persistence;
pub mod render;
pub mod resources;

pub use crate::core::{game_tick, GameState, TickEvent, TickResult};
pub use crate::mining::Mine;
