//! Game state, the tick scheduler, purchases and offline progress.

pub mod constants;
pub mod game_state;
pub mod offline;
pub mod tick;
pub mod upgrades;

pub use game_state::GameState;
pub use offline::{
    calculate_offline_coins, estimate_coins_per_second, process_offline_progression,
    process_offline_progression_at, OfflineReport,
};
pub use tick::{game_tick, TickEvent, TickResult};
pub use upgrades::*;
