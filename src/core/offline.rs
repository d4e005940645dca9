//! Offline progression.
//!
//! Coins earned while the game was closed are estimated from the roster's
//! steady-state income instead of replaying ticks.

use super::constants::MAX_OFFLINE_SECONDS;
use super::game_state::GameState;
use crate::miners::MinerStats;
use chrono::Utc;

/// Report of offline progression results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OfflineReport {
    pub elapsed_seconds: i64,
    /// Seconds actually paid out, after the offline cap.
    pub credited_seconds: i64,
    pub coins_per_second: f64,
    pub coins_earned: f64,
}

/// Expected income of the whole roster, in coins per second.
///
/// Per miner: trigger rate × mean tile value × crit gain × (1 + mean extra
/// activations). Chains and enchantments are left out of the estimate.
pub fn estimate_coins_per_second(state: &GameState) -> f64 {
    let tile_value = state.weights().expected_value();
    (0..state.roster.len())
        .filter_map(|i| MinerStats::resolve(&state.roster, i))
        .filter(|stats| stats.clicks_per_second.is_finite())
        .map(|stats| {
            let crit_gain = 1.0 + stats.crit_chance * (stats.crit_multiplier - 1.0);
            stats.clicks_per_second
                * tile_value
                * crit_gain
                * (1.0 + stats.expected_double_activations())
        })
        .sum()
}

/// Coins owed for `elapsed_seconds` away, capped at the offline limit.
pub fn calculate_offline_coins(state: &GameState, elapsed_seconds: i64) -> f64 {
    let capped = elapsed_seconds.clamp(0, MAX_OFFLINE_SECONDS);
    estimate_coins_per_second(state) * capped as f64
}

/// Credits offline earnings since `last_save_time` as of `now_ms`.
pub fn process_offline_progression_at(state: &mut GameState, now_ms: i64) -> OfflineReport {
    let elapsed_seconds = (now_ms - state.last_save_time) / 1000;
    if elapsed_seconds <= 0 {
        return OfflineReport::default();
    }

    let coins_per_second = estimate_coins_per_second(state);
    let coins_earned = calculate_offline_coins(state, elapsed_seconds);
    state.credit(coins_earned);
    state.last_save_time = now_ms;

    OfflineReport {
        elapsed_seconds,
        credited_seconds: elapsed_seconds.min(MAX_OFFLINE_SECONDS),
        coins_per_second,
        coins_earned,
    }
}

/// Processes offline progression against the wall clock.
pub fn process_offline_progression(state: &mut GameState) -> OfflineReport {
    process_offline_progression_at(state, Utc::now().timestamp_millis())
}
