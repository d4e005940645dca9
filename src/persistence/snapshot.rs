//! The save document and its tolerant decoder.
//!
//! Writing goes through the typed [`SaveSnapshot`]. Reading does not: the
//! text is parsed into a `serde_json::Value` and every field is coerced on
//! its own, so one bad field costs only that field. Only a document that is
//! not a JSON object at all is rejected.

use super::store::SaveError;
use crate::core::constants::{
    MAX_MAP_EXPANSIONS, MAX_MINERS, MAX_PERSISTED_ORE_LEVEL, MAX_RADIUS_LEVEL, MAX_SPEED_LEVEL,
    STARTING_MAP_EXPANSIONS, TRIGGER_INTERVAL_SECONDS,
};
use crate::core::game_state::GameState;
use crate::map::geometry::{clamp_to_map, ring_position, side_for_expansions};
use crate::map::Point;
use crate::miners::{Roster, Specialization, Targeting, Unit};
use crate::resources::{Inventory, Ore, ResourceLevels};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSnapshot {
    pub speed_level: u32,
    pub radius_level: u32,
    pub specialization_unlocked: bool,
    pub specialization: String,
    pub targeting: Targeting,
    pub specialization_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSnapshot {
    pub ore: Ore,
    pub resource_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshot {
    pub coins: f64,
    pub map_expansions: u32,
    pub idle_miner_owned: usize,
    pub idle_miner_cooldowns: Vec<f64>,
    pub idle_miner_positions: Vec<Point>,
    pub units: Vec<UnitSnapshot>,
    pub resources: Vec<ResourceSnapshot>,
    pub inventory: BTreeMap<String, u64>,
    pub active_play_seconds: f64,
    pub auto_sell_enabled: bool,
    pub left_handed_mode: bool,
    pub saved_at: i64,
    pub lifetime_coins: f64,
    pub total_activations: u64,
}

impl SaveSnapshot {
    /// Captures `state` as of `now_ms`. Pending inventory is not included.
    pub fn capture(state: &GameState, now_ms: i64) -> Self {
        Self {
            coins: state.coins,
            map_expansions: state.map_expansions,
            idle_miner_owned: state.roster.len(),
            idle_miner_cooldowns: state.roster.iter().map(|u| u.cooldown.max(0.0)).collect(),
            idle_miner_positions: state.roster.iter().map(|u| u.position).collect(),
            units: state
                .roster
                .iter()
                .map(|u| UnitSnapshot {
                    speed_level: u.speed_level,
                    radius_level: u.radius_level,
                    specialization_unlocked: u.specialization_unlocked,
                    specialization: u.kind().name().to_string(),
                    targeting: u.targeting,
                    specialization_data: u.specialization.data_json(),
                })
                .collect(),
            resources: state
                .resources
                .iter()
                .map(|(ore, resource_level)| ResourceSnapshot {
                    ore,
                    resource_level,
                })
                .collect(),
            inventory: Ore::ALL
                .iter()
                .map(|ore| (ore.key().to_string(), state.inventory.confirmed(*ore)))
                .filter(|(_, count)| *count > 0)
                .collect(),
            active_play_seconds: state.active_play_seconds,
            auto_sell_enabled: state.auto_sell_enabled,
            left_handed_mode: state.left_handed_mode,
            saved_at: now_ms,
            lifetime_coins: state.lifetime_coins,
            total_activations: state.total_activations,
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Coercion helpers ────────────────────────────────────────────

fn finite(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

/// Finite and non-negative, else 0.
fn amount(value: Option<&Value>) -> f64 {
    finite(value).filter(|v| *v >= 0.0).unwrap_or(0.0)
}

/// A whole number in `0..=max`; fractions are floored, garbage is 0.
fn whole(value: Option<&Value>, max: u64) -> u64 {
    finite(value)
        .filter(|v| *v > 0.0)
        .map(|v| (v.floor() as u64).min(max))
        .unwrap_or(0)
}

fn flag(value: Option<&Value>, default: bool) -> bool {
    value.and_then(Value::as_bool).unwrap_or(default)
}

fn point(value: Option<&Value>) -> Option<Point> {
    let obj = value?.as_object()?;
    let p = Point::new(finite(obj.get("x"))?, finite(obj.get("y"))?);
    Some(p)
}

fn restore_unit(
    doc: Option<&Value>,
    cooldown: Option<&Value>,
    position: Option<&Value>,
    slot: usize,
    owned: usize,
    side: usize,
) -> Unit {
    let position = point(position)
        .map(|p| clamp_to_map(p, side))
        .unwrap_or_else(|| ring_position(slot, owned, side));
    let mut unit = Unit::new(position);
    unit.cooldown = amount(cooldown).min(TRIGGER_INTERVAL_SECONDS);

    let Some(fields) = doc.and_then(Value::as_object) else {
        return unit;
    };
    unit.speed_level = whole(fields.get("speedLevel"), MAX_SPEED_LEVEL as u64) as u32;
    unit.radius_level = whole(fields.get("radiusLevel"), MAX_RADIUS_LEVEL as u64) as u32;
    unit.specialization_unlocked = flag(fields.get("specializationUnlocked"), false);
    unit.targeting = fields
        .get("targeting")
        .and_then(Value::as_str)
        .and_then(Targeting::from_key)
        .unwrap_or_default();
    if unit.specialization_unlocked {
        let tag = fields.get("specialization").and_then(Value::as_str);
        let data = fields.get("specializationData").unwrap_or(&Value::Null);
        unit.specialization = Specialization::from_persisted(tag, data);
    }
    unit
}

fn restore_resources(value: Option<&Value>) -> ResourceLevels {
    let mut levels = ResourceLevels::new();
    for entry in value.and_then(Value::as_array).into_iter().flatten() {
        let Some(ore) = entry
            .get("ore")
            .and_then(Value::as_str)
            .and_then(Ore::from_key)
        else {
            continue;
        };
        let level = whole(entry.get("resourceLevel"), MAX_PERSISTED_ORE_LEVEL as u64) as u32;
        levels.set_level(ore, level);
    }
    levels.sync_gem_levels();
    levels
}

fn restore_inventory(value: Option<&Value>) -> Inventory {
    let mut inventory = Inventory::new();
    for (key, count) in value.and_then(Value::as_object).into_iter().flatten() {
        if let Some(ore) = Ore::from_key(key) {
            inventory.set_confirmed(ore, whole(Some(count), u64::MAX));
        }
    }
    inventory
}

fn restore_roster(doc: &Map<String, Value>, side: usize) -> Roster {
    let units = doc.get("units").and_then(Value::as_array);
    let owned = doc
        .get("idleMinerOwned")
        .map(|v| whole(Some(v), MAX_MINERS as u64) as usize)
        .unwrap_or_else(|| units.map(|u| u.len().min(MAX_MINERS)).unwrap_or(0));
    let cooldowns = doc.get("idleMinerCooldowns").and_then(Value::as_array);
    let positions = doc.get("idleMinerPositions").and_then(Value::as_array);

    let restored = (0..owned)
        .map(|slot| {
            restore_unit(
                units.and_then(|u| u.get(slot)),
                cooldowns.and_then(|c| c.get(slot)),
                positions.and_then(|p| p.get(slot)),
                slot,
                owned,
                side,
            )
        })
        .collect();
    Roster::from_units(restored)
}

/// Rebuilds a `GameState` from save text, coercing every field.
///
/// Fails only when the text is not a JSON object. A missing or unreadable
/// `savedAt` is replaced with `now_ms`, which grants no offline time.
pub fn restore(text: &str, now_ms: i64) -> Result<GameState, SaveError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| SaveError::Parse(e.to_string()))?;
    let Some(doc) = value.as_object() else {
        return Err(SaveError::Parse("expected a JSON object".to_string()));
    };

    let mut state = GameState::new(now_ms);
    state.coins = amount(doc.get("coins"));
    state.map_expansions = (whole(doc.get("mapExpansions"), MAX_MAP_EXPANSIONS as u64) as u32)
        .max(STARTING_MAP_EXPANSIONS);
    let side = side_for_expansions(state.map_expansions);
    state.roster = restore_roster(doc, side);
    state.resources = restore_resources(doc.get("resources"));
    state.inventory = restore_inventory(doc.get("inventory"));
    state.active_play_seconds = amount(doc.get("activePlaySeconds"));
    state.auto_sell_enabled = flag(doc.get("autoSellEnabled"), true);
    state.left_handed_mode = flag(doc.get("leftHandedMode"), false);
    state.last_save_time = finite(doc.get("savedAt"))
        .filter(|v| *v >= 0.0 && *v <= now_ms as f64)
        .map(|v| v as i64)
        .unwrap_or(now_ms);
    state.lifetime_coins = amount(doc.get("lifetimeCoins")).max(state.coins);
    state.total_activations = whole(doc.get("totalActivations"), u64::MAX);
    Ok(state)
}
