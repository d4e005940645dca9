// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const AUTOSAVE_INTERVAL_SECONDS: u64 = 30;
pub const SAVE_DIR_NAME: &str = ".idle-miner";
pub const SAVE_FILE_NAME: &str = "save.json";
pub const LOG_FILE_NAME: &str = "idle-miner.log";
pub const RESPAWN_DELAY_SECONDS: f64 = 3.0;
/// Maximum miner triggers processed in a single tick across the whole roster.
pub const MAX_TRIGGERS_PER_TICK: u32 = 25;

// Offline progress
pub const MAX_OFFLINE_SECONDS: i64 = 8 * 60 * 60;

// Map
pub const TILE_SIZE_PX: f64 = 40.0;
pub const STARTING_MAP_EXPANSIONS: u32 = 2;
pub const MAX_MAP_EXPANSIONS: u32 = 9;
pub const MAP_EXPANSION_BASE_COST: f64 = 150.0;
pub const MAP_EXPANSION_COST_GROWTH: f64 = 3.0;

// Eligibility sampling: SAMPLES_PER_AXIS² points per tile
pub const COVERAGE_SAMPLES_PER_AXIS: usize = 5;
pub const MIN_TILE_COVERAGE: f64 = 0.3;

// Economy
pub const STARTING_COINS: f64 = 0.0;

// Roster
pub const MAX_MINERS: usize = 20;
pub const MINER_BASE_COST: f64 = 20.0;
pub const MINER_COST_GROWTH: f64 = 1.6;
pub const SPECIALIZATION_UNLOCK_COST: f64 = 500.0;

// Universal miner upgrades
pub const TRIGGER_INTERVAL_SECONDS: f64 = 5.0;
pub const SPEED_BONUS_PER_LEVEL: f64 = 0.1;
pub const MAX_SPEED_LEVEL: u32 = 30;
pub const SPEED_UPGRADE_BASE_COST: f64 = 25.0;
pub const SPEED_UPGRADE_COST_GROWTH: f64 = 1.35;
pub const BASE_RADIUS_PX: f64 = 40.0;
pub const RADIUS_BONUS_PER_LEVEL: f64 = 0.1;
pub const MAX_RADIUS_LEVEL: u32 = 15;
pub const RADIUS_UPGRADE_BASE_COST: f64 = 40.0;
pub const RADIUS_UPGRADE_COST_GROWTH: f64 = 1.4;
pub const CLASS_UPGRADE_COST_GROWTH: f64 = 1.5;

// Ore generation
pub const ORE_WEIGHT_GROWTH_PER_LEVEL: f64 = 1.2;
/// Upper bound applied to generation levels read from a save.
pub const MAX_PERSISTED_ORE_LEVEL: u32 = 100;

// Worker: double activation, in percent
pub const DOUBLE_MIN_PERCENT_PER_LEVEL: f64 = 10.0;
pub const DOUBLE_MAX_PERCENT_PER_LEVEL: f64 = 15.0;

// Prospector: critical hits
pub const CRIT_BASE_CHANCE: f64 = 0.05;
pub const CRIT_CHANCE_PER_LEVEL: f64 = 0.03;
pub const CRIT_CHANCE_CAP: f64 = 0.5;
pub const CRIT_BASE_MULTIPLIER: f64 = 2.0;
pub const CRIT_MULTIPLIER_PER_LEVEL: f64 = 0.25;

// Demolitionist: blast chains
pub const BLAST_BASE_CHANCE: f64 = 0.10;
pub const BLAST_CHANCE_PER_LEVEL: f64 = 0.03;
pub const BLAST_CHANCE_CAP: f64 = 0.6;
pub const BLAST_BASE_LENGTH: u32 = 2;

// Electrician: electric chains
pub const ARC_BASE_CHANCE: f64 = 0.08;
pub const ARC_CHANCE_PER_LEVEL: f64 = 0.025;
pub const ARC_CHANCE_CAP: f64 = 0.5;
pub const ARC_CHAIN_LENGTH: u32 = 6;
pub const METAL_BIAS_BASE: f64 = 0.3;
pub const METAL_BIAS_PER_LEVEL: f64 = 0.06;
pub const METAL_BIAS_CAP: f64 = 0.9;
pub const ELECTRIC_EFFICIENCY_BASE: f64 = 0.6;
pub const ELECTRIC_EFFICIENCY_PER_LEVEL: f64 = 0.035;
pub const ELECTRIC_EFFICIENCY_CAP: f64 = 0.95;

// Geologist: vein finder
pub const VEIN_QUALITY_PER_LEVEL: f64 = 0.25;

// Arcanist: bountiful enchantment (extra ore units)
pub const BOUNTIFUL_BASE_CHANCE: f64 = 0.10;
pub const BOUNTIFUL_CHANCE_PER_LEVEL: f64 = 0.03;
pub const BOUNTIFUL_CHANCE_CAP: f64 = 0.6;
pub const BOUNTIFUL_BASE_MIN_UNITS: u32 = 1;

// Enricher: enriched enchantment (value multiplier)
pub const ENRICH_BASE_CHANCE: f64 = 0.10;
pub const ENRICH_CHANCE_PER_LEVEL: f64 = 0.03;
pub const ENRICH_CHANCE_CAP: f64 = 0.6;
pub const ENRICH_BASE_MIN_MULTIPLIER: f64 = 1.5;
pub const ENRICH_MIN_PER_LEVEL: f64 = 0.1;
pub const ENRICH_SPREAD_BASE: f64 = 0.5;
pub const ENRICH_MAX_PER_LEVEL: f64 = 0.2;

// Foreman: aura
pub const OVERTIME_PER_LEVEL: f64 = 0.05;
pub const OVERTIME_BONUS_CAP: f64 = 1.0;
pub const MOTIVATION_PER_SPEED_LEVEL: f64 = 0.02;
pub const AUTONOMY_PER_RADIUS_LEVEL: f64 = 0.02;
/// Breaks ties between equally strong Foremen in favour of the higher overtime
/// level. Arbitrary; not a balance constant.
pub const FOREMAN_TIE_BREAK: f64 = 0.0001;
