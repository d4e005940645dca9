//! Static ore table and the live per-ore generation levels.

use serde::Serialize;

/// Ore identifiers, in ladder order (lowest tier first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ore {
    Sand,
    Coal,
    Copper,
    Iron,
    Silver,
    Gold,
    Amethyst,
    Sapphire,
    Emerald,
    Ruby,
    Diamond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OreCategory {
    Stone,
    Metal,
    Gem,
}

/// Static definition of one ore.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OreDefinition {
    pub ore: Ore,
    pub category: OreCategory,
    pub base_weight: f64,
    pub value: f64,
    /// Cost of generation level 1; `None` for sand, which is always unlocked.
    pub base_cost: Option<f64>,
    pub growth: f64,
}

/// Number of ores in the catalog.
pub const ORE_COUNT: usize = 11;

/// Shared generation-upgrade curve for the whole gem tier.
const GEM_BASE_COST: f64 = 200_000.0;
const GEM_COST_GROWTH: f64 = 1.8;
const GEM_BASE_WEIGHT: f64 = 4.0;

static CATALOG: [OreDefinition; ORE_COUNT] = [
    OreDefinition {
        ore: Ore::Sand,
        category: OreCategory::Stone,
        base_weight: 10_000.0,
        value: 1.0,
        base_cost: None,
        growth: 1.0,
    },
    OreDefinition {
        ore: Ore::Coal,
        category: OreCategory::Stone,
        base_weight: 600.0,
        value: 3.0,
        base_cost: Some(50.0),
        growth: 1.45,
    },
    OreDefinition {
        ore: Ore::Copper,
        category: OreCategory::Metal,
        base_weight: 300.0,
        value: 8.0,
        base_cost: Some(300.0),
        growth: 1.5,
    },
    OreDefinition {
        ore: Ore::Iron,
        category: OreCategory::Metal,
        base_weight: 150.0,
        value: 20.0,
        base_cost: Some(1_500.0),
        growth: 1.55,
    },
    OreDefinition {
        ore: Ore::Silver,
        category: OreCategory::Metal,
        base_weight: 75.0,
        value: 50.0,
        base_cost: Some(8_000.0),
        growth: 1.6,
    },
    OreDefinition {
        ore: Ore::Gold,
        category: OreCategory::Metal,
        base_weight: 35.0,
        value: 125.0,
        base_cost: Some(40_000.0),
        growth: 1.65,
    },
    OreDefinition {
        ore: Ore::Amethyst,
        category: OreCategory::Gem,
        base_weight: GEM_BASE_WEIGHT,
        value: 300.0,
        base_cost: Some(GEM_BASE_COST),
        growth: GEM_COST_GROWTH,
    },
    OreDefinition {
        ore: Ore::Sapphire,
        category: OreCategory::Gem,
        base_weight: GEM_BASE_WEIGHT,
        value: 450.0,
        base_cost: Some(GEM_BASE_COST),
        growth: GEM_COST_GROWTH,
    },
    OreDefinition {
        ore: Ore::Emerald,
        category: OreCategory::Gem,
        base_weight: GEM_BASE_WEIGHT,
        value: 650.0,
        base_cost: Some(GEM_BASE_COST),
        growth: GEM_COST_GROWTH,
    },
    OreDefinition {
        ore: Ore::Ruby,
        category: OreCategory::Gem,
        base_weight: GEM_BASE_WEIGHT,
        value: 900.0,
        base_cost: Some(GEM_BASE_COST),
        growth: GEM_COST_GROWTH,
    },
    OreDefinition {
        ore: Ore::Diamond,
        category: OreCategory::Gem,
        base_weight: GEM_BASE_WEIGHT,
        value: 1_500.0,
        base_cost: Some(GEM_BASE_COST),
        growth: GEM_COST_GROWTH,
    },
];

impl Ore {
    /// All ores in ladder order.
    pub const ALL: [Ore; ORE_COUNT] = [
        Ore::Sand,
        Ore::Coal,
        Ore::Copper,
        Ore::Iron,
        Ore::Silver,
        Ore::Gold,
        Ore::Amethyst,
        Ore::Sapphire,
        Ore::Emerald,
        Ore::Ruby,
        Ore::Diamond,
    ];

    /// The non-gem ladder `sand < coal < copper < iron < silver < gold`.
    pub const LADDER: [Ore; 6] = [
        Ore::Sand,
        Ore::Coal,
        Ore::Copper,
        Ore::Iron,
        Ore::Silver,
        Ore::Gold,
    ];

    pub const GEMS: [Ore; 5] = [
        Ore::Amethyst,
        Ore::Sapphire,
        Ore::Emerald,
        Ore::Ruby,
        Ore::Diamond,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static OreDefinition {
        &CATALOG[self.index()]
    }

    pub fn category(self) -> OreCategory {
        self.definition().category
    }

    pub fn base_weight(self) -> f64 {
        self.definition().base_weight
    }

    /// Coin value of one unit.
    pub fn value(self) -> f64 {
        self.definition().value
    }

    pub fn is_gem(self) -> bool {
        self.category() == OreCategory::Gem
    }

    pub fn is_metal(self) -> bool {
        self.category() == OreCategory::Metal
    }

    /// Whether this ore has a generation level at all (everything but sand).
    pub fn is_upgradable(self) -> bool {
        self.definition().base_cost.is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            Ore::Sand => "Sand",
            Ore::Coal => "Coal",
            Ore::Copper => "Copper",
            Ore::Iron => "Iron",
            Ore::Silver => "Silver",
            Ore::Gold => "Gold",
            Ore::Amethyst => "Amethyst",
            Ore::Sapphire => "Sapphire",
            Ore::Emerald => "Emerald",
            Ore::Ruby => "Ruby",
            Ore::Diamond => "Diamond",
        }
    }

    /// Persisted identifier, e.g. `"copper"`.
    pub fn key(self) -> &'static str {
        match self {
            Ore::Sand => "sand",
            Ore::Coal => "coal",
            Ore::Copper => "copper",
            Ore::Iron => "iron",
            Ore::Silver => "silver",
            Ore::Gold => "gold",
            Ore::Amethyst => "amethyst",
            Ore::Sapphire => "sapphire",
            Ore::Emerald => "emerald",
            Ore::Ruby => "ruby",
            Ore::Diamond => "diamond",
        }
    }

    pub fn from_key(key: &str) -> Option<Ore> {
        Ore::ALL.iter().copied().find(|ore| ore.key() == key)
    }

    /// Single-character map glyph.
    pub fn glyph(self) -> char {
        match self {
            Ore::Sand => '.',
            Ore::Coal => 'c',
            Ore::Copper => 'u',
            Ore::Iron => 'i',
            Ore::Silver => 's',
            Ore::Gold => 'g',
            Ore::Amethyst => 'A',
            Ore::Sapphire => 'S',
            Ore::Emerald => 'E',
            Ore::Ruby => 'R',
            Ore::Diamond => 'D',
        }
    }

    /// Cost of raising the generation level from `level` to `level + 1`.
    /// `None` for sand.
    pub fn generation_cost(self, level: u32) -> Option<f64> {
        let def = self.definition();
        def.base_cost
            .map(|base| (base * def.growth.powi(level as i32)).ceil())
    }
}

/// Live generation levels, indexed by [`Ore::index`]. Sand's slot is unused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLevels {
    levels: [u32; ORE_COUNT],
}

impl ResourceLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation level of `ore`; always 0 for sand.
    pub fn level(&self, ore: Ore) -> u32 {
        if ore.is_upgradable() {
            self.levels[ore.index()]
        } else {
            0
        }
    }

    /// Sets a level. Writes to sand are ignored.
    pub fn set_level(&mut self, ore: Ore, level: u32) {
        if ore.is_upgradable() {
            self.levels[ore.index()] = level;
        }
    }

    pub fn is_unlocked(&self, ore: Ore) -> bool {
        !ore.is_upgradable() || self.level(ore) > 0
    }

    /// The shared gem level (the highest of the five, so a partially synced
    /// state rounds up rather than down).
    pub fn gem_level(&self) -> u32 {
        Ore::GEMS
            .iter()
            .map(|gem| self.level(*gem))
            .max()
            .unwrap_or(0)
    }

    /// Keeps the five gem levels in lockstep at `gem_level()`.
    pub fn sync_gem_levels(&mut self) {
        let level = self.gem_level();
        for gem in Ore::GEMS {
            self.set_level(gem, level);
        }
    }

    /// Iterates `(ore, level)` for every upgradable ore.
    pub fn iter(&self) -> impl Iterator<Item = (Ore, u32)> + '_ {
        Ore::ALL
            .iter()
            .copied()
            .filter(|ore| ore.is_upgradable())
            .map(move |ore| (ore, self.level(ore)))
    }
}
