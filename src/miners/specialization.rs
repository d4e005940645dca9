//! Miner classes and their per-class upgrade levels.
//!
//! A specialization and its data are one closed sum type, so the class tag
//! can never disagree with the fields it carries. Persisted data arrives
//! untyped and is rebuilt through [`Specialization::from_persisted`], which
//! reads only the fields that belong to the normalized class.

use serde::Serialize;
use serde_json::Value;

/// Class tag without data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpecializationKind {
    #[default]
    Worker,
    Prospector,
    Demolitionist,
    Electrician,
    Geologist,
    Arcanist,
    Enricher,
    Foreman,
}

impl SpecializationKind {
    pub const ALL: [SpecializationKind; 8] = [
        SpecializationKind::Worker,
        SpecializationKind::Prospector,
        SpecializationKind::Demolitionist,
        SpecializationKind::Electrician,
        SpecializationKind::Geologist,
        SpecializationKind::Arcanist,
        SpecializationKind::Enricher,
        SpecializationKind::Foreman,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpecializationKind::Worker => "Worker",
            SpecializationKind::Prospector => "Prospector",
            SpecializationKind::Demolitionist => "Demolitionist",
            SpecializationKind::Electrician => "Electrician",
            SpecializationKind::Geologist => "Geologist",
            SpecializationKind::Arcanist => "Arcanist",
            SpecializationKind::Enricher => "Enricher",
            SpecializationKind::Foreman => "Foreman",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SpecializationKind::Worker => "Sometimes swings twice.",
            SpecializationKind::Prospector => "Lands critical strikes for multiplied coin.",
            SpecializationKind::Demolitionist => "Blasts chain into neighbouring tiles.",
            SpecializationKind::Electrician => "Arcs jump between tiles, drawn to metal.",
            SpecializationKind::Geologist => "Respawned tiles lean toward the ore just mined.",
            SpecializationKind::Arcanist => "Leaves bountiful tiles that yield extra ore.",
            SpecializationKind::Enricher => "Leaves enriched tiles worth more coin.",
            SpecializationKind::Foreman => "Drives nearby miners harder. Ignores other Foremen.",
        }
    }

    /// Parses a persisted class name. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<SpecializationKind> {
        SpecializationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Whether targeting should prefer un-enchanted resource tiles.
    pub fn is_enchanter(&self) -> bool {
        matches!(
            self,
            SpecializationKind::Arcanist | SpecializationKind::Enricher
        )
    }

    pub fn next(&self) -> SpecializationKind {
        let i = SpecializationKind::ALL
            .iter()
            .position(|k| k == self)
            .unwrap_or(0);
        SpecializationKind::ALL[(i + 1) % SpecializationKind::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerData {
    pub double_min_level: u32,
    pub double_max_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectorData {
    pub crit_chance_level: u32,
    pub crit_power_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemolitionistData {
    pub blast_chance_level: u32,
    pub blast_length_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricianData {
    pub conductivity_level: u32,
    pub metal_bias_level: u32,
    pub efficiency_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeologistData {
    pub vein_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcanistData {
    pub bountiful_chance_level: u32,
    pub bountiful_min_level: u32,
    pub bountiful_max_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnricherData {
    pub enrich_chance_level: u32,
    pub enrich_min_level: u32,
    pub enrich_max_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForemanData {
    pub overtime_level: u32,
}

/// A miner's class together with its class-specific upgrade levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specialization {
    Worker(WorkerData),
    Prospector(ProspectorData),
    Demolitionist(DemolitionistData),
    Electrician(ElectricianData),
    Geologist(GeologistData),
    Arcanist(ArcanistData),
    Enricher(EnricherData),
    Foreman(ForemanData),
}

impl Default for Specialization {
    fn default() -> Self {
        Specialization::Worker(WorkerData::default())
    }
}

impl Specialization {
    /// A class with every upgrade at level 0.
    pub fn new(kind: SpecializationKind) -> Self {
        match kind {
            SpecializationKind::Worker => Specialization::Worker(WorkerData::default()),
            SpecializationKind::Prospector => {
                Specialization::Prospector(ProspectorData::default())
            }
            SpecializationKind::Demolitionist => {
                Specialization::Demolitionist(DemolitionistData::default())
            }
            SpecializationKind::Electrician => {
                Specialization::Electrician(ElectricianData::default())
            }
            SpecializationKind::Geologist => Specialization::Geologist(GeologistData::default()),
            SpecializationKind::Arcanist => Specialization::Arcanist(ArcanistData::default()),
            SpecializationKind::Enricher => Specialization::Enricher(EnricherData::default()),
            SpecializationKind::Foreman => Specialization::Foreman(ForemanData::default()),
        }
    }

    pub fn kind(&self) -> SpecializationKind {
        match self {
            Specialization::Worker(_) => SpecializationKind::Worker,
            Specialization::Prospector(_) => SpecializationKind::Prospector,
            Specialization::Demolitionist(_) => SpecializationKind::Demolitionist,
            Specialization::Electrician(_) => SpecializationKind::Electrician,
            Specialization::Geologist(_) => SpecializationKind::Geologist,
            Specialization::Arcanist(_) => SpecializationKind::Arcanist,
            Specialization::Enricher(_) => SpecializationKind::Enricher,
            Specialization::Foreman(_) => SpecializationKind::Foreman,
        }
    }

    pub fn is_foreman(&self) -> bool {
        matches!(self, Specialization::Foreman(_))
    }

    /// Current level of a class upgrade, or `None` if it belongs to another class.
    pub fn level(&self, upgrade: ClassUpgrade) -> Option<u32> {
        let mut copy = *self;
        copy.level_mut(upgrade).map(|level| *level)
    }

    pub fn level_mut(&mut self, upgrade: ClassUpgrade) -> Option<&mut u32> {
        use ClassUpgrade as U;
        match (self, upgrade) {
            (Specialization::Worker(d), U::DoubleMin) => Some(&mut d.double_min_level),
            (Specialization::Worker(d), U::DoubleMax) => Some(&mut d.double_max_level),
            (Specialization::Prospector(d), U::CritChance) => Some(&mut d.crit_chance_level),
            (Specialization::Prospector(d), U::CritPower) => Some(&mut d.crit_power_level),
            (Specialization::Demolitionist(d), U::BlastChance) => Some(&mut d.blast_chance_level),
            (Specialization::Demolitionist(d), U::BlastLength) => Some(&mut d.blast_length_level),
            (Specialization::Electrician(d), U::Conductivity) => Some(&mut d.conductivity_level),
            (Specialization::Electrician(d), U::MetalBias) => Some(&mut d.metal_bias_level),
            (Specialization::Electrician(d), U::Efficiency) => Some(&mut d.efficiency_level),
            (Specialization::Geologist(d), U::VeinQuality) => Some(&mut d.vein_level),
            (Specialization::Arcanist(d), U::BountifulChance) => {
                Some(&mut d.bountiful_chance_level)
            }
            (Specialization::Arcanist(d), U::BountifulMin) => Some(&mut d.bountiful_min_level),
            (Specialization::Arcanist(d), U::BountifulMax) => Some(&mut d.bountiful_max_level),
            (Specialization::Enricher(d), U::EnrichChance) => Some(&mut d.enrich_chance_level),
            (Specialization::Enricher(d), U::EnrichMin) => Some(&mut d.enrich_min_level),
            (Specialization::Enricher(d), U::EnrichMax) => Some(&mut d.enrich_max_level),
            (Specialization::Foreman(d), U::Overtime) => Some(&mut d.overtime_level),
            _ => None,
        }
    }

    /// Class data as a JSON object for the save snapshot.
    pub fn data_json(&self) -> Value {
        let encoded = match self {
            Specialization::Worker(d) => serde_json::to_value(d),
            Specialization::Prospector(d) => serde_json::to_value(d),
            Specialization::Demolitionist(d) => serde_json::to_value(d),
            Specialization::Electrician(d) => serde_json::to_value(d),
            Specialization::Geologist(d) => serde_json::to_value(d),
            Specialization::Arcanist(d) => serde_json::to_value(d),
            Specialization::Enricher(d) => serde_json::to_value(d),
            Specialization::Foreman(d) => serde_json::to_value(d),
        };
        encoded.unwrap_or_default()
    }

    /// Rebuilds a specialization from an untrusted tag and data blob.
    ///
    /// Unknown or missing tags normalize to `Worker`. Only fields that belong
    /// to the normalized class are read; each is coerced to a whole number in
    /// `0..=max_level` and anything unreadable becomes 0.
    pub fn from_persisted(tag: Option<&str>, data: &Value) -> Self {
        let kind = tag
            .and_then(SpecializationKind::from_name)
            .unwrap_or_default();
        let read = |upgrade: ClassUpgrade| read_level(data, upgrade);
        match kind {
            SpecializationKind::Worker => Specialization::Worker(WorkerData {
                double_min_level: read(ClassUpgrade::DoubleMin),
                double_max_level: read(ClassUpgrade::DoubleMax),
            }),
            SpecializationKind::Prospector => Specialization::Prospector(ProspectorData {
                crit_chance_level: read(ClassUpgrade::CritChance),
                crit_power_level: read(ClassUpgrade::CritPower),
            }),
            SpecializationKind::Demolitionist => {
                Specialization::Demolitionist(DemolitionistData {
                    blast_chance_level: read(ClassUpgrade::BlastChance),
                    blast_length_level: read(ClassUpgrade::BlastLength),
                })
            }
            SpecializationKind::Electrician => Specialization::Electrician(ElectricianData {
                conductivity_level: read(ClassUpgrade::Conductivity),
                metal_bias_level: read(ClassUpgrade::MetalBias),
                efficiency_level: read(ClassUpgrade::Efficiency),
            }),
            SpecializationKind::Geologist => Specialization::Geologist(GeologistData {
                vein_level: read(ClassUpgrade::VeinQuality),
            }),
            SpecializationKind::Arcanist => Specialization::Arcanist(ArcanistData {
                bountiful_chance_level: read(ClassUpgrade::BountifulChance),
                bountiful_min_level: read(ClassUpgrade::BountifulMin),
                bountiful_max_level: read(ClassUpgrade::BountifulMax),
            }),
            SpecializationKind::Enricher => Specialization::Enricher(EnricherData {
                enrich_chance_level: read(ClassUpgrade::EnrichChance),
                enrich_min_level: read(ClassUpgrade::EnrichMin),
                enrich_max_level: read(ClassUpgrade::EnrichMax),
            }),
            SpecializationKind::Foreman => Specialization::Foreman(ForemanData {
                overtime_level: read(ClassUpgrade::Overtime),
            }),
        }
    }
}

fn read_level(data: &Value, upgrade: ClassUpgrade) -> u32 {
    data.get(upgrade.field_key())
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| (v.floor() as u64).min(upgrade.max_level() as u64) as u32)
        .unwrap_or(0)
}

/// One purchasable class upgrade track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassUpgrade {
    DoubleMin,
    DoubleMax,
    CritChance,
    CritPower,
    BlastChance,
    BlastLength,
    Conductivity,
    MetalBias,
    Efficiency,
    VeinQuality,
    BountifulChance,
    BountifulMin,
    BountifulMax,
    EnrichChance,
    EnrichMin,
    EnrichMax,
    Overtime,
}

impl ClassUpgrade {
    pub const ALL: [ClassUpgrade; 17] = [
        ClassUpgrade::DoubleMin,
        ClassUpgrade::DoubleMax,
        ClassUpgrade::CritChance,
        ClassUpgrade::CritPower,
        ClassUpgrade::BlastChance,
        ClassUpgrade::BlastLength,
        ClassUpgrade::Conductivity,
        ClassUpgrade::MetalBias,
        ClassUpgrade::Efficiency,
        ClassUpgrade::VeinQuality,
        ClassUpgrade::BountifulChance,
        ClassUpgrade::BountifulMin,
        ClassUpgrade::BountifulMax,
        ClassUpgrade::EnrichChance,
        ClassUpgrade::EnrichMin,
        ClassUpgrade::EnrichMax,
        ClassUpgrade::Overtime,
    ];

    /// The class that owns this track.
    pub fn kind(&self) -> SpecializationKind {
        use ClassUpgrade as U;
        match self {
            U::DoubleMin | U::DoubleMax => SpecializationKind::Worker,
            U::CritChance | U::CritPower => SpecializationKind::Prospector,
            U::BlastChance | U::BlastLength => SpecializationKind::Demolitionist,
            U::Conductivity | U::MetalBias | U::Efficiency => SpecializationKind::Electrician,
            U::VeinQuality => SpecializationKind::Geologist,
            U::BountifulChance | U::BountifulMin | U::BountifulMax => SpecializationKind::Arcanist,
            U::EnrichChance | U::EnrichMin | U::EnrichMax => SpecializationKind::Enricher,
            U::Overtime => SpecializationKind::Foreman,
        }
    }

    /// Tracks owned by a class, in display order.
    pub fn for_kind(kind: SpecializationKind) -> Vec<ClassUpgrade> {
        ClassUpgrade::ALL
            .iter()
            .copied()
            .filter(|u| u.kind() == kind)
            .collect()
    }

    pub fn max_level(&self) -> u32 {
        use ClassUpgrade as U;
        match self {
            U::DoubleMin | U::DoubleMax => 10,
            U::CritChance | U::CritPower => 15,
            U::BlastChance => 15,
            U::BlastLength => 8,
            U::Conductivity => 15,
            U::MetalBias | U::Efficiency => 10,
            U::VeinQuality => 12,
            U::BountifulChance | U::EnrichChance => 15,
            U::BountifulMin | U::BountifulMax | U::EnrichMin | U::EnrichMax => 5,
            U::Overtime => 20,
        }
    }

    /// Cost of level 1; later levels grow geometrically.
    pub fn base_cost(&self) -> f64 {
        use ClassUpgrade as U;
        match self {
            U::DoubleMin => 400.0,
            U::DoubleMax => 600.0,
            U::CritChance => 350.0,
            U::CritPower => 500.0,
            U::BlastChance => 400.0,
            U::BlastLength => 750.0,
            U::Conductivity => 400.0,
            U::MetalBias => 500.0,
            U::Efficiency => 650.0,
            U::VeinQuality => 600.0,
            U::BountifulChance | U::EnrichChance => 450.0,
            U::BountifulMin | U::EnrichMin => 700.0,
            U::BountifulMax | U::EnrichMax => 900.0,
            U::Overtime => 800.0,
        }
    }

    pub fn name(&self) -> &'static str {
        use ClassUpgrade as U;
        match self {
            U::DoubleMin => "Steady Hands",
            U::DoubleMax => "Second Wind",
            U::CritChance => "Keen Eye",
            U::CritPower => "Heavy Pick",
            U::BlastChance => "Short Fuse",
            U::BlastLength => "Bigger Charges",
            U::Conductivity => "Conductivity",
            U::MetalBias => "Lodestone",
            U::Efficiency => "Insulation",
            U::VeinQuality => "Vein Finder",
            U::BountifulChance => "Bounty Rite",
            U::BountifulMin => "Deep Pockets",
            U::BountifulMax => "Overflow",
            U::EnrichChance => "Gilding",
            U::EnrichMin => "Fine Polish",
            U::EnrichMax => "Lustre",
            U::Overtime => "Overtime",
        }
    }

    /// Field name inside the persisted class data object.
    pub fn field_key(&self) -> &'static str {
        use ClassUpgrade as U;
        match self {
            U::DoubleMin => "doubleMinLevel",
            U::DoubleMax => "doubleMaxLevel",
            U::CritChance => "critChanceLevel",
            U::CritPower => "critPowerLevel",
            U::BlastChance => "blastChanceLevel",
            U::BlastLength => "blastLengthLevel",
            U::Conductivity => "conductivityLevel",
            U::MetalBias => "metalBiasLevel",
            U::Efficiency => "efficiencyLevel",
            U::VeinQuality => "veinLevel",
            U::BountifulChance => "bountifulChanceLevel",
            U::BountifulMin => "bountifulMinLevel",
            U::BountifulMax => "bountifulMaxLevel",
            U::EnrichChance => "enrichChanceLevel",
            U::EnrichMin => "enrichMinLevel",
            U::EnrichMax => "enrichMaxLevel",
            U::Overtime => "overtimeLevel",
        }
    }
}
