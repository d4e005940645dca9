//! Derived miner stats: trigger rate, reach, class abilities and the
//! Foreman aura.
//!
//! Nothing here mutates state. [`MinerStats::resolve`] is the one entry point
//! the scheduler uses; it folds the incoming aura into every stat so callers
//! never have to remember to apply it.

use crate::core::constants::*;
use crate::map::Enchantment;
use crate::miners::roster::{Roster, Unit};
use crate::miners::specialization::Specialization;
use rand::Rng;

/// Multipliers a Foreman grants to miners in its range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aura {
    pub speed_multiplier: f64,
    pub range_multiplier: f64,
    pub ability_chance_multiplier: f64,
}

impl Aura {
    pub const NEUTRAL: Aura = Aura {
        speed_multiplier: 1.0,
        range_multiplier: 1.0,
        ability_chance_multiplier: 1.0,
    };
}

impl Default for Aura {
    fn default() -> Self {
        Aura::NEUTRAL
    }
}

/// Clicks per second before any aura. Foremen ignore speed upgrades.
pub fn base_clicks_per_second(unit: &Unit) -> f64 {
    let base = 1.0 / TRIGGER_INTERVAL_SECONDS;
    if unit.specialization.is_foreman() {
        base
    } else {
        base + unit.speed_level as f64 * SPEED_BONUS_PER_LEVEL
    }
}

pub fn clicks_per_second(unit: &Unit, aura: &Aura) -> f64 {
    base_clicks_per_second(unit) * aura.speed_multiplier
}

/// Seconds between triggers; infinite for a miner that never fires.
pub fn cooldown_seconds(clicks_per_second: f64) -> f64 {
    if clicks_per_second.is_finite() && clicks_per_second > 0.0 {
        1.0 / clicks_per_second
    } else {
        f64::INFINITY
    }
}

pub fn effect_radius(unit: &Unit, aura: &Aura) -> f64 {
    let upgrades = 1.0 + unit.radius_level as f64 * RADIUS_BONUS_PER_LEVEL;
    BASE_RADIUS_PX * upgrades * aura.range_multiplier
}

/// An aura on offer and how strong it is when several Foremen overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForemanAura {
    pub strength: f64,
    pub aura: Aura,
}

/// The aura a unit projects, or `None` for non-Foremen.
pub fn foreman_aura(unit: &Unit) -> Option<ForemanAura> {
    let Specialization::Foreman(data) = unit.specialization else {
        return None;
    };
    let overtime = 1.0 + (data.overtime_level as f64 * OVERTIME_PER_LEVEL).min(OVERTIME_BONUS_CAP);
    let motivation = 1.0 + unit.speed_level as f64 * MOTIVATION_PER_SPEED_LEVEL;
    let autonomy = 1.0 + unit.radius_level as f64 * AUTONOMY_PER_RADIUS_LEVEL;
    Some(ForemanAura {
        strength: overtime
            + motivation
            + autonomy
            + data.overtime_level as f64 * FOREMAN_TIE_BREAK,
        aura: Aura {
            speed_multiplier: overtime * motivation,
            range_multiplier: autonomy,
            ability_chance_multiplier: motivation,
        },
    })
}

/// Aura received by the miner at `index`: the single strongest Foreman whose
/// own radius reaches it. Foremen never receive an aura.
pub fn incoming_aura(roster: &Roster, index: usize) -> Aura {
    let Some(recipient) = roster.get(index) else {
        return Aura::NEUTRAL;
    };
    if recipient.specialization.is_foreman() {
        return Aura::NEUTRAL;
    }
    let mut best: Option<ForemanAura> = None;
    for (i, unit) in roster.iter().enumerate() {
        if i == index {
            continue;
        }
        let Some(offer) = foreman_aura(unit) else {
            continue;
        };
        let reach = effect_radius(unit, &Aura::NEUTRAL);
        if unit.position.distance(&recipient.position) > reach {
            continue;
        }
        if best.map(|b| offer.strength > b.strength).unwrap_or(true) {
            best = Some(offer);
        }
    }
    best.map(|b| b.aura).unwrap_or(Aura::NEUTRAL)
}

/// Chain behaviour shared by blasts and arcs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainProfile {
    pub chance: f64,
    pub length: u32,
    /// Probability of preferring a metal neighbour at each hop.
    pub metal_bias: f64,
    /// Probability of continuing past each hop after the first.
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnchantAbility {
    Bountiful {
        chance: f64,
        min_units: u32,
        max_units: u32,
    },
    Enriched {
        chance: f64,
        min_multiplier: f64,
        max_multiplier: f64,
    },
}

impl EnchantAbility {
    pub fn chance(&self) -> f64 {
        match self {
            EnchantAbility::Bountiful { chance, .. } | EnchantAbility::Enriched { chance, .. } => {
                *chance
            }
        }
    }

    /// Rolls the ability. A failed roll yields `Enchantment::None`.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> Enchantment {
        if rng.gen::<f64>() >= self.chance() {
            return Enchantment::None;
        }
        match *self {
            EnchantAbility::Bountiful {
                min_units,
                max_units,
                ..
            } => Enchantment::Bountiful {
                extra_units: rng.gen_range(min_units..=max_units.max(min_units)),
            },
            EnchantAbility::Enriched {
                min_multiplier,
                max_multiplier,
                ..
            } => Enchantment::Enriched {
                multiplier: uniform(min_multiplier, max_multiplier, rng),
            },
        }
    }
}

fn uniform<R: Rng>(min: f64, max: f64, rng: &mut R) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

fn ability_chance(base: f64, per_level: f64, level: u32, cap: f64, aura: &Aura) -> f64 {
    ((base + per_level * level as f64) * aura.ability_chance_multiplier).clamp(0.0, cap.min(1.0))
}

/// Everything the scheduler needs to know about one miner this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinerStats {
    pub clicks_per_second: f64,
    pub cooldown_seconds: f64,
    pub effect_radius: f64,
    pub aura: Aura,
    /// Double activation roll range, as extra activations.
    pub double_min: f64,
    pub double_max: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub chain: Option<ChainProfile>,
    pub vein_multiplier: f64,
    pub enchant: Option<EnchantAbility>,
}

impl MinerStats {
    /// Stats of a classless click: the player's own, or an unupgraded miner.
    pub fn neutral() -> Self {
        let cps = 1.0 / TRIGGER_INTERVAL_SECONDS;
        Self {
            clicks_per_second: cps,
            cooldown_seconds: cooldown_seconds(cps),
            effect_radius: BASE_RADIUS_PX,
            aura: Aura::NEUTRAL,
            double_min: 0.0,
            double_max: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 1.0,
            chain: None,
            vein_multiplier: 1.0,
            enchant: None,
        }
    }

    pub fn for_unit(unit: &Unit, aura: Aura) -> Self {
        let cps = clicks_per_second(unit, &aura);
        let mut stats = Self {
            clicks_per_second: cps,
            cooldown_seconds: cooldown_seconds(cps),
            effect_radius: effect_radius(unit, &aura),
            aura,
            ..Self::neutral()
        };

        match unit.specialization {
            Specialization::Worker(d) => {
                stats.double_min = d.double_min_level as f64 * DOUBLE_MIN_PERCENT_PER_LEVEL / 100.0;
                let spread = d.double_max_level as f64 * DOUBLE_MAX_PERCENT_PER_LEVEL / 100.0;
                stats.double_max = stats.double_min + spread;
            }
            Specialization::Prospector(d) => {
                stats.crit_chance = ability_chance(
                    CRIT_BASE_CHANCE,
                    CRIT_CHANCE_PER_LEVEL,
                    d.crit_chance_level,
                    CRIT_CHANCE_CAP,
                    &aura,
                );
                stats.crit_multiplier =
                    CRIT_BASE_MULTIPLIER + d.crit_power_level as f64 * CRIT_MULTIPLIER_PER_LEVEL;
            }
            Specialization::Demolitionist(d) => {
                stats.chain = Some(ChainProfile {
                    chance: ability_chance(
                        BLAST_BASE_CHANCE,
                        BLAST_CHANCE_PER_LEVEL,
                        d.blast_chance_level,
                        BLAST_CHANCE_CAP,
                        &aura,
                    ),
                    length: BLAST_BASE_LENGTH + d.blast_length_level,
                    metal_bias: 0.0,
                    efficiency: 1.0,
                });
            }
            Specialization::Electrician(d) => {
                stats.chain = Some(ChainProfile {
                    chance: ability_chance(
                        ARC_BASE_CHANCE,
                        ARC_CHANCE_PER_LEVEL,
                        d.conductivity_level,
                        ARC_CHANCE_CAP,
                        &aura,
                    ),
                    length: ARC_CHAIN_LENGTH,
                    metal_bias: (METAL_BIAS_BASE + METAL_BIAS_PER_LEVEL * d.metal_bias_level as f64)
                        .min(METAL_BIAS_CAP),
                    efficiency: (ELECTRIC_EFFICIENCY_BASE
                        + ELECTRIC_EFFICIENCY_PER_LEVEL * d.efficiency_level as f64)
                        .min(ELECTRIC_EFFICIENCY_CAP),
                });
            }
            Specialization::Geologist(d) => {
                stats.vein_multiplier = 1.0 + d.vein_level as f64 * VEIN_QUALITY_PER_LEVEL;
            }
            Specialization::Arcanist(d) => {
                let min_units = BOUNTIFUL_BASE_MIN_UNITS + d.bountiful_min_level;
                stats.enchant = Some(EnchantAbility::Bountiful {
                    chance: ability_chance(
                        BOUNTIFUL_BASE_CHANCE,
                        BOUNTIFUL_CHANCE_PER_LEVEL,
                        d.bountiful_chance_level,
                        BOUNTIFUL_CHANCE_CAP,
                        &aura,
                    ),
                    min_units,
                    max_units: min_units + 1 + d.bountiful_max_level,
                });
            }
            Specialization::Enricher(d) => {
                let min_multiplier =
                    ENRICH_BASE_MIN_MULTIPLIER + d.enrich_min_level as f64 * ENRICH_MIN_PER_LEVEL;
                stats.enchant = Some(EnchantAbility::Enriched {
                    chance: ability_chance(
                        ENRICH_BASE_CHANCE,
                        ENRICH_CHANCE_PER_LEVEL,
                        d.enrich_chance_level,
                        ENRICH_CHANCE_CAP,
                        &aura,
                    ),
                    min_multiplier,
                    max_multiplier: min_multiplier
                        + ENRICH_SPREAD_BASE
                        + d.enrich_max_level as f64 * ENRICH_MAX_PER_LEVEL,
                });
            }
            Specialization::Foreman(_) => {}
        }
        stats
    }

    /// Stats for roster slot `index` with its incoming aura applied.
    pub fn resolve(roster: &Roster, index: usize) -> Option<Self> {
        let unit = roster.get(index)?;
        Some(Self::for_unit(unit, incoming_aura(roster, index)))
    }

    /// Draws the double activation roll; feed it to
    /// `get_activation_count_from_roll`.
    pub fn roll_double_activation<R: Rng>(&self, rng: &mut R) -> f64 {
        uniform(self.double_min, self.double_max, rng)
    }

    /// Mean extra activations per trigger.
    pub fn expected_double_activations(&self) -> f64 {
        (self.double_min + self.double_max) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Point;
    use crate::miners::specialization::{ClassUpgrade, SpecializationKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit_of(kind: SpecializationKind) -> Unit {
        let mut unit = Unit::new(Point::new(60.0, 60.0));
        unit.specialization_unlocked = true;
        unit.specialization = Specialization::new(kind);
        unit
    }

    fn set_level(unit: &mut Unit, upgrade: ClassUpgrade, level: u32) {
        *unit.specialization.level_mut(upgrade).unwrap() = level;
    }

    #[test]
    fn test_cooldown_base_and_after_speed_upgrade() {
        let mut unit = Unit::new(Point::default());
        let stats = MinerStats::for_unit(&unit, Aura::NEUTRAL);
        assert!((stats.cooldown_seconds - 5.0).abs() < 1e-9);

        unit.speed_level = 1;
        let stats = MinerStats::for_unit(&unit, Aura::NEUTRAL);
        assert!((stats.cooldown_seconds - 1.0 / (1.0 / 5.0 + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_cooldown_of_zero_rate_is_infinite() {
        assert!(cooldown_seconds(0.0).is_infinite());
        assert!(cooldown_seconds(f64::NAN).is_infinite());
        assert!(cooldown_seconds(-1.0).is_infinite());
    }

    #[test]
    fn test_foreman_ignores_speed_upgrades_for_own_rate() {
        let mut foreman = unit_of(SpecializationKind::Foreman);
        foreman.speed_level = 10;
        assert!((base_clicks_per_second(&foreman) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_radius_grows_with_level() {
        let mut unit = Unit::new(Point::default());
        assert_eq!(effect_radius(&unit, &Aura::NEUTRAL), BASE_RADIUS_PX);
        unit.radius_level = 5;
        assert!((effect_radius(&unit, &Aura::NEUTRAL) - BASE_RADIUS_PX * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_foreman_buffs_worker_but_not_other_foreman() {
        let mut roster = Roster::new();
        roster.resize(3, 3);
        for unit in roster.iter_mut() {
            unit.position = Point::new(60.0, 60.0);
        }
        {
            let foreman = roster.get_mut(0).unwrap();
            foreman.specialization = Specialization::new(SpecializationKind::Foreman);
            set_level(foreman, ClassUpgrade::Overtime, 10);
        }
        roster.get_mut(1).unwrap().specialization =
            Specialization::new(SpecializationKind::Foreman);

        let worker_aura = incoming_aura(&roster, 2);
        assert!((worker_aura.speed_multiplier - 1.5).abs() < 1e-9);
        let worker = MinerStats::resolve(&roster, 2).unwrap();
        assert!((worker.clicks_per_second - 0.3).abs() < 1e-9);

        assert_eq!(incoming_aura(&roster, 1), Aura::NEUTRAL);
        assert_eq!(incoming_aura(&roster, 0), Aura::NEUTRAL);
    }

    #[test]
    fn test_aura_requires_range() {
        let mut roster = Roster::new();
        roster.resize(2, 5);
        roster.get_mut(0).unwrap().specialization =
            Specialization::new(SpecializationKind::Foreman);
        roster.get_mut(0).unwrap().position = Point::new(0.0, 0.0);
        roster.get_mut(1).unwrap().position = Point::new(BASE_RADIUS_PX + 1.0, 0.0);
        assert_eq!(incoming_aura(&roster, 1), Aura::NEUTRAL);

        roster.get_mut(1).unwrap().position = Point::new(BASE_RADIUS_PX, 0.0);
        assert_ne!(incoming_aura(&roster, 1), Aura::NEUTRAL);
    }

    #[test]
    fn test_strongest_foreman_wins_without_stacking() {
        let mut roster = Roster::new();
        roster.resize(3, 3);
        for unit in roster.iter_mut() {
            unit.position = Point::new(60.0, 60.0);
        }
        for (i, level) in [(0, 4), (1, 8)] {
            let foreman = roster.get_mut(i).unwrap();
            foreman.specialization = Specialization::new(SpecializationKind::Foreman);
            set_level(foreman, ClassUpgrade::Overtime, level);
        }
        let aura = incoming_aura(&roster, 2);
        assert!((aura.speed_multiplier - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_prefers_overtime() {
        // 1.5 + 1.0 + 1.0 against 1.0 + 1.5 + 1.0: equal until the tie-break.
        let mut a = unit_of(SpecializationKind::Foreman);
        set_level(&mut a, ClassUpgrade::Overtime, 10);
        let mut b = unit_of(SpecializationKind::Foreman);
        b.speed_level = 25;
        let sa = foreman_aura(&a).unwrap().strength;
        let sb = foreman_aura(&b).unwrap().strength;
        assert!(sa > sb);
        assert!((sa - sb - 10.0 * FOREMAN_TIE_BREAK).abs() < 1e-9);
    }

    #[test]
    fn test_ability_chances_are_capped() {
        let mut prospector = unit_of(SpecializationKind::Prospector);
        set_level(&mut prospector, ClassUpgrade::CritChance, 15);
        set_level(&mut prospector, ClassUpgrade::CritPower, 4);
        let boosted = Aura {
            ability_chance_multiplier: 3.0,
            ..Aura::NEUTRAL
        };
        let stats = MinerStats::for_unit(&prospector, boosted);
        assert_eq!(stats.crit_chance, CRIT_CHANCE_CAP);
        assert!((stats.crit_multiplier - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_owning_classes_are_neutral() {
        let worker = MinerStats::for_unit(&Unit::new(Point::default()), Aura::NEUTRAL);
        assert_eq!(worker.crit_chance, 0.0);
        assert_eq!(worker.crit_multiplier, 1.0);
        assert!(worker.chain.is_none());
        assert_eq!(worker.vein_multiplier, 1.0);
        assert!(worker.enchant.is_none());
        assert_eq!(worker.double_max, 0.0);
    }

    #[test]
    fn test_class_derived_values() {
        let mut demo = unit_of(SpecializationKind::Demolitionist);
        set_level(&mut demo, ClassUpgrade::BlastLength, 3);
        let chain = MinerStats::for_unit(&demo, Aura::NEUTRAL).chain.unwrap();
        assert_eq!(chain.length, 5);
        assert_eq!(chain.efficiency, 1.0);
        assert_eq!(chain.metal_bias, 0.0);

        let mut elec = unit_of(SpecializationKind::Electrician);
        set_level(&mut elec, ClassUpgrade::MetalBias, 10);
        let chain = MinerStats::for_unit(&elec, Aura::NEUTRAL).chain.unwrap();
        assert_eq!(chain.length, ARC_CHAIN_LENGTH);
        assert_eq!(chain.metal_bias, METAL_BIAS_CAP);
        assert!((chain.efficiency - ELECTRIC_EFFICIENCY_BASE).abs() < 1e-9);

        let mut geo = unit_of(SpecializationKind::Geologist);
        assert_eq!(MinerStats::for_unit(&geo, Aura::NEUTRAL).vein_multiplier, 1.0);
        set_level(&mut geo, ClassUpgrade::VeinQuality, 1);
        assert_eq!(MinerStats::for_unit(&geo, Aura::NEUTRAL).vein_multiplier, 1.25);

        let mut worker = unit_of(SpecializationKind::Worker);
        set_level(&mut worker, ClassUpgrade::DoubleMin, 2);
        set_level(&mut worker, ClassUpgrade::DoubleMax, 2);
        let stats = MinerStats::for_unit(&worker, Aura::NEUTRAL);
        assert!((stats.double_min - 0.2).abs() < 1e-9);
        assert!((stats.double_max - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_enchant_rolls_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let bountiful = EnchantAbility::Bountiful {
            chance: 1.0,
            min_units: 2,
            max_units: 4,
        };
        let enriched = EnchantAbility::Enriched {
            chance: 1.0,
            min_multiplier: 1.5,
            max_multiplier: 2.0,
        };
        for _ in 0..200 {
            match bountiful.roll(&mut rng) {
                Enchantment::Bountiful { extra_units } => assert!((2..=4).contains(&extra_units)),
                other => panic!("unexpected {:?}", other),
            }
            match enriched.roll(&mut rng) {
                Enchantment::Enriched { multiplier } => {
                    assert!((1.5..=2.0).contains(&multiplier))
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        let never = EnchantAbility::Bountiful {
            chance: 0.0,
            min_units: 1,
            max_units: 2,
        };
        assert!(never.roll(&mut rng).is_none());
    }
}
