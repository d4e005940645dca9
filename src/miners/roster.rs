//! The ordered collection of owned miners.

use crate::core::constants::{MAX_MINERS, TRIGGER_INTERVAL_SECONDS};
use crate::map::geometry::ring_position;
use crate::map::Point;
use crate::miners::specialization::{Specialization, SpecializationKind};
use crate::miners::targeting::Targeting;

/// One owned miner. Its trigger cooldown and position live with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub speed_level: u32,
    pub radius_level: u32,
    pub specialization_unlocked: bool,
    pub specialization: Specialization,
    pub targeting: Targeting,
    pub position: Point,
    /// Seconds until the next trigger. May go slightly negative inside a tick.
    pub cooldown: f64,
}

impl Unit {
    pub fn new(position: Point) -> Self {
        Self {
            speed_level: 0,
            radius_level: 0,
            specialization_unlocked: false,
            specialization: Specialization::default(),
            targeting: Targeting::default(),
            position,
            cooldown: TRIGGER_INTERVAL_SECONDS,
        }
    }

    pub fn kind(&self) -> SpecializationKind {
        self.specialization.kind()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    units: Vec<Unit>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from restored units, dropping any beyond the cap.
    pub fn from_units(mut units: Vec<Unit>) -> Self {
        units.truncate(MAX_MINERS);
        Self { units }
    }

    /// Grows or shrinks the roster to `count` (capped). New miners are
    /// placed on the default ring for the new roster size. Returns the
    /// resulting length.
    pub fn resize(&mut self, count: usize, side: usize) -> usize {
        let count = count.min(MAX_MINERS);
        if count < self.units.len() {
            self.units.truncate(count);
        } else {
            let start = self.units.len();
            for slot in start..count {
                self.units.push(Unit::new(ring_position(slot, count, side)));
            }
        }
        self.units.len()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.units.len() >= MAX_MINERS
    }

    pub fn get(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Unit> {
        self.units.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }
}
