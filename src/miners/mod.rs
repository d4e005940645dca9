//! Idle miners: classes, derived stats, targeting and the roster.

pub mod roster;
pub mod specialization;
pub mod stats;
pub mod targeting;

pub use roster::{Roster, Unit};
pub use specialization::{ClassUpgrade, Specialization, SpecializationKind};
pub use stats::{Aura, ChainProfile, EnchantAbility, MinerStats};
pub use targeting::{choose_target_tile, Targeting};
