//! Combat resolution building blocks.
//!
//! - [`action`]: attacker/target descriptors and their option flags
//! - [`mitigation`]: ordered damage-rewriting stages
//! - [`pack`]: grouping, ordering and sealing of one exchange
//! - [`damage`] / [`outcome`]: damage rolls and knockback classification
//!
//! Skill handlers (see [`crate::skill`]) orchestrate these for a single use.

pub mod action;
pub mod damage;
pub mod mitigation;
pub mod outcome;
pub mod pack;

pub use action::{
    AttackerAction, AttackerOptions, CombatAction, CombatActionType, TargetAction, TargetOptions,
};
pub use damage::magic_damage;
pub use mitigation::{
    DefenseStage, MagicDefenseStage, ManaShieldStage, MitigationContext, MitigationPipeline,
    MitigationStage,
};
pub use outcome::{HitOutcome, resolve_hit_outcome};
pub use pack::{CombatActionPack, FinalizedPack, PackError, PackId};
