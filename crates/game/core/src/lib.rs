//! Deterministic combat rules and world state for the channel server.
//!
//! `game-core` validates skill and prop requests against region state, runs
//! damage through the mitigation pipeline, mutates the creatures involved and
//! seals each exchange into a [`FinalizedPack`]. It performs no I/O and never
//! logs; observable side effects are returned as [`Broadcast`] values and the
//! runtime decides how to publish them.
pub mod combat;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod skill;
pub mod state;
pub mod training;

pub use combat::{
    AttackerAction, AttackerOptions, CombatAction, CombatActionPack, CombatActionType,
    FinalizedPack, HitOutcome, MitigationContext, MitigationPipeline, MitigationStage, PackId,
    TargetAction, TargetOptions,
};
pub use config::CombatConfig;
pub use effect::{Broadcast, CastingStage, Outbox};
pub use env::{FixedRng, PcgRng, RankTable, RngOracle, SkillOracle, compute_seed};
pub use error::{ErrorSeverity, GameError};
pub use skill::{
    BoltParams, BoltSkill, RankData, Skill, SkillContext, SkillError, SkillHandler, SkillId,
    SkillPhase, SkillRank, SkillRegistry, SkillSet,
};
pub use state::{
    CombatStats, Conditions, Creature, DamageReport, EntityId, Item, Meter, Position, Prop,
    PropBehavior, Region, RegionId, SwitchBehavior,
};
pub use training::{
    Fact, PowerRating, RankSpan, TrainingAward, TrainingRegistry, TrainingRule, TrainingTable,
};
