//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Combat tuning (data-driven via TOML)
//! - Skill rank tables (data-driven via RON)
//! - Training tables (data-driven via RON, one file per skill)
//! - Region layouts: props and creatures placed at startup (RON)
//!
//! Content is consumed by runtime oracles and region workers; it never appears
//! in combat logic directly.
//!
//! All loaders use game-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BehaviorSpec, ConfigLoader, Content, ContentFactory, CreatureSpec, PropSpec, RegionLoader,
    RegionSpec, SkillLoader, TrainingLoader,
};
