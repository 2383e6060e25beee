//! Content loaders for reading game data from files.
//!
//! This module provides loaders that convert RON/TOML files into the tables
//! and specs the runtime needs.

pub mod config;
pub mod factory;
pub mod region;
pub mod skills;
pub mod training;

pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use region::{BehaviorSpec, CreatureSpec, PropSpec, RegionLoader, RegionSpec};
pub use skills::SkillLoader;
pub use training::TrainingLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
