//! Content factory for building oracles and regions from data files.

use std::path::{Path, PathBuf};

use game_core::{CombatConfig, RankTable, TrainingRegistry};

use crate::loaders::{
    ConfigLoader, LoadResult, RegionLoader, RegionSpec, SkillLoader, TrainingLoader,
};

/// Everything the runtime needs to boot.
#[derive(Debug, Clone)]
pub struct Content {
    pub config: CombatConfig,
    pub ranks: RankTable,
    pub training: TrainingRegistry,
    pub regions: Vec<RegionSpec>,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── skills.ron
/// ├── training/
/// │   └── icebolt.ron
/// └── regions/
///     └── alby_dungeon.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load skill rank tables from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<RankTable> {
        let path = self.data_dir.join("skills.ron");
        SkillLoader::load(&path)
    }

    /// Load training tables from `training/`.
    ///
    /// Falls back to the built-in tables when the directory does not exist.
    pub fn load_training(&self) -> LoadResult<TrainingRegistry> {
        let dir = self.data_dir.join("training");
        if !dir.is_dir() {
            return Ok(TrainingRegistry::with_defaults());
        }
        TrainingLoader::load_dir(&dir)
    }

    /// Load region layouts from `regions/`.
    pub fn load_regions(&self) -> LoadResult<Vec<RegionSpec>> {
        let dir = self.data_dir.join("regions");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        RegionLoader::load_dir(&dir)
    }

    pub fn load_all(&self) -> LoadResult<Content> {
        Ok(Content {
            config: self.load_config()?,
            ranks: self.load_skills()?,
            training: self.load_training()?,
            regions: self.load_regions()?,
        })
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{SkillId, SkillOracle, SkillRank};

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "knockback_increment = 50\n").unwrap();
        std::fs::write(
            dir.path().join("skills.ron"),
            "(skills: [(skill: Icebolt, ranks: { RF: (range: 1200, stack: 1, stack_max: 5) })])",
        )
        .unwrap();

        let content = ContentFactory::new(dir.path()).load_all().unwrap();
        assert_eq!(content.config.knockback_increment, 50);
        assert!(content.ranks.rank_data(SkillId::Icebolt, SkillRank::RF).is_some());
        assert!(content.training.table(SkillId::Icebolt).is_some());
        assert!(content.regions.is_empty());
    }

    #[test]
    fn training_directory_replaces_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let training = dir.path().join("training");
        std::fs::create_dir(&training).unwrap();
        std::fs::write(
            training.join("firebolt.ron"),
            "(skill: Firebolt, rules: [(ranks: (from: RF, to: RF), rating: None, requires: Always, condition: 1)])",
        )
        .unwrap();
        std::fs::write(training.join("notes.txt"), "ignored").unwrap();

        let registry = ContentFactory::new(dir.path()).load_training().unwrap();
        assert!(registry.table(SkillId::Firebolt).is_some());
        assert!(registry.table(SkillId::Icebolt).is_none());
    }

    #[test]
    fn missing_skill_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentFactory::new(dir.path()).load_skills().is_err());
    }
}
