//! Combat configuration loader.

use std::path::Path;

use game_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("knockdown_threshold = 120").unwrap();
        assert_eq!(config.knockdown_threshold, 120);
        assert_eq!(
            config.knockback_increment,
            CombatConfig::DEFAULT_KNOCKBACK_INCREMENT
        );
        assert_eq!(
            config.prop_interaction_range,
            CombatConfig::DEFAULT_PROP_INTERACTION_RANGE
        );
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(ConfigLoader::parse("knockdown_threshold = \"lots\"").is_err());
    }
}
