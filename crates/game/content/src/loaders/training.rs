//! Training table loader.
//!
//! Loads every `*.ron` file of a directory as one [`TrainingTable`].

use std::path::Path;

use game_core::{TrainingRegistry, TrainingTable};

use crate::loaders::{LoadResult, read_file};

/// Loader for training tables from RON files.
pub struct TrainingLoader;

impl TrainingLoader {
    /// Load a single training table.
    pub fn load(path: &Path) -> LoadResult<TrainingTable> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse training RON at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<TrainingTable> {
        let table: TrainingTable = ron::from_str(content)?;
        if let Some(rule) = table.rules.iter().find(|rule| rule.condition == 0) {
            anyhow::bail!("training conditions are 1-based, found {:?}", rule);
        }
        Ok(table)
    }

    /// Load every table in `dir`, in file-name order.
    ///
    /// A later file for the same skill replaces an earlier one.
    pub fn load_dir(dir: &Path) -> LoadResult<TrainingRegistry> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            anyhow::anyhow!("Failed to read training directory {}: {}", dir.display(), e)
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = TrainingRegistry::new();
        for path in paths {
            registry.insert(Self::load(&path)?);
        }

        Ok(registry)
    }
}
