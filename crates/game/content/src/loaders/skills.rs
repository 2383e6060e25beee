//! Skill rank table loader.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::{RankData, RankTable, SkillId, SkillRank};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Rank numbers of one skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub skill: SkillId,
    pub ranks: BTreeMap<SkillRank, RankData>,
}

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillEntry>,
}

/// Loader for skill rank tables from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load a skill catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<RankTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RankTable> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        let mut table = RankTable::new();
        for entry in catalog.skills {
            for (rank, data) in entry.ranks {
                if data.stack > data.stack_max {
                    anyhow::bail!(
                        "{} {}: stack ({}) exceeds stack_max ({})",
                        entry.skill,
                        rank,
                        data.stack,
                        data.stack_max
                    );
                }
                table.insert(entry.skill, rank, data);
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::SkillOracle;

    #[test]
    fn parses_catalog() {
        let table = SkillLoader::parse(
            r#"(
                skills: [
                    (
                        skill: Icebolt,
                        ranks: {
                            RF: (range: 1200, stack: 1, stack_max: 5, cast_time_ms: 1000, var1: 10.0, var2: 20.0),
                        },
                    ),
                ],
            )"#,
        )
        .unwrap();

        let data = table.rank_data(SkillId::Icebolt, SkillRank::RF).unwrap();
        assert_eq!(data.range, 1200);
        assert_eq!(data.var2, 20.0);
        assert_eq!(data.var3, 0.0);
    }

    #[test]
    fn rejects_stack_above_max() {
        let result = SkillLoader::parse(
            r#"(skills: [(skill: Icebolt, ranks: { RF: (stack: 6, stack_max: 5) })])"#,
        );
        assert!(result.is_err());
    }
}
