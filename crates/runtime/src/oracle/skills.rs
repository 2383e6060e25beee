use game_core::{RankData, RankTable, SkillId, SkillOracle, SkillRank};

/// Rank numbers loaded from content.
#[derive(Debug, Clone, Default)]
pub struct SkillOracleImpl {
    table: RankTable,
}

impl SkillOracleImpl {
    pub fn new(table: RankTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RankTable {
        &self.table
    }
}

impl SkillOracle for SkillOracleImpl {
    fn rank_data(&self, skill: SkillId, rank: SkillRank) -> Option<RankData> {
        self.table.rank_data(skill, rank)
    }
}
