//! Skill rank oracle.

use std::collections::BTreeMap;

use crate::skill::{RankData, Skill, SkillId, SkillRank};

/// Oracle providing per-rank skill numbers.
///
/// Rank tables are loaded from RON data files and are read-only at runtime.
pub trait SkillOracle: Send + Sync {
    fn rank_data(&self, skill: SkillId, rank: SkillRank) -> Option<RankData>;

    /// Builds a freshly learned skill at `rank`.
    fn learn(&self, skill: SkillId, rank: SkillRank) -> Option<Skill> {
        self.rank_data(skill, rank)
            .map(|data| Skill::new(skill, rank, data))
    }
}

/// In-memory rank table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankTable {
    ranks: BTreeMap<SkillId, BTreeMap<SkillRank, RankData>>,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill: SkillId, rank: SkillRank, data: RankData) {
        self.ranks.entry(skill).or_default().insert(rank, data);
    }

    #[must_use]
    pub fn with_rank(mut self, skill: SkillId, rank: SkillRank, data: RankData) -> Self {
        self.insert(skill, rank, data);
        self
    }

    pub fn skills(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.ranks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SkillOracle for RankTable {
    fn rank_data(&self, skill: SkillId, rank: SkillRank) -> Option<RankData> {
        self.ranks.get(&skill)?.get(&rank).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learn_uses_rank_data() {
        let table = RankTable::new().with_rank(
            SkillId::Icebolt,
            SkillRank::RF,
            RankData {
                range: 1200,
                stack_max: 5,
                ..RankData::default()
            },
        );

        let skill = table.learn(SkillId::Icebolt, SkillRank::RF).unwrap();
        assert_eq!(skill.rank_data.range, 1200);
        assert_eq!(skill.stacks(), 0);
        assert!(table.learn(SkillId::Icebolt, SkillRank::RE).is_none());
        assert!(table.learn(SkillId::Firebolt, SkillRank::RF).is_none());
        assert_eq!(table.len(), 1);
    }
}
