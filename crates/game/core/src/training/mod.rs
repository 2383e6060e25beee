//! Skill training: turns finalized exchanges into progress on training
//! conditions.
//!
//! Each trainable skill has a [`TrainingTable`] of rules. A rule matches on the
//! attacker's rank, the target's [`PowerRating`] relative to the attacker, and
//! one [`Fact`] about the exchange. Every matching rule trains its condition
//! once.
mod icebolt;

pub use icebolt::ICEBOLT_RULES;

use std::collections::BTreeMap;

use crate::combat::{FinalizedPack, TargetAction, TargetOptions};
use crate::skill::{SkillId, SkillRank};
use crate::state::{Creature, EntityId, Region};

/// Strength of a target relative to its attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerRating {
    Weak,
    Normal,
    Strong,
    Awful,
    Boss,
}

impl PowerRating {
    /// Rates `target` from `attacker`'s point of view.
    ///
    /// Bosses always rate as [`PowerRating::Boss`]; otherwise the ratio of
    /// combat power decides (`< 0.8` weak, `<= 1.2` normal, `<= 1.5` strong,
    /// `<= 2.0` awful, above that boss).
    pub fn rate(attacker: &Creature, target: &Creature) -> Self {
        if target.is_boss {
            return Self::Boss;
        }

        let attacker_power = attacker.stats.combat_power;
        if attacker_power <= 0.0 {
            return Self::Normal;
        }

        let ratio = target.stats.combat_power / attacker_power;
        if ratio < 0.8 {
            Self::Weak
        } else if ratio <= 1.2 {
            Self::Normal
        } else if ratio <= 1.5 {
            Self::Strong
        } else if ratio <= 2.0 {
            Self::Awful
        } else {
            Self::Boss
        }
    }
}

/// What has to be true about the exchange for a rule to fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fact {
    /// Any hit counts.
    Always,
    /// The target went down: a knockdown, a finishing knockdown, or the hit
    /// that pushed its knockback counter over the threshold.
    KnockedDown,
    /// The target was dead when the exchange was finalized.
    TargetDead,
}

impl Fact {
    pub fn holds(self, hit: &TargetAction) -> bool {
        match self {
            Self::Always => true,
            Self::KnockedDown => hit.is_knocked_down() || hit.has(TargetOptions::KNOCK_BACK),
            Self::TargetDead => hit.target_dead,
        }
    }
}

/// Inclusive span of ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankSpan {
    pub from: SkillRank,
    pub to: SkillRank,
}

impl RankSpan {
    pub const fn new(from: SkillRank, to: SkillRank) -> Self {
        Self { from, to }
    }

    pub const fn only(rank: SkillRank) -> Self {
        Self::new(rank, rank)
    }

    pub fn contains(&self, rank: SkillRank) -> bool {
        self.from <= rank && rank <= self.to
    }
}

/// One row of a training table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainingRule {
    pub ranks: RankSpan,
    /// Required rating, `None` for any.
    pub rating: Option<PowerRating>,
    pub requires: Fact,
    /// 1-based training condition to advance.
    pub condition: u8,
}

impl TrainingRule {
    pub const fn new(
        ranks: RankSpan,
        rating: Option<PowerRating>,
        requires: Fact,
        condition: u8,
    ) -> Self {
        Self {
            ranks,
            rating,
            requires,
            condition,
        }
    }

    pub fn matches(&self, rank: SkillRank, rating: PowerRating, hit: &TargetAction) -> bool {
        self.ranks.contains(rank)
            && self.rating.is_none_or(|required| required == rating)
            && self.requires.holds(hit)
    }
}

/// Training rules for one skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainingTable {
    pub skill: SkillId,
    pub rules: Vec<TrainingRule>,
}

impl TrainingTable {
    pub fn new(skill: SkillId, rules: Vec<TrainingRule>) -> Self {
        Self { skill, rules }
    }

    pub fn icebolt() -> Self {
        Self::new(SkillId::Icebolt, ICEBOLT_RULES.to_vec())
    }

    /// Conditions earned by `hit`, in table order.
    pub fn conditions<'a>(
        &'a self,
        rank: SkillRank,
        rating: PowerRating,
        hit: &'a TargetAction,
    ) -> impl Iterator<Item = u8> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.matches(rank, rating, hit))
            .map(|rule| rule.condition)
    }
}

/// Progress recorded for one condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainingAward {
    pub actor: EntityId,
    pub skill: SkillId,
    pub rank: SkillRank,
    pub condition: u8,
    /// Count for the condition after this award.
    pub count: u16,
}

/// Training tables keyed by skill.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingRegistry {
    tables: BTreeMap<SkillId, TrainingTable>,
}

impl TrainingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in tables.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(TrainingTable::icebolt());
        registry
    }

    pub fn insert(&mut self, table: TrainingTable) -> Option<TrainingTable> {
        self.tables.insert(table.skill, table)
    }

    pub fn table(&self, skill: SkillId) -> Option<&TrainingTable> {
        self.tables.get(&skill)
    }

    /// Trains the attacker of every target descriptor in `pack`.
    ///
    /// Exchanges for skills without a table, attackers that no longer exist or
    /// have not learned the skill, and targets that have left the region are
    /// skipped silently.
    pub fn evaluate(&self, pack: &FinalizedPack, region: &mut Region) -> Vec<TrainingAward> {
        let mut awards = Vec::new();

        for hit in pack.target_actions() {
            let Some(table) = self.tables.get(&hit.skill) else {
                continue;
            };
            let (Some(attacker), Some(target)) =
                (region.creature(hit.attacker), region.creature(hit.creature))
            else {
                continue;
            };
            let Some(skill) = attacker.skills.get(hit.skill) else {
                continue;
            };

            let rank = skill.rank;
            let rating = PowerRating::rate(attacker, target);
            let conditions: Vec<u8> = table.conditions(rank, rating, hit).collect();
            if conditions.is_empty() {
                continue;
            }

            let Some(skill) = region
                .creature_mut(hit.attacker)
                .and_then(|attacker| attacker.skills.get_mut(hit.skill))
            else {
                continue;
            };
            for condition in conditions {
                if let Some(count) = skill.train(condition) {
                    awards.push(TrainingAward {
                        actor: hit.attacker,
                        skill: hit.skill,
                        rank,
                        condition,
                        count,
                    });
                }
            }
        }

        awards
    }
}
