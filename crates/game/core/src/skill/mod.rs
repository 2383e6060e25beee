//! Skills: identity, rank data, per-creature invocation state and handlers.
//!
//! A creature's [`Skill`] carries the mutable invocation state (stack counter,
//! phase, training progress) plus a cached copy of the rank data it was learned
//! at. Behavior lives in [`SkillHandler`] implementations looked up through a
//! [`SkillRegistry`].
mod bolt;
mod error;
mod handler;
mod stance;

pub use bolt::{BoltParams, BoltSkill};
pub use error::SkillError;
pub use handler::{SkillContext, SkillHandler, SkillRegistry};
pub use stance::{DefenseSkill, ManaShieldSkill};

use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::config::CombatConfig;

/// Skills known to the combat engine.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillId {
    Defense,
    ManaShield,
    Icebolt,
    Firebolt,
    /// Passive: readying a bolt grants the full stack at once.
    ChainCasting,
}

impl SkillId {
    /// Name used for this skill in replicated effects.
    pub const fn effect_name(self) -> &'static str {
        match self {
            Self::Defense => "defense",
            Self::ManaShield => "manashield",
            Self::Icebolt => "icebolt",
            Self::Firebolt => "firebolt",
            Self::ChainCasting => "chaincasting",
        }
    }
}

/// Skill rank, from untrained Novice up to Rank 1.
///
/// Ordering follows progression: `Novice < RF < ... < RA < R9 < ... < R1`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillRank {
    Novice,
    RF,
    RE,
    RD,
    RC,
    RB,
    RA,
    R9,
    R8,
    R7,
    R6,
    R5,
    R4,
    R3,
    R2,
    R1,
}

/// Per-rank numbers for a skill.
///
/// The meaning of `var1..var3` depends on the skill:
///
/// - bolts: `var1`/`var2` are minimum/maximum damage
/// - Defense: `var3` is the flat damage reduction
/// - Mana Shield: `var1` is the efficiency (damage absorbed per point of mana)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RankData {
    pub range: u32,
    /// Stacks gained per Ready.
    pub stack: u16,
    pub stack_max: u16,
    pub cast_time_ms: u32,
    pub var1: f32,
    pub var2: f32,
    pub var3: f32,
}

/// Where a skill is in its casting cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillPhase {
    #[default]
    Idle,
    Preparing,
    /// Readied and usable while stacks remain.
    Ready,
}

/// A skill as learned by one creature.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: SkillId,
    pub rank: SkillRank,
    pub rank_data: RankData,
    stacks: u16,
    pub phase: SkillPhase,
    /// Progress counters, one per training condition (condition `n` is index
    /// `n - 1`).
    training: [u16; CombatConfig::MAX_TRAINING_CONDITIONS],
}

impl Skill {
    pub fn new(id: SkillId, rank: SkillRank, rank_data: RankData) -> Self {
        Self {
            id,
            rank,
            rank_data,
            stacks: 0,
            phase: SkillPhase::Idle,
            training: [0; CombatConfig::MAX_TRAINING_CONDITIONS],
        }
    }

    pub fn stacks(&self) -> u16 {
        self.stacks
    }

    /// Adds `amount` stacks, capped at the rank's maximum.
    pub fn add_stacks(&mut self, amount: u16) -> u16 {
        self.stacks = self
            .stacks
            .saturating_add(amount)
            .min(self.rank_data.stack_max);
        self.stacks
    }

    /// Spends one stack; never goes below zero.
    pub fn consume_stack(&mut self) -> u16 {
        self.stacks = self.stacks.saturating_sub(1);
        self.stacks
    }

    pub fn reset_stacks(&mut self) {
        self.stacks = 0;
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SkillPhase::Ready
    }

    /// Records one success for training condition `condition` (1-based).
    ///
    /// Returns the new count, or `None` for a condition the skill does not
    /// track.
    pub fn train(&mut self, condition: u8) -> Option<u16> {
        let slot = (condition as usize)
            .checked_sub(1)
            .and_then(|index| self.training.get_mut(index))?;
        *slot = slot.saturating_add(1);
        Some(*slot)
    }

    pub fn training_count(&self, condition: u8) -> u16 {
        (condition as usize)
            .checked_sub(1)
            .and_then(|index| self.training.get(index))
            .copied()
            .unwrap_or(0)
    }
}

/// Skills learned by a creature, keyed by id.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSet {
    skills: BTreeMap<SkillId, Skill>,
}

impl SkillSet {
    /// Learns a skill, replacing an earlier rank of the same skill.
    pub fn insert(&mut self, skill: Skill) -> Option<Skill> {
        self.skills.insert(skill.id, skill)
    }

    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    pub fn get_mut(&mut self, id: SkillId) -> Option<&mut Skill> {
        self.skills.get_mut(&id)
    }

    pub fn has(&self, id: SkillId) -> bool {
        self.skills.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icebolt() -> Skill {
        Skill::new(
            SkillId::Icebolt,
            SkillRank::RF,
            RankData {
                stack: 1,
                stack_max: 5,
                ..RankData::default()
            },
        )
    }

    #[test]
    fn stacks_stay_within_bounds() {
        let mut skill = icebolt();
        assert_eq!(skill.consume_stack(), 0);
        assert_eq!(skill.add_stacks(3), 3);
        assert_eq!(skill.add_stacks(3), 5);
        assert_eq!(skill.add_stacks(u16::MAX), 5);
        skill.reset_stacks();
        assert_eq!(skill.stacks(), 0);
    }

    #[test]
    fn training_conditions_are_one_based() {
        let mut skill = icebolt();
        assert_eq!(skill.train(1), Some(1));
        assert_eq!(skill.train(1), Some(2));
        assert_eq!(skill.train(9), Some(1));
        assert_eq!(skill.train(0), None);
        assert_eq!(skill.train(10), None);
        assert_eq!(skill.training_count(1), 2);
        assert_eq!(skill.training_count(0), 0);
    }

    #[test]
    fn ranks_order_by_progression() {
        assert!(SkillRank::Novice < SkillRank::RF);
        assert!(SkillRank::RA < SkillRank::R9);
        assert!(SkillRank::R2 < SkillRank::R1);
        assert_eq!("RE".parse::<SkillRank>(), Ok(SkillRank::RE));
    }

    #[test]
    fn effect_names() {
        assert_eq!(SkillId::Icebolt.effect_name(), "icebolt");
        assert_eq!(SkillId::Firebolt.to_string(), "Firebolt");
    }
}
