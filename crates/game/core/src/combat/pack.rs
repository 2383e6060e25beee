//! Action packs: the descriptors of one exchange, grouped for replication.

use std::fmt;

use arrayvec::ArrayVec;

use crate::combat::{AttackerAction, CombatAction, TargetAction, TargetOptions};
use crate::config::CombatConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::skill::SkillId;
use crate::state::{EntityId, Region, RegionId};

type Actions = ArrayVec<CombatAction, { CombatConfig::MAX_PACK_ACTIONS }>;

/// Sequence number of a finalized exchange, unique and increasing per region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackId {
    pub region: RegionId,
    pub sequence: u64,
}

impl PackId {
    pub const fn new(region: RegionId, sequence: u64) -> Self {
        Self { region, sequence }
    }
}

impl fmt::Display for PackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/pack#{}", self.region, self.sequence)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    #[error("action pack is full ({capacity} descriptors)")]
    Full { capacity: usize },
}

impl GameError for PackError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "PACK_FULL"
    }
}

/// Descriptors of an exchange that is still resolving.
#[derive(Clone, Debug)]
pub struct CombatActionPack {
    attacker: EntityId,
    skill: SkillId,
    actions: Actions,
}

impl CombatActionPack {
    /// Starts a single-target pack.
    pub fn new(attacker: AttackerAction, target: TargetAction) -> Self {
        let mut actions = Actions::new();
        let (creature, skill) = (attacker.creature, attacker.skill);
        actions.push(attacker.into());
        actions.push(target.into());
        Self {
            attacker: creature,
            skill,
            actions,
        }
    }

    pub fn push(&mut self, action: impl Into<CombatAction>) -> Result<(), PackError> {
        self.actions
            .try_push(action.into())
            .map_err(|_| PackError::Full {
                capacity: CombatConfig::MAX_PACK_ACTIONS,
            })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Seals the exchange.
    ///
    /// Attacker descriptors are ordered before target descriptors, and target
    /// descriptors for the same creature are merged into one. Every descriptor's
    /// stun is then applied to its creature, and targets that are dead at this
    /// point are marked `FINISHED`.
    pub fn finalize(self, id: PackId, region: &mut Region) -> FinalizedPack {
        let mut ordered = Actions::new();
        let mut targets: ArrayVec<TargetAction, { CombatConfig::MAX_PACK_ACTIONS }> =
            ArrayVec::new();

        for action in self.actions {
            match action {
                CombatAction::Attacker(attacker) => ordered.push(CombatAction::Attacker(attacker)),
                CombatAction::Target(target) => {
                    let creature = target.creature;
                    match targets.iter_mut().find(|t| t.creature == creature) {
                        Some(existing) => existing.merge(&target),
                        None => targets.push(target),
                    }
                }
            }
        }
        ordered.extend(targets.into_iter().map(CombatAction::Target));

        for action in ordered.iter_mut() {
            let Some(creature) = region.creature_mut(action.creature()) else {
                continue;
            };
            creature.stun_ms = action.stun_ms();

            if let CombatAction::Target(target) = action {
                target.target_dead = creature.is_dead();
                if target.target_dead {
                    target.set(TargetOptions::FINISHED);
                }
            }
        }

        FinalizedPack {
            id,
            attacker: self.attacker,
            skill: self.skill,
            actions: ordered,
        }
    }
}

/// A sealed exchange. Replicated to observers and fed to training.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalizedPack {
    id: PackId,
    attacker: EntityId,
    skill: SkillId,
    actions: Actions,
}

impl FinalizedPack {
    pub fn id(&self) -> PackId {
        self.id
    }

    pub fn attacker(&self) -> EntityId {
        self.attacker
    }

    pub fn skill(&self) -> SkillId {
        self.skill
    }

    pub fn actions(&self) -> &[CombatAction] {
        &self.actions
    }

    pub fn attacker_actions(&self) -> impl Iterator<Item = &AttackerAction> {
        self.actions.iter().filter_map(|action| match action {
            CombatAction::Attacker(a) => Some(a),
            CombatAction::Target(_) => None,
        })
    }

    pub fn target_actions(&self) -> impl Iterator<Item = &TargetAction> {
        self.actions.iter().filter_map(|action| match action {
            CombatAction::Target(t) => Some(t),
            CombatAction::Attacker(_) => None,
        })
    }

    pub fn target_action(&self, creature: EntityId) -> Option<&TargetAction> {
        self.target_actions().find(|t| t.creature == creature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatActionType;
    use crate::state::{Creature, Position};

    fn region() -> Region {
        let mut region = Region::new(RegionId(1), "test", 0);
        region.spawn_creature(Creature::new(EntityId(1), "Mage", Position::ORIGIN, 100.0));
        region.spawn_creature(Creature::new(
            EntityId(2),
            "Wolf",
            Position::new(300, 0),
            20.0,
        ));
        region.spawn_creature(Creature::new(
            EntityId(3),
            "Fox",
            Position::new(0, 300),
            20.0,
        ));
        region
    }

    fn hit(target: u64, damage: f32, stun_ms: u32) -> TargetAction {
        let mut action = TargetAction::new(
            CombatActionType::TakeHit,
            EntityId(target),
            EntityId(1),
            SkillId::Icebolt,
        );
        action.damage = damage;
        action.stun_ms = stun_ms;
        action
    }

    #[test]
    fn finalize_orders_and_merges() {
        let mut region = region();
        let mut attacker =
            AttackerAction::new(CombatActionType::RangeHit, EntityId(1), SkillId::Icebolt, EntityId(2));
        attacker.stun_ms = 500;

        let mut pack = CombatActionPack::new(attacker.clone(), hit(2, 10.0, 2000));
        pack.push(hit(3, 4.0, 2000)).unwrap();
        pack.push(hit(2, 6.0, 1000)).unwrap();
        pack.push(attacker).unwrap();

        let finalized = pack.finalize(PackId::new(RegionId(1), 1), &mut region);
        let kinds: Vec<bool> = finalized.actions().iter().map(|a| a.is_attacker()).collect();
        assert_eq!(kinds, vec![true, true, false, false]);

        let wolf = finalized.target_action(EntityId(2)).unwrap();
        assert_eq!(wolf.damage, 16.0);
        assert_eq!(wolf.stun_ms, 2000);
        assert_eq!(finalized.target_actions().count(), 2);

        assert_eq!(region.creature(EntityId(1)).unwrap().stun_ms, 500);
        assert_eq!(region.creature(EntityId(2)).unwrap().stun_ms, 2000);
    }

    #[test]
    fn dead_targets_are_finished() {
        let mut region = region();
        region.creature_mut(EntityId(2)).unwrap().take_damage(100.0);

        let attacker =
            AttackerAction::new(CombatActionType::RangeHit, EntityId(1), SkillId::Icebolt, EntityId(2));
        let pack = CombatActionPack::new(attacker, hit(2, 0.0, 0));
        let finalized = pack.finalize(PackId::new(RegionId(1), 1), &mut region);

        let target = finalized.target_action(EntityId(2)).unwrap();
        assert!(target.target_dead);
        assert!(target.has(TargetOptions::FINISHED));
    }

    #[test]
    fn push_beyond_capacity_fails() {
        let attacker =
            AttackerAction::new(CombatActionType::RangeHit, EntityId(1), SkillId::Icebolt, EntityId(2));
        let mut pack = CombatActionPack::new(attacker, hit(2, 1.0, 0));
        for _ in pack.len()..CombatConfig::MAX_PACK_ACTIONS {
            pack.push(hit(3, 1.0, 0)).unwrap();
        }
        assert_eq!(
            pack.push(hit(3, 1.0, 0)),
            Err(PackError::Full {
                capacity: CombatConfig::MAX_PACK_ACTIONS
            })
        );
    }
}
