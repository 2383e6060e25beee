//! Attacker and target action descriptors.
//!
//! One exchange produces exactly one [`AttackerAction`] and one
//! [`TargetAction`] per target. Identity fields are fixed at construction;
//! result fields (options, stun, damage) are filled in while the exchange
//! resolves and frozen once the pack is finalized.

use bitflags::bitflags;

use crate::skill::SkillId;
use crate::state::EntityId;

/// What a descriptor records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatActionType {
    /// Attacker fired a ranged hit.
    RangeHit,
    /// Target was hit.
    TakeHit,
    /// Target blocked the hit with Defense.
    Defended,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AttackerOptions: u32 {
        const RESULT = 0x0000_0004;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TargetOptions: u32 {
        const RESULT = 0x0000_0004;
        const KNOCK_DOWN = 0x0000_0008;
        const FINISHING_HIT = 0x0000_0010;
        const KNOCK_BACK = 0x0000_0020;
        const DEFENDED = 0x0000_0040;
        const MANA_SHIELD = 0x0000_0080;
        const FINISHED = 0x0000_0100;

        const FINISHING_KNOCK_DOWN = Self::FINISHING_HIT.bits() | Self::KNOCK_DOWN.bits();
    }
}

/// Descriptor of what the attacker did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackerAction {
    pub kind: CombatActionType,
    pub creature: EntityId,
    pub skill: SkillId,
    pub target: EntityId,
    pub options: AttackerOptions,
    /// Stun applied to the attacker when the pack is finalized.
    pub stun_ms: u32,
}

impl AttackerAction {
    pub fn new(
        kind: CombatActionType,
        creature: EntityId,
        skill: SkillId,
        target: EntityId,
    ) -> Self {
        Self {
            kind,
            creature,
            skill,
            target,
            options: AttackerOptions::empty(),
            stun_ms: 0,
        }
    }

    pub fn set(&mut self, options: AttackerOptions) {
        self.options.insert(options);
    }

    pub fn has(&self, options: AttackerOptions) -> bool {
        self.options.contains(options)
    }
}

/// Descriptor of what happened to one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetAction {
    pub kind: CombatActionType,
    pub creature: EntityId,
    pub attacker: EntityId,
    pub skill: SkillId,
    pub options: TargetOptions,
    /// Stun applied to the target when the pack is finalized.
    pub stun_ms: u32,
    /// Damage that reached the target after mitigation.
    pub damage: f32,
    /// Mana spent by a mana shield to absorb part of the hit.
    pub mana_damage: f32,
    /// Whether the target was dead when the pack was finalized.
    pub target_dead: bool,
}

impl TargetAction {
    pub fn new(
        kind: CombatActionType,
        creature: EntityId,
        attacker: EntityId,
        skill: SkillId,
    ) -> Self {
        Self {
            kind,
            creature,
            attacker,
            skill,
            options: TargetOptions::empty(),
            stun_ms: 0,
            damage: 0.0,
            mana_damage: 0.0,
            target_dead: false,
        }
    }

    pub fn set(&mut self, options: TargetOptions) {
        self.options.insert(options);
    }

    pub fn has(&self, options: TargetOptions) -> bool {
        self.options.contains(options)
    }

    /// Knocked down, including a finishing knockdown.
    pub fn is_knocked_down(&self) -> bool {
        self.has(TargetOptions::KNOCK_DOWN)
    }

    /// Folds a second descriptor for the same creature into this one.
    pub(crate) fn merge(&mut self, other: &TargetAction) {
        self.options.insert(other.options);
        self.damage += other.damage;
        self.mana_damage += other.mana_damage;
        self.stun_ms = self.stun_ms.max(other.stun_ms);
        if other.kind == CombatActionType::Defended {
            self.kind = CombatActionType::Defended;
        }
    }
}

/// Either side of an exchange.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    Attacker(AttackerAction),
    Target(TargetAction),
}

impl CombatAction {
    pub fn creature(&self) -> EntityId {
        match self {
            Self::Attacker(action) => action.creature,
            Self::Target(action) => action.creature,
        }
    }

    pub fn stun_ms(&self) -> u32 {
        match self {
            Self::Attacker(action) => action.stun_ms,
            Self::Target(action) => action.stun_ms,
        }
    }

    pub fn is_attacker(&self) -> bool {
        matches!(self, Self::Attacker(_))
    }
}

impl From<AttackerAction> for CombatAction {
    fn from(action: AttackerAction) -> Self {
        Self::Attacker(action)
    }
}

impl From<TargetAction> for CombatAction {
    fn from(action: TargetAction) -> Self {
        Self::Target(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishing_knockdown_counts_as_knockdown() {
        let mut action =
            TargetAction::new(CombatActionType::TakeHit, EntityId(2), EntityId(1), SkillId::Icebolt);
        assert!(!action.is_knocked_down());
        action.set(TargetOptions::FINISHING_KNOCK_DOWN);
        assert!(action.is_knocked_down());
        assert!(action.has(TargetOptions::FINISHING_HIT));
    }

    #[test]
    fn merge_accumulates() {
        let mut first =
            TargetAction::new(CombatActionType::TakeHit, EntityId(2), EntityId(1), SkillId::Icebolt);
        first.damage = 10.0;
        first.stun_ms = 2000;
        let mut second = first.clone();
        second.kind = CombatActionType::Defended;
        second.damage = 5.0;
        second.stun_ms = 1000;
        second.set(TargetOptions::DEFENDED);

        first.merge(&second);
        assert_eq!(first.damage, 15.0);
        assert_eq!(first.stun_ms, 2000);
        assert_eq!(first.kind, CombatActionType::Defended);
        assert!(first.has(TargetOptions::DEFENDED));
    }
}
