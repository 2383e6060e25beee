//! Creature state: identity, vitals, transient combat counters and skills.

use bitflags::bitflags;

use crate::skill::SkillSet;
use crate::state::{EntityId, Item, Meter, Position};

bitflags! {
    /// Persistent conditions that change how incoming damage is handled.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Conditions: u32 {
        /// Damage is paid from mana before life (see the mana shield stage).
        const MANA_SHIELD = 0b0000_0001;
    }
}

/// Combat-relevant derived stats.
///
/// These are computed externally (equipment, titles, buffs) and only read here.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatStats {
    /// Percentage bonus applied to magic damage rolls.
    pub magic_attack: f32,
    /// Flat reduction applied to incoming magic damage.
    pub magic_defense: f32,
    /// Fraction (0.0..=1.0) of incoming magic damage removed after defense.
    pub magic_protection: f32,
    /// Overall strength used to rate opponents against each other.
    pub combat_power: f32,
}

/// Result of applying damage to a creature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageReport {
    /// Life actually removed (truncated damage, capped at remaining life).
    pub dealt: f32,
    /// True only for the call that transitioned the creature to dead.
    pub killed: bool,
}

/// A creature living in a region.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Creature {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    /// Movement target while walking, `None` when standing still.
    pub destination: Option<Position>,
    pub life: Meter,
    pub mana: Meter,
    dead: bool,
    /// Knockback accumulation; knocked down at the configured threshold.
    pub knockback: i32,
    /// Remaining stun in milliseconds.
    pub stun_ms: u32,
    pub stats: CombatStats,
    pub conditions: Conditions,
    pub skills: SkillSet,
    pub right_hand: Option<Item>,
    /// Entity this creature is currently hostile towards.
    pub aggro_target: Option<EntityId>,
    pub is_boss: bool,
}

impl Creature {
    pub fn new(id: EntityId, name: impl Into<String>, position: Position, life: f32) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            destination: None,
            life: Meter::full(life),
            mana: Meter::default(),
            dead: false,
            knockback: 0,
            stun_ms: 0,
            stats: CombatStats::default(),
            conditions: Conditions::empty(),
            skills: SkillSet::default(),
            right_hand: None,
            aggro_target: None,
            is_boss: false,
        }
    }

    #[must_use]
    pub fn with_mana(mut self, mana: f32) -> Self {
        self.mana = Meter::full(mana);
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_right_hand(mut self, item: Item) -> Self {
        self.right_hand = Some(item);
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: crate::skill::Skill) -> Self {
        self.skills.insert(skill);
        self
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_moving(&self) -> bool {
        self.destination.is_some()
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_ms > 0
    }

    pub fn move_to(&mut self, destination: Position) {
        self.destination = Some(destination);
    }

    /// Halts movement where the creature currently stands.
    pub fn stop_move(&mut self) -> Position {
        self.destination = None;
        self.position
    }

    /// Returns true if the right-hand item carries `tag`.
    pub fn right_hand_has_tag(&self, tag: &str) -> bool {
        self.right_hand.as_ref().is_some_and(|item| item.has_tag(tag))
    }

    /// Removes truncated `damage` from life.
    ///
    /// Life never drops below zero and the death flag is set exactly once; a
    /// dead creature takes no further damage.
    pub fn take_damage(&mut self, damage: f32) -> DamageReport {
        let amount = damage.trunc();
        if self.dead || amount.is_nan() || amount <= 0.0 {
            return DamageReport {
                dealt: 0.0,
                killed: false,
            };
        }

        let dealt = amount.min(self.life.current);
        self.life.current = (self.life.current - amount).max(0.0);

        let killed = self.life.is_empty();
        if killed {
            self.dead = true;
            self.destination = None;
        }

        DamageReport { dealt, killed }
    }

    pub fn aggro(&mut self, attacker: EntityId) {
        if attacker != self.id {
            self.aggro_target = Some(attacker);
        }
    }

    /// Counts down stun; a creature getting up from a knockdown starts with a
    /// cleared knockback counter.
    pub fn recover(&mut self, elapsed_ms: u32, knockdown_threshold: i32) {
        if self.stun_ms == 0 {
            return;
        }

        self.stun_ms = self.stun_ms.saturating_sub(elapsed_ms);
        if self.stun_ms == 0 && self.knockback >= knockdown_threshold {
            self.knockback = 0;
        }
    }
}
