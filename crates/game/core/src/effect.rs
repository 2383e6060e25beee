//! Observable side effects produced while resolving actions.
//!
//! Core logic never talks to the network. Handlers push [`Broadcast`] values
//! into an [`Outbox`]; the runtime drains it after each command and publishes
//! the entries in order.

use crate::skill::SkillId;
use crate::state::{EntityId, Position};

/// Casting animation stage carried by [`Broadcast::Casting`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastingStage {
    Start,
    Ready,
}

/// A single replicated effect or announcement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Broadcast {
    /// Casting motion shown around the actor.
    Casting {
        actor: EntityId,
        skill: SkillId,
        stage: CastingStage,
    },
    /// Cast time announcement sent when preparation starts.
    SkillPrepare {
        actor: EntityId,
        skill: SkillId,
        cast_time_ms: u32,
    },
    /// Stack counter changed; clients key the effect by
    /// [`SkillId::effect_name`].
    StackUpdate {
        actor: EntityId,
        skill: SkillId,
        stacks: u16,
    },
    SkillReady {
        actor: EntityId,
        skill: SkillId,
    },
    SkillComplete {
        actor: EntityId,
        skill: SkillId,
    },
    MotionCancel {
        actor: EntityId,
    },
    /// Spell release effect.
    UseMagic {
        actor: EntityId,
        skill: SkillId,
    },
    /// Stun the attacker receives for using a skill.
    SkillUseStun {
        actor: EntityId,
        skill: SkillId,
        stun_ms: u32,
    },
    StopMove {
        entity: EntityId,
        position: Position,
    },
    Knockback {
        entity: EntityId,
        position: Position,
    },
    /// Chat-line system message to a single player.
    ServerMessage {
        actor: EntityId,
        text: String,
    },
    /// On-screen notice to a single player.
    Notice {
        actor: EntityId,
        text: String,
    },
    /// Hit animation against a prop, shown to everyone around the actor.
    HittingProp {
        actor: EntityId,
        prop: EntityId,
    },
    HitPropAck {
        actor: EntityId,
        prop: EntityId,
    },
    TouchPropAck {
        actor: EntityId,
        prop: EntityId,
    },
    /// A prop changed state; puzzle scripts subscribe to these.
    PropUpdate {
        prop: EntityId,
        state: String,
    },
}

impl Broadcast {
    /// Entity the effect is attached to.
    pub fn subject(&self) -> EntityId {
        match self {
            Self::Casting { actor, .. }
            | Self::SkillPrepare { actor, .. }
            | Self::StackUpdate { actor, .. }
            | Self::SkillReady { actor, .. }
            | Self::SkillComplete { actor, .. }
            | Self::MotionCancel { actor }
            | Self::UseMagic { actor, .. }
            | Self::SkillUseStun { actor, .. }
            | Self::ServerMessage { actor, .. }
            | Self::Notice { actor, .. }
            | Self::HittingProp { actor, .. }
            | Self::HitPropAck { actor, .. }
            | Self::TouchPropAck { actor, .. } => *actor,
            Self::StopMove { entity, .. } | Self::Knockback { entity, .. } => *entity,
            Self::PropUpdate { prop, .. } => *prop,
        }
    }

    /// True for effects only the acting player should see.
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            Self::ServerMessage { .. }
                | Self::Notice { .. }
                | Self::HitPropAck { .. }
                | Self::TouchPropAck { .. }
        )
    }
}

/// Ordered buffer of effects produced by one command.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outbox {
    entries: Vec<Broadcast>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, broadcast: Broadcast) {
        self.entries.push(broadcast);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Broadcast> {
        self.entries.iter()
    }

    /// Takes every buffered effect, leaving the outbox empty.
    pub fn drain(&mut self) -> Vec<Broadcast> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order() {
        let mut outbox = Outbox::new();
        outbox.push(Broadcast::MotionCancel { actor: EntityId(1) });
        outbox.push(Broadcast::Notice {
            actor: EntityId(1),
            text: "hi".into(),
        });

        let drained = outbox.drain();
        assert!(outbox.is_empty());
        assert!(matches!(drained[0], Broadcast::MotionCancel { .. }));
        assert!(drained[1].is_private());
        assert_eq!(drained[1].subject(), EntityId(1));
    }
}
