//! Skill handler trait and the shared casting cycle.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::combat::FinalizedPack;
use crate::config::CombatConfig;
use crate::effect::{Broadcast, CastingStage, Outbox};
use crate::env::RngOracle;
use crate::skill::{Skill, SkillError, SkillId, SkillPhase};
use crate::state::{Creature, EntityId, Region};

/// Everything a handler may touch while processing one request.
pub struct SkillContext<'a> {
    pub region: &'a mut Region,
    pub outbox: &'a mut Outbox,
    pub rng: &'a dyn RngOracle,
    pub config: &'a CombatConfig,
}

impl<'a> SkillContext<'a> {
    pub fn new(
        region: &'a mut Region,
        outbox: &'a mut Outbox,
        rng: &'a dyn RngOracle,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            region,
            outbox,
            rng,
            config,
        }
    }

    /// Looks up `actor` and its copy of `skill`.
    pub fn caster_mut(
        &mut self,
        actor: EntityId,
        skill: SkillId,
    ) -> Result<(&mut Creature, &mut Outbox), SkillError> {
        let creature = self
            .region
            .creature_mut(actor)
            .ok_or(SkillError::ActorNotFound(actor))?;
        if !creature.skills.has(skill) {
            return Err(SkillError::SkillNotLearned { actor, skill });
        }
        Ok((creature, &mut *self.outbox))
    }
}

/// Behavior of one skill.
///
/// The default methods implement the common casting cycle
/// (`Idle -> Preparing -> Ready -> ... -> Idle`); handlers override only the
/// steps where their skill differs. A caller must not run two invocations of
/// the same skill for the same actor concurrently; the region worker
/// serializes requests, so this holds as long as all calls go through it.
pub trait SkillHandler: Send + Sync {
    fn id(&self) -> SkillId;

    /// Starts casting: the actor stops walking and shows the casting motion.
    fn prepare(&self, ctx: &mut SkillContext<'_>, actor: EntityId) -> Result<(), SkillError> {
        prepare_cast(ctx, actor, self.id())
    }

    /// Finishes casting and grants stacks. Returns the new stack count.
    fn ready(&self, ctx: &mut SkillContext<'_>, actor: EntityId) -> Result<u16, SkillError> {
        ready_cast(ctx, actor, self.id())
    }

    /// Uses the readied skill on `target`.
    fn use_on(
        &self,
        _ctx: &mut SkillContext<'_>,
        _actor: EntityId,
        _target: EntityId,
    ) -> Result<FinalizedPack, SkillError> {
        Err(SkillError::NotUsable(self.id()))
    }

    /// Announces completion. The skill stays readied while stacks remain.
    fn complete(&self, ctx: &mut SkillContext<'_>, actor: EntityId) -> Result<(), SkillError> {
        complete_cast(ctx, actor, self.id())
    }

    /// Aborts the skill, dropping every stack.
    fn cancel(&self, ctx: &mut SkillContext<'_>, actor: EntityId) -> Result<(), SkillError> {
        cancel_cast(ctx, actor, self.id())
    }
}

// ============================================================================
// Shared casting cycle
// ============================================================================

pub(crate) fn prepare_cast(
    ctx: &mut SkillContext<'_>,
    actor: EntityId,
    id: SkillId,
) -> Result<(), SkillError> {
    let (creature, outbox) = ctx.caster_mut(actor, id)?;

    let position = creature.stop_move();
    let skill = learned_mut(creature, id)?;
    skill.phase = SkillPhase::Preparing;
    let cast_time_ms = skill.rank_data.cast_time_ms;

    outbox.push(Broadcast::StopMove {
        entity: actor,
        position,
    });
    outbox.push(Broadcast::Casting {
        actor,
        skill: id,
        stage: CastingStage::Start,
    });
    outbox.push(Broadcast::SkillPrepare {
        actor,
        skill: id,
        cast_time_ms,
    });
    Ok(())
}

/// The cap is applied here only; clients may keep casting beyond it and the
/// server does not re-check before the next use.
pub(crate) fn ready_cast(
    ctx: &mut SkillContext<'_>,
    actor: EntityId,
    id: SkillId,
) -> Result<u16, SkillError> {
    let (creature, outbox) = ctx.caster_mut(actor, id)?;

    let chain_casting = creature.skills.has(SkillId::ChainCasting);
    let skill = learned_mut(creature, id)?;
    let gain = if chain_casting {
        skill.rank_data.stack_max
    } else {
        skill.rank_data.stack
    };
    let stacks = skill.add_stacks(gain);
    skill.phase = SkillPhase::Ready;

    outbox.push(Broadcast::StackUpdate {
        actor,
        skill: id,
        stacks,
    });
    outbox.push(Broadcast::Casting {
        actor,
        skill: id,
        stage: CastingStage::Ready,
    });
    outbox.push(Broadcast::SkillReady { actor, skill: id });
    Ok(stacks)
}

pub(crate) fn complete_cast(
    ctx: &mut SkillContext<'_>,
    actor: EntityId,
    id: SkillId,
) -> Result<(), SkillError> {
    let (creature, outbox) = ctx.caster_mut(actor, id)?;

    let skill = learned_mut(creature, id)?;
    if skill.stacks() == 0 {
        skill.phase = SkillPhase::Idle;
    }

    outbox.push(Broadcast::SkillComplete { actor, skill: id });
    Ok(())
}

pub(crate) fn cancel_cast(
    ctx: &mut SkillContext<'_>,
    actor: EntityId,
    id: SkillId,
) -> Result<(), SkillError> {
    let (creature, outbox) = ctx.caster_mut(actor, id)?;

    let skill = learned_mut(creature, id)?;
    skill.reset_stacks();
    skill.phase = SkillPhase::Idle;

    outbox.push(Broadcast::StackUpdate {
        actor,
        skill: id,
        stacks: 0,
    });
    outbox.push(Broadcast::MotionCancel { actor });
    Ok(())
}

pub(crate) fn learned_mut(creature: &mut Creature, id: SkillId) -> Result<&mut Skill, SkillError> {
    let actor = creature.id;
    creature
        .skills
        .get_mut(id)
        .ok_or(SkillError::SkillNotLearned { actor, skill: id })
}

/// Handlers keyed by skill id.
#[derive(Clone, Default)]
pub struct SkillRegistry {
    handlers: BTreeMap<SkillId, Arc<dyn SkillHandler>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every handler the engine ships with.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::skill::BoltSkill::icebolt()));
        registry.register(Arc::new(crate::skill::BoltSkill::firebolt()));
        registry.register(Arc::new(crate::skill::DefenseSkill));
        registry.register(Arc::new(crate::skill::ManaShieldSkill));
        registry
    }

    /// Registers a handler, replacing any earlier one for the same skill.
    pub fn register(&mut self, handler: Arc<dyn SkillHandler>) {
        self.handlers.insert(handler.id(), handler);
    }

    pub fn get(&self, id: SkillId) -> Result<&Arc<dyn SkillHandler>, SkillError> {
        self.handlers.get(&id).ok_or(SkillError::NoHandler(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.handlers.keys().copied()
    }
}

impl std::fmt::Debug for SkillRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers.keys()).finish()
    }
}
