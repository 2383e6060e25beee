//! Self-targeted stances that only change how incoming damage is handled.
//!
//! Neither skill can be used on a target. Defense is consumed by the mitigation
//! pipeline when it absorbs a hit; Mana Shield stays up until cancelled or
//! until the caster runs out of mana.

use crate::skill::handler::{cancel_cast, ready_cast};
use crate::skill::{SkillContext, SkillError, SkillHandler, SkillId};
use crate::state::{Conditions, EntityId};

/// Defense: readied, it blocks the next hit.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefenseSkill;

impl SkillHandler for DefenseSkill {
    fn id(&self) -> SkillId {
        SkillId::Defense
    }
}

/// Mana Shield: while active, damage is paid from mana first.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManaShieldSkill;

impl SkillHandler for ManaShieldSkill {
    fn id(&self) -> SkillId {
        SkillId::ManaShield
    }

    fn ready(&self, ctx: &mut SkillContext<'_>, actor: EntityId) -> Result<u16, SkillError> {
        let stacks = ready_cast(ctx, actor, self.id())?;
        let (creature, _) = ctx.caster_mut(actor, self.id())?;
        creature.conditions.insert(Conditions::MANA_SHIELD);
        Ok(stacks)
    }

    fn cancel(&self, ctx: &mut SkillContext<'_>, actor: EntityId) -> Result<(), SkillError> {
        cancel_cast(ctx, actor, self.id())?;
        let (creature, _) = ctx.caster_mut(actor, self.id())?;
        creature.conditions.remove(Conditions::MANA_SHIELD);
        Ok(())
    }
}
