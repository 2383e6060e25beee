//! Bolt spells: single-target magic projectiles (Icebolt, Firebolt).

use crate::combat::{
    AttackerAction, AttackerOptions, CombatActionPack, CombatActionType, FinalizedPack,
    MitigationContext, MitigationPipeline, TargetAction, TargetOptions, magic_damage,
    resolve_hit_outcome,
};
use crate::effect::Broadcast;
use crate::env::{compute_seed, rng_context};
use crate::skill::handler::learned_mut;
use crate::skill::{RankData, SkillContext, SkillError, SkillHandler, SkillId};
use crate::state::EntityId;

/// Per-spell constants for the bolt engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoltParams {
    pub skill: SkillId,
    /// Item tag of the matching wand.
    pub implement_tag: &'static str,
    /// Range added while the matching wand is held.
    pub implement_range_bonus: u32,
    /// Damage added to the roll while the matching wand is held.
    pub implement_damage_bonus: f32,
    pub attacker_stun_ms: u32,
    pub target_stun_ms: u32,
    pub knockback_distance: u32,
}

impl BoltParams {
    pub const ICEBOLT: Self = Self {
        skill: SkillId::Icebolt,
        implement_tag: "/ice_wand/",
        implement_range_bonus: 200,
        implement_damage_bonus: 5.0,
        attacker_stun_ms: 500,
        target_stun_ms: 2000,
        knockback_distance: 400,
    };

    pub const FIREBOLT: Self = Self {
        skill: SkillId::Firebolt,
        implement_tag: "/fire_wand/",
        ..Self::ICEBOLT
    };
}

/// Handler shared by every bolt spell.
#[derive(Debug)]
pub struct BoltSkill {
    params: BoltParams,
    pipeline: MitigationPipeline,
}

impl BoltSkill {
    pub fn new(params: BoltParams) -> Self {
        Self {
            params,
            pipeline: MitigationPipeline::magic(),
        }
    }

    pub fn icebolt() -> Self {
        Self::new(BoltParams::ICEBOLT)
    }

    pub fn firebolt() -> Self {
        Self::new(BoltParams::FIREBOLT)
    }

    pub fn params(&self) -> &BoltParams {
        &self.params
    }

    /// Effective range: rank range plus the wand bonus when the matching wand
    /// is held.
    pub fn range(&self, rank: &RankData, armed: bool) -> u32 {
        if armed {
            rank.range.saturating_add(self.params.implement_range_bonus)
        } else {
            rank.range
        }
    }
}

impl SkillHandler for BoltSkill {
    fn id(&self) -> SkillId {
        self.params.skill
    }

    /// Fires the bolt at `target`.
    ///
    /// Validation failures (`InvalidTarget`, `OutOfRange`) leave the region
    /// untouched. The caster is never a valid target. On success the exchange is sealed and returned; the stun in
    /// the attacker descriptor is always the spell's own constant, whatever the
    /// mitigation stages wrote into it.
    ///
    /// A hit whose damage is fully mitigated deals no damage, draws no aggro and
    /// does not touch the knockback counter; the exchange still finalizes.
    fn use_on(
        &self,
        ctx: &mut SkillContext<'_>,
        actor: EntityId,
        target: EntityId,
    ) -> Result<FinalizedPack, SkillError> {
        let id = self.id();
        let params = &self.params;

        let (origin, stats, rank, armed) = {
            let attacker = ctx
                .region
                .creature(actor)
                .ok_or(SkillError::ActorNotFound(actor))?;
            let skill = attacker
                .skills
                .get(id)
                .ok_or(SkillError::SkillNotLearned { actor, skill: id })?;
            (
                attacker.position,
                attacker.stats,
                skill.rank_data,
                attacker.right_hand_has_tag(params.implement_tag),
            )
        };

        if target == actor {
            return Err(SkillError::InvalidTarget(target));
        }
        let destination = ctx
            .region
            .creature(target)
            .map(|t| t.position)
            .ok_or(SkillError::InvalidTarget(target))?;

        let range = self.range(&rank, armed);
        if !origin.in_range(&destination, range) {
            return Err(SkillError::OutOfRange {
                target,
                distance: origin.distance(&destination),
                range,
            });
        }

        let pack_id = ctx.region.next_pack_id();

        let mut attacker_action =
            AttackerAction::new(CombatActionType::RangeHit, actor, id, target);
        attacker_action.set(AttackerOptions::RESULT);

        let mut target_action = TargetAction::new(CombatActionType::TakeHit, target, actor, id);
        target_action.set(TargetOptions::RESULT);
        target_action.stun_ms = params.target_stun_ms;

        let seed = compute_seed(ctx.region.seed, pack_id.sequence, actor.0, rng_context::DAMAGE);
        let implement_bonus = if armed {
            params.implement_damage_bonus
        } else {
            0.0
        };
        let raw = magic_damage(
            ctx.rng,
            seed,
            rank.var1,
            rank.var2,
            implement_bonus,
            stats.magic_attack,
        );

        {
            let victim = ctx
                .region
                .creature_mut(target)
                .ok_or(SkillError::InvalidTarget(target))?;

            let position = victim.stop_move();
            ctx.outbox.push(Broadcast::StopMove {
                entity: target,
                position,
            });

            let already_dead = victim.is_dead();
            let damage = {
                let mut mitigation = MitigationContext::new(
                    raw,
                    &mut attacker_action,
                    &mut target_action,
                    victim,
                );
                self.pipeline.run(&mut mitigation)
            };

            if damage > 0.0 && !already_dead {
                victim.take_damage(damage);
                target_action.damage = damage;
                victim.aggro(actor);

                let outcome = resolve_hit_outcome(victim, ctx.config);
                target_action.set(outcome.options());
                if outcome.shoves() {
                    victim.position = victim
                        .position
                        .pushed_away_from(&origin, params.knockback_distance);
                    ctx.outbox.push(Broadcast::Knockback {
                        entity: target,
                        position: victim.position,
                    });
                }
            }
        }

        attacker_action.stun_ms = params.attacker_stun_ms;
        ctx.outbox.push(Broadcast::UseMagic { actor, skill: id });
        ctx.outbox.push(Broadcast::SkillUseStun {
            actor,
            skill: id,
            stun_ms: attacker_action.stun_ms,
        });

        if let Some(attacker) = ctx.region.creature_mut(actor) {
            learned_mut(attacker, id)?.consume_stack();
        }

        let pack = CombatActionPack::new(attacker_action, target_action);
        Ok(pack.finalize(pack_id, ctx.region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::effect::Outbox;
    use crate::env::FixedRng;
    use crate::skill::{Skill, SkillRank};
    use crate::state::{Creature, Item, Position, Region, RegionId};

    const MAGE: EntityId = EntityId(1);
    const WOLF: EntityId = EntityId(2);

    fn rank() -> RankData {
        RankData {
            range: 500,
            stack: 1,
            stack_max: 5,
            cast_time_ms: 1000,
            var1: 10.0,
            var2: 20.0,
            var3: 0.0,
        }
    }

    fn region(wolf_at: Position) -> Region {
        let mut region = Region::new(RegionId(1), "test", 99);
        let mut icebolt = Skill::new(SkillId::Icebolt, SkillRank::RF, rank());
        icebolt.add_stacks(1);
        region.spawn_creature(
            Creature::new(MAGE, "Mage", Position::ORIGIN, 100.0).with_skill(icebolt),
        );
        region.spawn_creature(Creature::new(WOLF, "Wolf", wolf_at, 100.0));
        region
    }

    #[test]
    fn unknown_target_has_no_side_effects() {
        let mut region = region(Position::new(100, 0));
        let mut outbox = Outbox::new();
        let config = CombatConfig::default();
        let mut ctx = SkillContext::new(&mut region, &mut outbox, &FixedRng::MIN, &config);

        let err = BoltSkill::icebolt()
            .use_on(&mut ctx, MAGE, EntityId(77))
            .unwrap_err();
        assert_eq!(err, SkillError::InvalidTarget(EntityId(77)));
        assert!(outbox.is_empty());
        let mage = region.creature(MAGE).unwrap();
        assert_eq!(mage.skills.get(SkillId::Icebolt).unwrap().stacks(), 1);
    }

    #[test]
    fn caster_cannot_target_itself() {
        let mut region = region(Position::new(100, 0));
        let mut outbox = Outbox::new();
        let config = CombatConfig::default();
        let mut ctx = SkillContext::new(&mut region, &mut outbox, &FixedRng::MIN, &config);

        let err = BoltSkill::icebolt().use_on(&mut ctx, MAGE, MAGE).unwrap_err();
        assert_eq!(err, SkillError::InvalidTarget(MAGE));
        assert!(outbox.is_empty());

        let mage = region.creature(MAGE).unwrap();
        assert_eq!(mage.life.current, 100.0);
        assert_eq!(mage.stun_ms, 0);
        assert_eq!(mage.skills.get(SkillId::Icebolt).unwrap().stacks(), 1);
    }

    #[test]
    fn wand_extends_range() {
        let skill = BoltSkill::icebolt();
        assert_eq!(skill.range(&rank(), false), 500);
        assert_eq!(skill.range(&rank(), true), 700);
        assert_eq!(BoltSkill::firebolt().params().implement_tag, "/fire_wand/");
    }

    #[test]
    fn hit_damages_and_stuns() {
        let mut region = region(Position::new(300, 400));
        let wand = Item::new(EntityId(10), 40038).with_tag("/equip/hand/wand/ice_wand/");
        region.creature_mut(MAGE).unwrap().right_hand = Some(wand);

        let mut outbox = Outbox::new();
        let config = CombatConfig::default();
        let mut ctx = SkillContext::new(&mut region, &mut outbox, &FixedRng::MIN, &config);
        let pack = BoltSkill::icebolt().use_on(&mut ctx, MAGE, WOLF).unwrap();

        let hit = pack.target_action(WOLF).unwrap();
        assert_eq!(hit.damage, 15.0);
        assert!(hit.has(TargetOptions::RESULT));
        assert!(!hit.is_knocked_down());

        let wolf = region.creature(WOLF).unwrap();
        assert_eq!(wolf.life.current, 85.0);
        assert_eq!(wolf.knockback, 45);
        assert_eq!(wolf.stun_ms, 2000);
        assert_eq!(wolf.aggro_target, Some(MAGE));

        let mage = region.creature(MAGE).unwrap();
        assert_eq!(mage.stun_ms, 500);
        assert_eq!(mage.skills.get(SkillId::Icebolt).unwrap().stacks(), 0);
        assert!(outbox.iter().any(|b| matches!(b, Broadcast::UseMagic { .. })));
    }
}
