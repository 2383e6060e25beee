//! Damage mitigation pipeline.
//!
//! Incoming damage flows through an ordered list of stages. Each stage may
//! lower the damage and annotate the exchange's descriptors; none may raise it
//! or push it below zero. Violations trip a debug assertion and are clamped in
//! release builds.

use crate::combat::{AttackerAction, CombatActionType, TargetAction, TargetOptions};
use crate::skill::{SkillId, SkillPhase};
use crate::state::{Conditions, Creature};

/// Mutable state threaded through the stages for one hit.
pub struct MitigationContext<'a> {
    pub damage: f32,
    pub attacker_action: &'a mut AttackerAction,
    pub target_action: &'a mut TargetAction,
    pub target: &'a mut Creature,
}

impl<'a> MitigationContext<'a> {
    pub fn new(
        damage: f32,
        attacker_action: &'a mut AttackerAction,
        target_action: &'a mut TargetAction,
        target: &'a mut Creature,
    ) -> Self {
        Self {
            damage,
            attacker_action,
            target_action,
            target,
        }
    }
}

/// One damage-rewriting step.
pub trait MitigationStage: Send + Sync {
    /// Returns a human-readable name for this stage (used in logging).
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &mut MitigationContext<'_>);
}

/// Ordered list of mitigation stages.
pub struct MitigationPipeline {
    stages: Vec<Box<dyn MitigationStage>>,
}

impl MitigationPipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Stages applied to magic hits: Defense, then magic defense/protection,
    /// then Mana Shield.
    pub fn magic() -> Self {
        Self::new()
            .with_stage(DefenseStage)
            .with_stage(MagicDefenseStage)
            .with_stage(ManaShieldStage)
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl MitigationStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.name())
    }

    /// Runs every stage in order and returns the final damage.
    pub fn run(&self, ctx: &mut MitigationContext<'_>) -> f32 {
        if ctx.damage.is_nan() || ctx.damage <= 0.0 {
            ctx.damage = 0.0;
        }

        for stage in &self.stages {
            let before = ctx.damage;
            stage.apply(ctx);

            debug_assert!(
                ctx.damage >= 0.0 && ctx.damage <= before,
                "mitigation stage `{}` moved damage from {} to {}",
                stage.name(),
                before,
                ctx.damage
            );
            ctx.damage = if ctx.damage.is_nan() {
                0.0
            } else {
                ctx.damage.clamp(0.0, before)
            };
        }

        ctx.damage
    }
}

impl Default for MitigationPipeline {
    fn default() -> Self {
        Self::magic()
    }
}

impl std::fmt::Debug for MitigationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}

// ============================================================================
// Defense
// ============================================================================

/// A readied Defense skill blocks the hit.
///
/// Damage is reduced by the rank's flat value (`var3`), both sides are stunned
/// and the Defense skill is spent.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefenseStage;

impl DefenseStage {
    pub const TARGET_STUN_MS: u32 = 1000;
    pub const ATTACKER_STUN_MS: u32 = 2500;
}

impl MitigationStage for DefenseStage {
    fn name(&self) -> &'static str {
        "defense"
    }

    fn apply(&self, ctx: &mut MitigationContext<'_>) {
        let Some(defense) = ctx.target.skills.get_mut(SkillId::Defense) else {
            return;
        };
        if !defense.is_ready() {
            return;
        }

        ctx.damage = (ctx.damage - defense.rank_data.var3.max(0.0)).max(0.0);

        ctx.target_action.kind = CombatActionType::Defended;
        ctx.target_action.set(TargetOptions::DEFENDED);
        ctx.target_action.stun_ms = Self::TARGET_STUN_MS;
        ctx.attacker_action.stun_ms = Self::ATTACKER_STUN_MS;

        defense.reset_stacks();
        defense.phase = SkillPhase::Idle;
    }
}

// ============================================================================
// Magic defense / protection
// ============================================================================

/// Flat magic defense followed by fractional magic protection.
///
/// A hit that arrived with at least one point of damage keeps at least one.
#[derive(Clone, Copy, Debug, Default)]
pub struct MagicDefenseStage;

impl MitigationStage for MagicDefenseStage {
    fn name(&self) -> &'static str {
        "magic_defense"
    }

    fn apply(&self, ctx: &mut MitigationContext<'_>) {
        let before = ctx.damage;
        if before <= 0.0 {
            return;
        }

        let stats = ctx.target.stats;
        let mut damage = (before - stats.magic_defense.max(0.0)).max(0.0);
        damage *= 1.0 - stats.magic_protection.clamp(0.0, 1.0);

        if before >= 1.0 && damage < 1.0 {
            damage = 1.0;
        }
        ctx.damage = damage.min(before);
    }
}

// ============================================================================
// Mana shield
// ============================================================================

/// Pays damage from mana while the shield is up.
///
/// Each point of mana absorbs `efficiency` points of damage, where efficiency is
/// the Mana Shield rank's `var1`. The shield drops once mana is exhausted.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManaShieldStage;

impl MitigationStage for ManaShieldStage {
    fn name(&self) -> &'static str {
        "mana_shield"
    }

    fn apply(&self, ctx: &mut MitigationContext<'_>) {
        if ctx.damage <= 0.0 || !ctx.target.conditions.contains(Conditions::MANA_SHIELD) {
            return;
        }

        let efficiency = ctx
            .target
            .skills
            .get(SkillId::ManaShield)
            .map(|skill| skill.rank_data.var1)
            .filter(|efficiency| *efficiency > 0.0)
            .unwrap_or(1.0);

        let mana = ctx.target.mana.current.max(0.0);
        let mana_needed = ctx.damage / efficiency;
        let mana_damage = mana_needed.min(mana);

        ctx.damage = if mana_damage >= mana_needed {
            0.0
        } else {
            (ctx.damage - mana_damage * efficiency).max(0.0)
        };
        ctx.target.mana.current = mana - mana_damage;

        if mana_damage > 0.0 {
            ctx.target_action.mana_damage += mana_damage;
            ctx.target_action.set(TargetOptions::MANA_SHIELD);
        }

        if ctx.target.mana.is_empty() {
            ctx.target.conditions.remove(Conditions::MANA_SHIELD);
            if let Some(shield) = ctx.target.skills.get_mut(SkillId::ManaShield) {
                shield.phase = SkillPhase::Idle;
            }
        }
    }
}
