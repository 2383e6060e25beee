use crate::combat::TargetOptions;
use crate::config::CombatConfig;
use crate::state::Creature;

/// How a damaging hit left its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    /// The hit killed the target.
    Finished,
    /// The target was already down; the hit keeps it there.
    KnockedDown,
    /// This hit pushed the knockback counter over the threshold.
    KnockedBack,
    /// Counter increased without crossing the threshold.
    Staggered,
}

impl HitOutcome {
    pub fn options(self) -> TargetOptions {
        match self {
            Self::Finished => TargetOptions::FINISHING_KNOCK_DOWN,
            Self::KnockedDown => TargetOptions::KNOCK_DOWN,
            Self::KnockedBack => TargetOptions::KNOCK_BACK,
            Self::Staggered => TargetOptions::empty(),
        }
    }

    /// True if the target is shoved away from the attacker.
    pub fn shoves(self) -> bool {
        matches!(self, Self::Finished | Self::KnockedBack)
    }
}

/// Classifies a damaging hit and advances the target's knockback counter.
///
/// Must run after damage was applied so a killing blow is seen as such.
pub fn resolve_hit_outcome(target: &mut Creature, config: &CombatConfig) -> HitOutcome {
    if target.is_dead() {
        return HitOutcome::Finished;
    }
    if target.knockback >= config.knockdown_threshold {
        return HitOutcome::KnockedDown;
    }

    target.knockback = target.knockback.saturating_add(config.knockback_increment);
    if target.knockback >= config.knockdown_threshold {
        HitOutcome::KnockedBack
    } else {
        HitOutcome::Staggered
    }
}
