use crate::error::{ErrorSeverity, GameError};
use crate::skill::SkillId;
use crate::state::EntityId;

/// Failure of a skill request.
///
/// `InvalidTarget` and `OutOfRange` are the validation results a client sees;
/// the rest indicate a request that referenced missing data.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillError {
    #[error("target {0} does not exist in this region")]
    InvalidTarget(EntityId),

    #[error("target {target} is {distance:.0} units away, range is {range}")]
    OutOfRange {
        target: EntityId,
        distance: f64,
        range: u32,
    },

    #[error("actor {0} does not exist in this region")]
    ActorNotFound(EntityId),

    #[error("actor {actor} has not learned {skill}")]
    SkillNotLearned { actor: EntityId, skill: SkillId },

    #[error("{0} cannot be used on a target")]
    NotUsable(SkillId),

    #[error("no handler registered for {0}")]
    NoHandler(SkillId),
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidTarget(_) | Self::OutOfRange { .. } => ErrorSeverity::Validation,
            Self::SkillNotLearned { .. } | Self::NotUsable(_) | Self::NoHandler(_) => {
                ErrorSeverity::Missing
            }
            Self::ActorNotFound(_) => ErrorSeverity::Internal,
        }
    }

    fn actor(&self) -> Option<EntityId> {
        match self {
            Self::ActorNotFound(actor) | Self::SkillNotLearned { actor, .. } => Some(*actor),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTarget(_) => "SKILL_INVALID_TARGET",
            Self::OutOfRange { .. } => "SKILL_OUT_OF_RANGE",
            Self::ActorNotFound(_) => "SKILL_ACTOR_NOT_FOUND",
            Self::SkillNotLearned { .. } => "SKILL_NOT_LEARNED",
            Self::NotUsable(_) => "SKILL_NOT_USABLE",
            Self::NoHandler(_) => "SKILL_NO_HANDLER",
        }
    }
}
