//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, skill handlers, and content so
//! clients can bubble them up with consistent context.

use game_core::{FinalizedPack, RegionId, SkillError, SkillId, SkillRank};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("region worker command channel closed")]
    CommandChannelClosed,

    #[error("region worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("region worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error("no rank data for {skill} rank {rank}")]
    MissingRankData { skill: SkillId, rank: SkillRank },

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("{0} is registered twice")]
    DuplicateRegion(RegionId),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}

/// Result of a skill use as seen by the requester.
///
/// Validation failures are ordinary outcomes; every other [`SkillError`]
/// surfaces as [`RuntimeError::Skill`].
#[derive(Debug, Clone, PartialEq)]
pub enum CombatSkillResult {
    Okay(Box<FinalizedPack>),
    InvalidTarget,
    OutOfRange,
}

impl CombatSkillResult {
    /// Maps a validation failure to its result, `None` for anything else.
    pub fn rejected(error: &SkillError) -> Option<Self> {
        match error {
            SkillError::InvalidTarget(_) => Some(Self::InvalidTarget),
            SkillError::OutOfRange { .. } => Some(Self::OutOfRange),
            _ => None,
        }
    }

    pub fn is_okay(&self) -> bool {
        matches!(self, Self::Okay(_))
    }

    pub fn pack(&self) -> Option<&FinalizedPack> {
        match self {
            Self::Okay(pack) => Some(pack),
            _ => None,
        }
    }
}
