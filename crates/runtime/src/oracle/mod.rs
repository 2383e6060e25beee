//! Runtime wrappers around static game content oracles.
//!
//! The data is immutable at runtime; dynamic state lives in the regions owned
//! by the workers.
mod skills;

use std::sync::Arc;

use game_core::{PcgRng, RankTable, SkillOracle};

pub use skills::SkillOracleImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) skills: Arc<SkillOracleImpl>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    /// Creates a new oracle manager
    pub fn new(skills: Arc<SkillOracleImpl>) -> Self {
        Self {
            skills,
            rng: PcgRng, // PcgRng is stateless
        }
    }

    pub fn from_ranks(table: RankTable) -> Self {
        Self::new(Arc::new(SkillOracleImpl::new(table)))
    }

    pub fn skills(&self) -> &dyn SkillOracle {
        self.skills.as_ref()
    }
}
