//! Event types for different topics.

use game_core::{Broadcast, FinalizedPack, RegionId, TrainingAward};
use serde::{Deserialize, Serialize};

/// A client-visible effect produced inside a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEvent {
    pub region: RegionId,
    pub broadcast: Broadcast,
}

/// Events related to combat exchanges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A skill use resolved and its pack was sealed.
    ///
    /// Packs of one region are published in the order they were finalized.
    PackFinalized {
        region: RegionId,
        pack: FinalizedPack,
    },
}

/// Progress recorded on a training condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEvent {
    pub region: RegionId,
    pub award: TrainingAward,
}
