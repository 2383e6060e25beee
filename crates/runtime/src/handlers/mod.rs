//! Handlers reacting to finalized combat exchanges.
//!
//! After a pack is sealed and published, the region worker hands it to every
//! registered [`ExchangeHandler`] in priority order. Handlers run on the
//! region's task, so they see the region exactly as the exchange left it.

mod registry;
mod training;

pub use registry::HandlerRegistry;
pub use training::TrainingHandler;

use game_core::{EntityId, FinalizedPack, Region};
use thiserror::Error;

use crate::events::EventBus;

/// Criticality level for handler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerCriticality {
    /// Failure is logged as an error and stops the remaining handlers.
    Critical,
    /// Failure is logged but execution continues.
    Important,
    /// Failure can be ignored.
    Optional,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("entity {0} is not in the region")]
    EntityMissing(EntityId),

    #[error("{0}")]
    Rejected(String),
}

/// Context provided to handlers.
pub struct ExchangeContext<'a> {
    pub region: &'a mut Region,
    pub events: &'a EventBus,
}

pub trait ExchangeHandler: Send + Sync {
    /// Returns a human-readable name for this handler (used in logging).
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Important
    }

    fn handle(
        &self,
        pack: &FinalizedPack,
        ctx: &mut ExchangeContext<'_>,
    ) -> Result<(), HandlerError>;
}
