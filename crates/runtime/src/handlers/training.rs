//! Handler feeding finalized exchanges to the training evaluator.

use game_core::{FinalizedPack, TrainingRegistry};
use tracing::debug;

use super::{ExchangeContext, ExchangeHandler, HandlerCriticality, HandlerError};
use crate::events::{Event, TrainingEvent};

/// Trains attackers from every exchange of a skill with a training table.
///
/// Attackers that do not know the skill, or left the region, are skipped.
pub struct TrainingHandler {
    tables: TrainingRegistry,
}

impl TrainingHandler {
    pub fn new(tables: TrainingRegistry) -> Self {
        Self { tables }
    }
}

impl ExchangeHandler for TrainingHandler {
    fn name(&self) -> &'static str {
        "training"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Optional
    }

    fn handle(
        &self,
        pack: &FinalizedPack,
        ctx: &mut ExchangeContext<'_>,
    ) -> Result<(), HandlerError> {
        let region = ctx.region.id;
        for award in self.tables.evaluate(pack, ctx.region) {
            debug!(
                target: "runtime::training",
                actor = %award.actor,
                skill = %award.skill,
                rank = %award.rank,
                condition = award.condition,
                count = award.count,
                "Training condition advanced"
            );
            ctx.events
                .publish(Event::Training(TrainingEvent { region, award }));
        }
        Ok(())
    }
}
