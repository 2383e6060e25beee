//! Ordered handler set.

use std::sync::Arc;

use game_core::FinalizedPack;
use tracing::{debug, error, warn};

use super::{ExchangeContext, ExchangeHandler, HandlerCriticality};

/// Handlers sorted by priority.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn ExchangeHandler>>,
}

impl HandlerRegistry {
    pub fn new(mut handlers: Vec<Arc<dyn ExchangeHandler>>) -> Self {
        handlers.sort_by_key(|handler| handler.priority());
        Self { handlers }
    }

    pub fn register(&mut self, handler: Arc<dyn ExchangeHandler>) {
        self.handlers.push(handler);
        self.handlers.sort_by_key(|handler| handler.priority());
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every handler on `pack`. Returns false if a critical handler
    /// failed and the chain was cut short.
    pub fn run(&self, pack: &FinalizedPack, ctx: &mut ExchangeContext<'_>) -> bool {
        for handler in &self.handlers {
            let Err(err) = handler.handle(pack, ctx) else {
                continue;
            };

            match handler.criticality() {
                HandlerCriticality::Critical => {
                    error!(
                        target: "runtime::handlers",
                        handler = handler.name(),
                        pack = %pack.id(),
                        error = %err,
                        "Critical handler failed"
                    );
                    return false;
                }
                HandlerCriticality::Important => {
                    warn!(
                        target: "runtime::handlers",
                        handler = handler.name(),
                        pack = %pack.id(),
                        error = %err,
                        "Handler failed"
                    );
                }
                HandlerCriticality::Optional => {
                    debug!(
                        target: "runtime::handlers",
                        handler = handler.name(),
                        error = %err,
                        "Optional handler failed"
                    );
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::events::EventBus;
    use crate::handlers::HandlerError;
    use game_core::{
        AttackerAction, CombatActionPack, CombatActionType, EntityId, Region, RegionId, SkillId,
        TargetAction,
    };

    struct Recorder {
        name: &'static str,
        priority: i32,
        criticality: HandlerCriticality,
        fail: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ExchangeHandler for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn criticality(&self) -> HandlerCriticality {
            self.criticality
        }

        fn handle(
            &self,
            _pack: &FinalizedPack,
            _ctx: &mut ExchangeContext<'_>,
        ) -> Result<(), HandlerError> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                Err(HandlerError::Rejected("boom".into()))
            } else {
                Ok(())
            }
        }
    }

    fn recorder(
        name: &'static str,
        priority: i32,
        criticality: HandlerCriticality,
        fail: bool,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn ExchangeHandler> {
        Arc::new(Recorder {
            name,
            priority,
            criticality,
            fail,
            log: Arc::clone(log),
        })
    }

    fn pack(region: &mut Region) -> FinalizedPack {
        let id = region.next_pack_id();
        CombatActionPack::new(
            AttackerAction::new(CombatActionType::RangeHit, EntityId(1), SkillId::Icebolt, EntityId(2)),
            TargetAction::new(CombatActionType::TakeHit, EntityId(2), EntityId(1), SkillId::Icebolt),
        )
        .finalize(id, region)
    }

    #[test]
    fn runs_by_priority_and_stops_on_critical_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HandlerRegistry::new(vec![
            recorder("late", 10, HandlerCriticality::Important, false, &log),
            recorder("critical", 0, HandlerCriticality::Critical, true, &log),
            recorder("early", -10, HandlerCriticality::Optional, true, &log),
        ]);
        assert_eq!(registry.names(), vec!["early", "critical", "late"]);

        let mut region = Region::new(RegionId(1), "test", 0);
        let pack = pack(&mut region);
        let bus = EventBus::new();
        let mut ctx = ExchangeContext {
            region: &mut region,
            events: &bus,
        };

        assert!(!registry.run(&pack, &mut ctx));
        assert_eq!(*log.lock().unwrap(), vec!["early", "critical"]);
    }
}
