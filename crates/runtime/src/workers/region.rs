//! Region worker that owns one authoritative [`Region`].
//!
//! Receives commands from [`RegionHandle`](crate::RegionHandle), runs them
//! through the skill handlers and the prop dispatcher, and publishes the
//! resulting effects and packs to the EventBus. Commands are processed one at
//! a time, so every exchange is atomic with respect to every other request in
//! the region.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use game_core::{
    CombatConfig, Creature, EntityId, FinalizedPack, Outbox, Prop, Region, SkillContext,
    SkillError, SkillHandler, SkillId, SkillRank, SkillRegistry,
};

use crate::api::{CombatSkillResult, Result, RuntimeError};
use crate::events::{CombatEvent, EffectEvent, Event, EventBus};
use crate::handlers::{ExchangeContext, HandlerRegistry};
use crate::oracle::OracleManager;
use crate::props::{self, PropInteraction, PropOutcome};

/// Commands that can be sent to a region worker
pub enum Command {
    Prepare {
        actor: EntityId,
        skill: SkillId,
        reply: oneshot::Sender<Result<()>>,
    },
    Ready {
        actor: EntityId,
        skill: SkillId,
        reply: oneshot::Sender<Result<u16>>,
    },
    Use {
        actor: EntityId,
        skill: SkillId,
        target: EntityId,
        reply: oneshot::Sender<Result<CombatSkillResult>>,
    },
    Complete {
        actor: EntityId,
        skill: SkillId,
        reply: oneshot::Sender<Result<()>>,
    },
    Cancel {
        actor: EntityId,
        skill: SkillId,
        reply: oneshot::Sender<Result<()>>,
    },
    LearnSkill {
        actor: EntityId,
        skill: SkillId,
        rank: SkillRank,
        reply: oneshot::Sender<Result<()>>,
    },
    InteractProp {
        actor: EntityId,
        prop: EntityId,
        kind: PropInteraction,
        reply: oneshot::Sender<PropOutcome>,
    },
    Spawn {
        creature: Box<Creature>,
        reply: oneshot::Sender<bool>,
    },
    SpawnProp {
        prop: Box<Prop>,
        reply: oneshot::Sender<bool>,
    },
    Despawn {
        entity: EntityId,
        reply: oneshot::Sender<bool>,
    },
    Tick {
        elapsed_ms: u32,
        reply: oneshot::Sender<()>,
    },
    QueryCreature {
        id: EntityId,
        reply: oneshot::Sender<Option<Creature>>,
    },
    QueryRegion {
        reply: oneshot::Sender<Region>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Shared, read-only services every region worker uses.
#[derive(Clone)]
pub struct WorkerServices {
    pub skills: Arc<SkillRegistry>,
    pub oracles: OracleManager,
    pub handlers: HandlerRegistry,
    pub config: CombatConfig,
    pub event_bus: EventBus,
}

/// Background task that processes region commands.
pub struct RegionWorker {
    region: Region,
    services: WorkerServices,
    command_rx: mpsc::Receiver<Command>,
    tick_interval: Option<Duration>,
}

impl RegionWorker {
    pub fn new(
        region: Region,
        services: WorkerServices,
        command_rx: mpsc::Receiver<Command>,
        tick_interval: Option<Duration>,
    ) -> Self {
        info!(
            target: "runtime::region",
            region = %region.id,
            name = %region.name,
            creatures = region.creature_count(),
            props = region.prop_count(),
            "RegionWorker initialized"
        );

        Self {
            region,
            services,
            command_rx,
            tick_interval,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let mut ticker = self.tick_interval.map(Ticker::new);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown { reply }) => {
                        if reply.send(()).is_err() {
                            debug!(target: "runtime::region", "Shutdown reply channel closed (caller dropped)");
                        }
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                elapsed = next_tick(&mut ticker) => {
                    self.tick(elapsed);
                }
            }
        }

        info!(target: "runtime::region", region = %self.region.id, "RegionWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Prepare {
                actor,
                skill,
                reply,
            } => {
                let result = self.with_skill(skill, |handler, ctx| handler.prepare(ctx, actor));
                send_reply(reply, result, "Prepare");
            }
            Command::Ready {
                actor,
                skill,
                reply,
            } => {
                let result = self.with_skill(skill, |handler, ctx| handler.ready(ctx, actor));
                send_reply(reply, result, "Ready");
            }
            Command::Use {
                actor,
                skill,
                target,
                reply,
            } => {
                let result = self.use_skill(actor, skill, target);
                send_reply(reply, result, "Use");
            }
            Command::Complete {
                actor,
                skill,
                reply,
            } => {
                let result = self.with_skill(skill, |handler, ctx| handler.complete(ctx, actor));
                send_reply(reply, result, "Complete");
            }
            Command::Cancel {
                actor,
                skill,
                reply,
            } => {
                let result = self.with_skill(skill, |handler, ctx| handler.cancel(ctx, actor));
                send_reply(reply, result, "Cancel");
            }
            Command::LearnSkill {
                actor,
                skill,
                rank,
                reply,
            } => {
                let result = self.learn_skill(actor, skill, rank);
                send_reply(reply, result, "LearnSkill");
            }
            Command::InteractProp {
                actor,
                prop,
                kind,
                reply,
            } => {
                let mut outbox = Outbox::new();
                let outcome = props::dispatch(
                    &mut self.region,
                    &mut outbox,
                    self.services.config.prop_interaction_range,
                    actor,
                    prop,
                    kind,
                );
                self.publish_effects(outbox);
                send_reply(reply, outcome, "InteractProp");
            }
            Command::Spawn { creature, reply } => {
                debug!(target: "runtime::region", id = %creature.id, name = %creature.name, "Spawning creature");
                let replaced = self.region.spawn_creature(*creature).is_some();
                send_reply(reply, replaced, "Spawn");
            }
            Command::SpawnProp { prop, reply } => {
                debug!(target: "runtime::region", id = %prop.id, name = %prop.name, "Spawning prop");
                let replaced = self.region.spawn_prop(*prop).is_some();
                send_reply(reply, replaced, "SpawnProp");
            }
            Command::Despawn { entity, reply } => {
                let removed = self.region.despawn(entity);
                send_reply(reply, removed, "Despawn");
            }
            Command::Tick { elapsed_ms, reply } => {
                self.region
                    .tick(elapsed_ms, self.services.config.knockdown_threshold);
                send_reply(reply, (), "Tick");
            }
            Command::QueryCreature { id, reply } => {
                send_reply(reply, self.region.creature(id).cloned(), "QueryCreature");
            }
            Command::QueryRegion { reply } => {
                send_reply(reply, self.region.clone(), "QueryRegion");
            }
            Command::Shutdown { reply } => {
                send_reply(reply, (), "Shutdown");
            }
        }
    }

    /// Runs one skill request against the region and publishes its effects.
    fn with_skill<T>(
        &mut self,
        skill: SkillId,
        f: impl FnOnce(&dyn SkillHandler, &mut SkillContext<'_>) -> std::result::Result<T, SkillError>,
    ) -> Result<T> {
        let handler = Arc::clone(self.services.skills.get(skill)?);

        let mut outbox = Outbox::new();
        let result = {
            let mut ctx = SkillContext::new(
                &mut self.region,
                &mut outbox,
                &self.services.oracles.rng,
                &self.services.config,
            );
            f(handler.as_ref(), &mut ctx)
        };
        self.publish_effects(outbox);

        result.map_err(RuntimeError::from)
    }

    /// Resolves a skill use, then publishes the pack and runs the exchange
    /// handlers.
    fn use_skill(
        &mut self,
        actor: EntityId,
        skill: SkillId,
        target: EntityId,
    ) -> Result<CombatSkillResult> {
        let pack = match self.with_skill(skill, |handler, ctx| handler.use_on(ctx, actor, target)) {
            Ok(pack) => pack,
            Err(RuntimeError::Skill(error)) => {
                return match CombatSkillResult::rejected(&error) {
                    Some(result) => {
                        debug!(
                            target: "runtime::region",
                            %actor,
                            %skill,
                            %target,
                            error = %error,
                            "Skill use rejected"
                        );
                        Ok(result)
                    }
                    None => Err(error.into()),
                };
            }
            Err(error) => return Err(error),
        };

        debug!(
            target: "runtime::region",
            pack = %pack.id(),
            %actor,
            %skill,
            %target,
            "Exchange finalized"
        );
        self.publish_pack(&pack);

        let mut ctx = ExchangeContext {
            region: &mut self.region,
            events: &self.services.event_bus,
        };
        self.services.handlers.run(&pack, &mut ctx);

        Ok(CombatSkillResult::Okay(Box::new(pack)))
    }

    fn learn_skill(&mut self, actor: EntityId, skill: SkillId, rank: SkillRank) -> Result<()> {
        let learned = self
            .services
            .oracles
            .skills()
            .learn(skill, rank)
            .ok_or(RuntimeError::MissingRankData { skill, rank })?;
        let creature = self
            .region
            .creature_mut(actor)
            .ok_or(SkillError::ActorNotFound(actor))?;

        info!(target: "runtime::region", %actor, %skill, %rank, "Skill learned");
        creature.skills.insert(learned);
        Ok(())
    }

    fn tick(&mut self, elapsed: Duration) {
        let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
        self.region
            .tick(elapsed_ms, self.services.config.knockdown_threshold);
    }

    fn publish_effects(&self, mut outbox: Outbox) {
        let region = self.region.id;
        for broadcast in outbox.drain() {
            self.services
                .event_bus
                .publish(Event::Effect(EffectEvent { region, broadcast }));
        }
    }

    fn publish_pack(&self, pack: &FinalizedPack) {
        self.services.event_bus.publish(Event::Combat(CombatEvent::PackFinalized {
            region: self.region.id,
            pack: pack.clone(),
        }));
    }
}

/// Periodic stun countdown driver.
///
/// Reports the wall time since the previous tick, so delayed ticks on a busy
/// worker still count stuns down at real speed.
struct Ticker {
    interval: Interval,
    last: Instant,
}

impl Ticker {
    fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            last: Instant::now(),
        }
    }

    fn advance(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed
    }
}

/// Waits for the next tick, or forever when ticking is disabled.
async fn next_tick(ticker: &mut Option<Ticker>) -> Duration {
    match ticker {
        Some(ticker) => {
            let now = ticker.interval.tick().await;
            ticker.advance(now)
        }
        None => std::future::pending().await,
    }
}

fn send_reply<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!(target: "runtime::region", command, "Reply channel closed (caller dropped)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ticker_reports_time_since_previous_tick() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        let start = ticker.last;

        assert_eq!(
            ticker.advance(start + Duration::from_millis(350)),
            Duration::from_millis(350)
        );
        assert_eq!(
            ticker.advance(start + Duration::from_millis(400)),
            Duration::from_millis(50)
        );
        // A stale instant never yields negative time.
        assert_eq!(ticker.advance(start), Duration::ZERO);
    }
}
