//! Cloneable façade for issuing commands to one region worker.
//!
//! [`RegionHandle`] hides channel plumbing and offers async helpers for every
//! request a client connection can make against its region.

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Creature, EntityId, Prop, Region, RegionId, SkillId, SkillRank};

use super::errors::{CombatSkillResult, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::props::{PropInteraction, PropOutcome};
use crate::workers::Command;

/// Client-facing handle to interact with a region
#[derive(Clone)]
pub struct RegionHandle {
    region: RegionId,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RegionHandle {
    pub(crate) fn new(
        region: RegionId,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            region,
            command_tx,
            event_bus,
        }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    // ========================================================================
    // Skills
    // ========================================================================

    /// Starts casting `skill`.
    pub async fn prepare(&self, actor: EntityId, skill: SkillId) -> Result<()> {
        self.request(|reply| Command::Prepare {
            actor,
            skill,
            reply,
        })
        .await?
    }

    /// Finishes casting `skill`; returns the stack count afterwards.
    pub async fn ready(&self, actor: EntityId, skill: SkillId) -> Result<u16> {
        self.request(|reply| Command::Ready {
            actor,
            skill,
            reply,
        })
        .await?
    }

    /// Uses the readied `skill` on `target`.
    pub async fn use_skill(
        &self,
        actor: EntityId,
        skill: SkillId,
        target: EntityId,
    ) -> Result<CombatSkillResult> {
        self.request(|reply| Command::Use {
            actor,
            skill,
            target,
            reply,
        })
        .await?
    }

    pub async fn complete(&self, actor: EntityId, skill: SkillId) -> Result<()> {
        self.request(|reply| Command::Complete {
            actor,
            skill,
            reply,
        })
        .await?
    }

    pub async fn cancel(&self, actor: EntityId, skill: SkillId) -> Result<()> {
        self.request(|reply| Command::Cancel {
            actor,
            skill,
            reply,
        })
        .await?
    }

    /// Teaches `skill` at `rank`, replacing any copy the actor already had.
    pub async fn learn_skill(&self, actor: EntityId, skill: SkillId, rank: SkillRank) -> Result<()> {
        self.request(|reply| Command::LearnSkill {
            actor,
            skill,
            rank,
            reply,
        })
        .await?
    }

    // ========================================================================
    // Props
    // ========================================================================

    pub async fn hit_prop(&self, actor: EntityId, prop: EntityId) -> Result<PropOutcome> {
        self.interact(actor, prop, PropInteraction::Hit).await
    }

    pub async fn touch_prop(&self, actor: EntityId, prop: EntityId) -> Result<PropOutcome> {
        self.interact(actor, prop, PropInteraction::Touch).await
    }

    pub async fn interact(
        &self,
        actor: EntityId,
        prop: EntityId,
        kind: PropInteraction,
    ) -> Result<PropOutcome> {
        self.request(|reply| Command::InteractProp {
            actor,
            prop,
            kind,
            reply,
        })
        .await
    }

    // ========================================================================
    // Lifetime & queries
    // ========================================================================

    /// Adds a creature; returns true if it replaced an existing one.
    pub async fn spawn(&self, creature: Creature) -> Result<bool> {
        self.request(|reply| Command::Spawn {
            creature: Box::new(creature),
            reply,
        })
        .await
    }

    pub async fn spawn_prop(&self, prop: Prop) -> Result<bool> {
        self.request(|reply| Command::SpawnProp {
            prop: Box::new(prop),
            reply,
        })
        .await
    }

    /// Removes a creature or prop; false if the id was unknown.
    pub async fn despawn(&self, entity: EntityId) -> Result<bool> {
        self.request(|reply| Command::Despawn { entity, reply })
            .await
    }

    /// Advances stun timers by `elapsed_ms`.
    pub async fn tick(&self, elapsed_ms: u32) -> Result<()> {
        self.request(|reply| Command::Tick { elapsed_ms, reply })
            .await
    }

    pub async fn query_creature(&self, id: EntityId) -> Result<Option<Creature>> {
        self.request(|reply| Command::QueryCreature { id, reply })
            .await
    }

    /// Read-only snapshot of the whole region.
    pub async fn query_region(&self) -> Result<Region> {
        self.request(|reply| Command::QueryRegion { reply }).await
    }

    /// Stops the worker after the commands already queued.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// Events from every region share the bus; filter on the `region` field
    /// when only this region matters.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
