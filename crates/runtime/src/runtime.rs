//! High-level runtime orchestrator.
//!
//! The runtime owns one worker per region, wires up command/event channels,
//! and exposes a builder-based API for the server to assemble it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use game_content::{Content, RegionSpec};
use game_core::{CombatConfig, Region, RegionId, SkillRegistry, TrainingRegistry};

use crate::api::{RegionHandle, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::handlers::{ExchangeHandler, HandlerRegistry, TrainingHandler};
use crate::oracle::OracleManager;
use crate::workers::{Command, RegionWorker, WorkerServices};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Period of the automatic stun countdown; `None` leaves ticking to
    /// explicit [`RegionHandle::tick`] calls.
    pub tick_interval: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            tick_interval: None,
        }
    }
}

/// Main runtime that hosts every region of the channel.
///
/// [`RegionHandle`]s are cloneable façades for client connections.
pub struct Runtime {
    regions: BTreeMap<RegionId, RegionHandle>,
    workers: Vec<JoinHandle<()>>,
    event_bus: EventBus,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Handle for `region`, if it is hosted here.
    pub fn region(&self, region: RegionId) -> Option<RegionHandle> {
        self.regions.get(&region).cloned()
    }

    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.keys().copied()
    }

    /// Subscribe to events of every region
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Shutdown the runtime gracefully
    ///
    /// Commands queued before the call are still processed.
    pub async fn shutdown(self) -> Result<()> {
        for handle in self.regions.values() {
            match handle.shutdown().await {
                // Worker already gone; its join below reports why.
                Ok(()) | Err(RuntimeError::CommandChannelClosed) => {}
                Err(err) => return Err(err),
            }
        }
        drop(self.regions);

        for worker in self.workers {
            worker.await.map_err(RuntimeError::WorkerJoin)?;
        }

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    skills: Option<SkillRegistry>,
    training: Option<TrainingRegistry>,
    handlers: Vec<Arc<dyn ExchangeHandler>>,
    regions: Vec<Region>,
    layouts: Vec<RegionSpec>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            skills: None,
            training: None,
            handlers: Vec::new(),
            regions: Vec::new(),
            layouts: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Override the skill handlers (defaults to [`SkillRegistry::with_defaults`]).
    pub fn skills(mut self, skills: SkillRegistry) -> Self {
        self.skills = Some(skills);
        self
    }

    /// Override the training tables (defaults to [`TrainingRegistry::with_defaults`]).
    pub fn training(mut self, training: TrainingRegistry) -> Self {
        self.training = Some(training);
        self
    }

    /// Adds an exchange handler next to the training handler.
    pub fn handler(mut self, handler: Arc<dyn ExchangeHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Hosts an already populated region.
    pub fn region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    /// Hosts a region built from a layout with a fresh random seed.
    pub fn layout(mut self, layout: RegionSpec) -> Self {
        self.layouts.push(layout);
        self
    }

    /// Applies everything loaded by the content factory.
    pub fn content(mut self, content: Content) -> Self {
        self.config.combat = content.config;
        self.oracles = Some(OracleManager::from_ranks(content.ranks));
        self.training = Some(content.training);
        self.layouts.extend(content.regions);
        self
    }

    /// Build the runtime and spawn one worker per region
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;

        let mut regions = self.regions;
        for layout in &self.layouts {
            regions.push(layout.build(rand::random(), oracles.skills())?);
        }

        let mut handlers = HandlerRegistry::new(self.handlers);
        handlers.register(Arc::new(TrainingHandler::new(
            self.training.unwrap_or_else(TrainingRegistry::with_defaults),
        )));

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let services = WorkerServices {
            skills: Arc::new(self.skills.unwrap_or_else(SkillRegistry::with_defaults)),
            oracles,
            handlers,
            config: self.config.combat.clone(),
            event_bus: event_bus.clone(),
        };

        let mut handles = BTreeMap::new();
        let mut workers = Vec::with_capacity(regions.len());
        for region in regions {
            let id = region.id;
            if handles.contains_key(&id) {
                return Err(RuntimeError::DuplicateRegion(id));
            }

            let (command_tx, command_rx) =
                mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
            let worker = RegionWorker::new(
                region,
                services.clone(),
                command_rx,
                self.config.tick_interval,
            );
            workers.push(tokio::spawn(async move {
                worker.run().await;
            }));
            handles.insert(id, RegionHandle::new(id, command_tx, event_bus.clone()));
        }

        info!(
            target: "runtime",
            regions = handles.len(),
            handlers = ?services.handlers.names(),
            "Runtime started"
        );

        Ok(Runtime {
            regions: handles,
            workers,
            event_bus,
        })
    }
}
