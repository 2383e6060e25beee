//! Runtime orchestration for the channel server's combat core.
//!
//! This crate hosts every region on its own worker task and exposes it through
//! cloneable [`RegionHandle`]s. Consumers build a [`Runtime`], issue skill and
//! prop requests through the handles, and subscribe to topics on the
//! [`EventBus`] for effects, finalized packs, and training progress.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`handlers`] reacts to finalized exchanges (training)
//! - [`props`] dispatches hit/touch requests to prop behaviors
//! - [`oracle`] adapts loaded content for game-core
pub mod api;
pub mod events;
pub mod handlers;
pub mod oracle;
pub mod props;
pub mod runtime;

mod workers;

pub use api::{CombatSkillResult, RegionHandle, Result, RuntimeError};
pub use events::{CombatEvent, EffectEvent, Event, EventBus, Topic, TrainingEvent};
pub use handlers::{
    ExchangeContext, ExchangeHandler, HandlerCriticality, HandlerError, HandlerRegistry,
    TrainingHandler,
};
pub use oracle::{OracleManager, SkillOracleImpl};
pub use props::{PropInteraction, PropOutcome};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
