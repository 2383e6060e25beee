//! Props: static or scripted world objects players can hit or touch.

use std::fmt;
use std::sync::Arc;

use crate::effect::{Broadcast, Outbox};
use crate::state::{Creature, EntityId, Position};

/// Behavior bound to a prop, invoked when a creature hits or touches it.
///
/// Behaviors run on the region's owning task with exclusive access to both the
/// interacting creature and the prop.
pub trait PropBehavior: Send + Sync {
    /// Returns a human-readable name for this behavior (used in logging).
    fn name(&self) -> &'static str;

    fn on_interact(&self, actor: &mut Creature, prop: &mut Prop, outbox: &mut Outbox);
}

/// A prop placed in a region.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prop {
    pub id: EntityId,
    /// Name scripts use to refer to this prop (e.g. `Switch3`).
    pub name: String,
    pub position: Position,
    /// Free-form state string (`on`, `off`, `open`, ...).
    pub state: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    behavior: Option<Arc<dyn PropBehavior>>,
}

impl Prop {
    pub fn new(id: EntityId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            state: String::new(),
            behavior: None,
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: Arc<dyn PropBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn set_behavior(&mut self, behavior: Option<Arc<dyn PropBehavior>>) {
        self.behavior = behavior;
    }

    pub fn behavior(&self) -> Option<&Arc<dyn PropBehavior>> {
        self.behavior.as_ref()
    }

    /// Hex form of the id, as used in logs and scripts.
    pub fn id_hex(&self) -> String {
        self.id.to_string()
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prop")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("behavior", &self.behavior.as_ref().map(|b| b.name()))
            .finish()
    }
}

/// Switch that turns `on` the first time it is used and stays on.
///
/// Puzzle scripts watch for the resulting prop update to open doors or spawn
/// monsters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchBehavior;

impl SwitchBehavior {
    pub const ON: &'static str = "on";
    pub const OFF: &'static str = "off";
}

impl PropBehavior for SwitchBehavior {
    fn name(&self) -> &'static str {
        "switch"
    }

    fn on_interact(&self, _actor: &mut Creature, prop: &mut Prop, outbox: &mut Outbox) {
        if prop.state == Self::ON {
            return;
        }

        prop.state = Self::ON.to_string();
        outbox.push(Broadcast::PropUpdate {
            prop: prop.id,
            state: prop.state.clone(),
        });
    }
}
