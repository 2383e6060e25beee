//! World state owned by a region: creatures, props and their items.
//!
//! Everything here is plain data plus small invariant-keeping mutators. The
//! combat resolver and skill handlers are the only code that mutates combat
//! fields (life, stun, knockback, stacks), and they do so on the region's
//! owning task.
mod common;
mod creature;
mod item;
mod prop;
mod region;

pub use common::{EntityId, Meter, Position, RegionId};
pub use creature::{CombatStats, Conditions, Creature, DamageReport};
pub use item::Item;
pub use prop::{Prop, PropBehavior, SwitchBehavior};
pub use region::Region;
