//! Region state and the read-only spatial accessor contract.

use std::collections::BTreeMap;

use crate::combat::PackId;
use crate::state::{Creature, EntityId, Prop, RegionId};

/// A region owns every creature and prop inside it.
///
/// Lookups return `None` for unknown ids; absence is an ordinary outcome that
/// callers branch on, not an error.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    /// Base seed mixed into every random roll made in this region.
    pub seed: u64,
    creatures: BTreeMap<EntityId, Creature>,
    props: BTreeMap<EntityId, Prop>,
    next_pack: u64,
}

impl Region {
    pub fn new(id: RegionId, name: impl Into<String>, seed: u64) -> Self {
        Self {
            id,
            name: name.into(),
            seed,
            creatures: BTreeMap::new(),
            props: BTreeMap::new(),
            next_pack: 1,
        }
    }

    // ========================================================================
    // Accessor
    // ========================================================================

    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    pub fn prop(&self, id: EntityId) -> Option<&Prop> {
        self.props.get(&id)
    }

    pub fn prop_mut(&mut self, id: EntityId) -> Option<&mut Prop> {
        self.props.get_mut(&id)
    }

    /// Mutable access to a creature and a prop at the same time.
    pub fn creature_and_prop_mut(
        &mut self,
        creature: EntityId,
        prop: EntityId,
    ) -> Option<(&mut Creature, &mut Prop)> {
        let creature = self.creatures.get_mut(&creature)?;
        let prop = self.props.get_mut(&prop)?;
        Some((creature, prop))
    }

    /// Distance between two entities of this region (creatures or props).
    pub fn distance(&self, a: EntityId, b: EntityId) -> Option<f64> {
        let a = self.position_of(a)?;
        let b = self.position_of(b)?;
        Some(a.distance(&b))
    }

    pub fn position_of(&self, id: EntityId) -> Option<crate::state::Position> {
        self.creatures
            .get(&id)
            .map(|c| c.position)
            .or_else(|| self.props.get(&id).map(|p| p.position))
    }

    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values()
    }

    pub fn props(&self) -> impl Iterator<Item = &Prop> {
        self.props.values()
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    pub fn prop_count(&self) -> usize {
        self.props.len()
    }

    // ========================================================================
    // Lifetime
    // ========================================================================

    /// Adds a creature, replacing any entity that used the same id.
    pub fn spawn_creature(&mut self, creature: Creature) -> Option<Creature> {
        self.creatures.insert(creature.id, creature)
    }

    pub fn spawn_prop(&mut self, prop: Prop) -> Option<Prop> {
        self.props.insert(prop.id, prop)
    }

    /// Removes a creature or prop. Returns false if the id was unknown.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.creatures.remove(&id).is_some() || self.props.remove(&id).is_some()
    }

    // ========================================================================
    // Sequencing
    // ========================================================================

    /// Hands out the next exchange sequence number for this region.
    pub fn next_pack_id(&mut self) -> PackId {
        let id = PackId::new(self.id, self.next_pack);
        self.next_pack += 1;
        id
    }

    /// Advances transient combat timers for every creature.
    pub fn tick(&mut self, elapsed_ms: u32, knockdown_threshold: i32) {
        for creature in self.creatures.values_mut() {
            creature.recover(elapsed_ms, knockdown_threshold);
        }
    }
}
