//! Prop interaction dispatch.
//!
//! Resolves a hit or touch request against the region, runs the prop's bound
//! behavior and always acknowledges the request. Hits are range checked;
//! touches only warn, because the prop's position is its center and large
//! props (doors, altars) are touched well away from it.

use std::fmt;

use game_core::{Broadcast, EntityId, Outbox, Region};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const UNKNOWN_TARGET: &str = "Unknown target.";
pub const TOO_FAR_AWAY: &str = "You're too far away.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropInteraction {
    Hit,
    Touch,
}

impl PropInteraction {
    fn ack(self, actor: EntityId, prop: EntityId) -> Broadcast {
        match self {
            PropInteraction::Hit => Broadcast::HitPropAck { actor, prop },
            PropInteraction::Touch => Broadcast::TouchPropAck { actor, prop },
        }
    }
}

impl fmt::Display for PropInteraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PropInteraction::Hit => "hit",
            PropInteraction::Touch => "touch",
        };
        write!(f, "{}", label)
    }
}

/// What came of an interaction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropOutcome {
    /// The prop's behavior ran.
    Invoked,
    /// The prop exists but has no behavior bound.
    Unimplemented,
    UnknownProp,
    /// Hit beyond the interaction range.
    TooFar,
    /// The requester is dead or not in this region.
    Ignored,
}

/// Handles one interaction and pushes the acknowledgement.
pub fn dispatch(
    region: &mut Region,
    outbox: &mut Outbox,
    range: u32,
    actor: EntityId,
    prop: EntityId,
    kind: PropInteraction,
) -> PropOutcome {
    let outcome = resolve(region, outbox, range, actor, prop, kind);
    outbox.push(kind.ack(actor, prop));
    outcome
}

fn resolve(
    region: &mut Region,
    outbox: &mut Outbox,
    range: u32,
    actor: EntityId,
    prop_id: EntityId,
    kind: PropInteraction,
) -> PropOutcome {
    let Some(requester) = region.creature(actor) else {
        warn!(target: "runtime::props", %actor, %kind, "Interaction from creature outside the region");
        return PropOutcome::Ignored;
    };
    if requester.is_dead() {
        debug!(target: "runtime::props", %actor, %kind, "Dead creature tried to interact with a prop");
        return PropOutcome::Ignored;
    }
    let name = requester.name.clone();
    let origin = requester.position;

    let Some(prop) = region.prop(prop_id) else {
        warn!(
            target: "runtime::props",
            "Player '{}' tried to {} unknown prop '{}'.",
            name, kind, prop_id
        );
        outbox.push(Broadcast::ServerMessage {
            actor,
            text: UNKNOWN_TARGET.to_string(),
        });
        return PropOutcome::UnknownProp;
    };

    if !origin.in_range(&prop.position, range) {
        match kind {
            PropInteraction::Hit => {
                outbox.push(Broadcast::Notice {
                    actor,
                    text: TOO_FAR_AWAY.to_string(),
                });
                warn!(
                    target: "runtime::props",
                    "Player '{}' tried to hit prop '{}' out of range.",
                    name, prop_id
                );
                return PropOutcome::TooFar;
            }
            PropInteraction::Touch => {
                warn!(
                    target: "runtime::props",
                    distance = origin.distance(&prop.position),
                    "Player '{}' tried to touch prop '{}' out of range.",
                    name, prop_id
                );
            }
        }
    }

    if kind == PropInteraction::Hit {
        outbox.push(Broadcast::HittingProp {
            actor,
            prop: prop_id,
        });
    }

    let Some(behavior) = prop.behavior().cloned() else {
        warn!(
            target: "runtime::unimplemented",
            "No prop behavior for '{}' ({}).",
            prop.id_hex(), kind
        );
        return PropOutcome::Unimplemented;
    };

    match region.creature_and_prop_mut(actor, prop_id) {
        Some((creature, prop)) => {
            debug!(
                target: "runtime::props",
                behavior = behavior.name(),
                %actor,
                prop = %prop.id_hex(),
                %kind,
                "Running prop behavior"
            );
            behavior.on_interact(creature, prop, outbox);
            PropOutcome::Invoked
        }
        None => PropOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use game_core::{Creature, Position, Prop, RegionId, SwitchBehavior};

    const PLAYER: EntityId = EntityId(1);
    const SWITCH: EntityId = EntityId(0xA0);
    const CHEST: EntityId = EntityId(0xA1);

    fn region(player_at: Position) -> Region {
        let mut region = Region::new(RegionId(1), "test", 0);
        region.spawn_creature(Creature::new(PLAYER, "Player", player_at, 100.0));
        region.spawn_prop(
            Prop::new(SWITCH, "Switch1", Position::ORIGIN)
                .with_state(SwitchBehavior::OFF)
                .with_behavior(Arc::new(SwitchBehavior)),
        );
        region.spawn_prop(Prop::new(CHEST, "Chest", Position::ORIGIN));
        region
    }

    #[test]
    fn hit_boundary_is_inclusive() {
        let mut region = region(Position::new(0, 1500));
        let mut outbox = Outbox::new();
        let outcome = dispatch(&mut region, &mut outbox, 1500, PLAYER, SWITCH, PropInteraction::Hit);

        assert_eq!(outcome, PropOutcome::Invoked);
        assert_eq!(region.prop(SWITCH).unwrap().state, SwitchBehavior::ON);
        assert_eq!(
            outbox.drain(),
            vec![
                Broadcast::HittingProp {
                    actor: PLAYER,
                    prop: SWITCH,
                },
                Broadcast::PropUpdate {
                    prop: SWITCH,
                    state: SwitchBehavior::ON.to_string(),
                },
                Broadcast::HitPropAck {
                    actor: PLAYER,
                    prop: SWITCH,
                },
            ]
        );
    }

    #[test]
    fn hit_out_of_range_notices_and_acks() {
        let mut region = region(Position::new(0, 1501));
        let mut outbox = Outbox::new();
        let outcome = dispatch(&mut region, &mut outbox, 1500, PLAYER, SWITCH, PropInteraction::Hit);

        assert_eq!(outcome, PropOutcome::TooFar);
        assert_eq!(region.prop(SWITCH).unwrap().state, SwitchBehavior::OFF);
        assert_eq!(
            outbox.drain(),
            vec![
                Broadcast::Notice {
                    actor: PLAYER,
                    text: TOO_FAR_AWAY.to_string(),
                },
                Broadcast::HitPropAck {
                    actor: PLAYER,
                    prop: SWITCH,
                },
            ]
        );
    }

    #[test]
    fn touch_ignores_range() {
        let mut region = region(Position::new(0, 2000));
        let mut outbox = Outbox::new();
        let outcome =
            dispatch(&mut region, &mut outbox, 1500, PLAYER, SWITCH, PropInteraction::Touch);

        assert_eq!(outcome, PropOutcome::Invoked);
        assert_eq!(region.prop(SWITCH).unwrap().state, SwitchBehavior::ON);
        let effects = outbox.drain();
        assert!(matches!(effects.last(), Some(Broadcast::TouchPropAck { .. })));
        assert!(
            !effects
                .iter()
                .any(|b| matches!(b, Broadcast::HittingProp { .. }))
        );
    }

    #[test]
    fn missing_behavior_is_a_noop() {
        let mut region = region(Position::ORIGIN);
        let mut outbox = Outbox::new();
        let outcome = dispatch(&mut region, &mut outbox, 1500, PLAYER, CHEST, PropInteraction::Hit);

        assert_eq!(outcome, PropOutcome::Unimplemented);
        assert_eq!(
            outbox.drain(),
            vec![
                Broadcast::HittingProp {
                    actor: PLAYER,
                    prop: CHEST,
                },
                Broadcast::HitPropAck {
                    actor: PLAYER,
                    prop: CHEST,
                },
            ]
        );
    }

    #[test]
    fn dead_requester_is_ignored_but_acked() {
        let mut region = region(Position::ORIGIN);
        region.creature_mut(PLAYER).unwrap().take_damage(1000.0);
        let mut outbox = Outbox::new();
        let outcome = dispatch(&mut region, &mut outbox, 1500, PLAYER, SWITCH, PropInteraction::Hit);

        assert_eq!(outcome, PropOutcome::Ignored);
        assert_eq!(region.prop(SWITCH).unwrap().state, SwitchBehavior::OFF);
        assert_eq!(outbox.len(), 1);
    }
}
