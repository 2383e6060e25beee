//! End-to-end flows through a running region worker.

use std::sync::Arc;

use channel_runtime::{
    CombatEvent, CombatSkillResult, Event, OracleManager, PropOutcome, RegionHandle, Runtime,
    RuntimeError, Topic,
};
use game_core::{
    Broadcast, CombatStats, Creature, EntityId, Position, Prop, RankData, RankTable, Region,
    RegionId, SkillError, SkillId, SkillRank, SwitchBehavior, TargetOptions,
};
use tokio::sync::broadcast;

const REGION: RegionId = RegionId(13);
const MAGE: EntityId = EntityId(0x10000000000001);
const WOLF: EntityId = EntityId(0x10000000000002);
const SWITCH: EntityId = EntityId(0xA0010000000001);

fn ranks() -> RankTable {
    RankTable::new().with_rank(
        SkillId::Icebolt,
        SkillRank::RF,
        RankData {
            range: 1200,
            stack: 1,
            stack_max: 5,
            cast_time_ms: 1000,
            var1: 10.0,
            var2: 20.0,
            var3: 0.0,
        },
    )
}

fn region() -> Region {
    let mut region = Region::new(REGION, "Alby Dungeon", 42);
    region.spawn_creature(
        Creature::new(MAGE, "Mage", Position::ORIGIN, 100.0).with_stats(CombatStats {
            combat_power: 100.0,
            ..CombatStats::default()
        }),
    );
    region.spawn_creature(
        Creature::new(WOLF, "Gray Wolf", Position::new(0, 800), 100.0).with_stats(CombatStats {
            combat_power: 60.0,
            ..CombatStats::default()
        }),
    );
    region.spawn_prop(
        Prop::new(SWITCH, "Switch1", Position::new(0, 2000))
            .with_state(SwitchBehavior::OFF)
            .with_behavior(Arc::new(SwitchBehavior)),
    );
    region
}

async fn start() -> (Runtime, RegionHandle) {
    let runtime = Runtime::builder()
        .oracles(OracleManager::from_ranks(ranks()))
        .region(region())
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.region(REGION).expect("region is hosted");
    handle
        .learn_skill(MAGE, SkillId::Icebolt, SkillRank::RF)
        .await
        .expect("rank data exists");
    (runtime, handle)
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn broadcasts(events: &[Event]) -> Vec<Broadcast> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Effect(effect) => Some(effect.broadcast.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn cast_cycle_resolves_and_trains() {
    let (runtime, handle) = start().await;
    let mut effects = runtime.subscribe(Topic::Effects);
    let mut combat = runtime.subscribe(Topic::Combat);
    let mut training = runtime.subscribe(Topic::Training);

    handle.prepare(MAGE, SkillId::Icebolt).await.unwrap();
    assert_eq!(handle.ready(MAGE, SkillId::Icebolt).await.unwrap(), 1);

    let result = handle
        .use_skill(MAGE, SkillId::Icebolt, WOLF)
        .await
        .unwrap();
    let pack = result.pack().expect("bolt should land").clone();
    let hit = pack.target_action(WOLF).unwrap();
    assert!(hit.damage >= 10.0 && hit.damage <= 20.0);
    assert!(hit.has(TargetOptions::RESULT));
    assert_eq!(pack.attacker(), MAGE);
    assert_eq!(pack.attacker_actions().next().map(|a| a.stun_ms), Some(500));

    handle.complete(MAGE, SkillId::Icebolt).await.unwrap();

    let wolf = handle.query_creature(WOLF).await.unwrap().unwrap();
    assert_eq!(wolf.life.current, 100.0 - hit.damage.trunc());
    assert_eq!(wolf.knockback, 45);
    assert_eq!(wolf.aggro_target, Some(MAGE));

    let mage = handle.query_creature(MAGE).await.unwrap().unwrap();
    assert_eq!(mage.skills.get(SkillId::Icebolt).unwrap().stacks(), 0);

    let effects = broadcasts(&drain(&mut effects));
    assert!(matches!(effects.first(), Some(Broadcast::StopMove { entity, .. }) if *entity == MAGE));
    assert!(effects.contains(&Broadcast::UseMagic {
        actor: MAGE,
        skill: SkillId::Icebolt,
    }));
    assert!(matches!(
        effects.last(),
        Some(Broadcast::SkillComplete { .. })
    ));

    let combat = drain(&mut combat);
    assert_eq!(
        combat,
        vec![Event::Combat(CombatEvent::PackFinalized {
            region: REGION,
            pack,
        })]
    );

    // Rank F trains "attack anything" and "attack an enemy" on every hit.
    let conditions: Vec<u8> = drain(&mut training)
        .into_iter()
        .filter_map(|event| match event {
            Event::Training(event) => Some(event.award.condition),
            _ => None,
        })
        .collect();
    assert_eq!(conditions, vec![1, 2]);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn validation_failures_are_results() {
    let (runtime, handle) = start().await;
    handle.ready(MAGE, SkillId::Icebolt).await.unwrap();
    let mut combat = runtime.subscribe(Topic::Combat);

    let missing = handle
        .use_skill(MAGE, SkillId::Icebolt, EntityId(404))
        .await
        .unwrap();
    assert_eq!(missing, CombatSkillResult::InvalidTarget);

    handle
        .spawn(Creature::new(EntityId(9), "Far Wolf", Position::new(0, 1201), 50.0))
        .await
        .unwrap();
    let far = handle
        .use_skill(MAGE, SkillId::Icebolt, EntityId(9))
        .await
        .unwrap();
    assert_eq!(far, CombatSkillResult::OutOfRange);

    let mage = handle.query_creature(MAGE).await.unwrap().unwrap();
    assert_eq!(mage.skills.get(SkillId::Icebolt).unwrap().stacks(), 1);
    assert!(drain(&mut combat).is_empty());

    let err = handle
        .use_skill(EntityId(404), SkillId::Icebolt, WOLF)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Skill(SkillError::ActorNotFound(EntityId(404)))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn cancel_drops_every_stack() {
    let (runtime, handle) = start().await;
    for expected in 1..=3 {
        assert_eq!(handle.ready(MAGE, SkillId::Icebolt).await.unwrap(), expected);
    }

    let mut effects = runtime.subscribe(Topic::Effects);
    handle.cancel(MAGE, SkillId::Icebolt).await.unwrap();

    assert_eq!(
        broadcasts(&drain(&mut effects)),
        vec![
            Broadcast::StackUpdate {
                actor: MAGE,
                skill: SkillId::Icebolt,
                stacks: 0,
            },
            Broadcast::MotionCancel { actor: MAGE },
        ]
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn hitting_unknown_prop_reports_and_acks() {
    let (runtime, handle) = start().await;
    let mut effects = runtime.subscribe(Topic::Effects);

    let outcome = handle.hit_prop(MAGE, EntityId(0xDEAD)).await.unwrap();

    assert_eq!(outcome, PropOutcome::UnknownProp);
    assert_eq!(
        broadcasts(&drain(&mut effects)),
        vec![
            Broadcast::ServerMessage {
                actor: MAGE,
                text: "Unknown target.".to_string(),
            },
            Broadcast::HitPropAck {
                actor: MAGE,
                prop: EntityId(0xDEAD),
            },
        ]
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn far_switch_can_be_touched_but_not_hit() {
    let (runtime, handle) = start().await;
    let mut effects = runtime.subscribe(Topic::Effects);

    assert_eq!(handle.hit_prop(MAGE, SWITCH).await.unwrap(), PropOutcome::TooFar);
    let region = handle.query_region().await.unwrap();
    assert_eq!(region.prop(SWITCH).unwrap().state, SwitchBehavior::OFF);

    assert_eq!(handle.touch_prop(MAGE, SWITCH).await.unwrap(), PropOutcome::Invoked);
    let region = handle.query_region().await.unwrap();
    assert_eq!(region.prop(SWITCH).unwrap().state, SwitchBehavior::ON);

    assert_eq!(
        broadcasts(&drain(&mut effects)),
        vec![
            Broadcast::Notice {
                actor: MAGE,
                text: "You're too far away.".to_string(),
            },
            Broadcast::HitPropAck {
                actor: MAGE,
                prop: SWITCH,
            },
            Broadcast::PropUpdate {
                prop: SWITCH,
                state: SwitchBehavior::ON.to_string(),
            },
            Broadcast::TouchPropAck {
                actor: MAGE,
                prop: SWITCH,
            },
        ]
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn tick_counts_down_stun() {
    let (runtime, handle) = start().await;
    handle.ready(MAGE, SkillId::Icebolt).await.unwrap();
    handle
        .use_skill(MAGE, SkillId::Icebolt, WOLF)
        .await
        .unwrap();

    handle.tick(1500).await.unwrap();
    let wolf = handle.query_creature(WOLF).await.unwrap().unwrap();
    assert_eq!(wolf.stun_ms, 500);
    let mage = handle.query_creature(MAGE).await.unwrap().unwrap();
    assert_eq!(mage.stun_ms, 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn learning_without_rank_data_fails() {
    let (runtime, handle) = start().await;

    let err = handle
        .learn_skill(MAGE, SkillId::Firebolt, SkillRank::RA)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::MissingRankData {
            skill: SkillId::Firebolt,
            rank: SkillRank::RA,
        }
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn despawned_target_is_invalid() {
    let (runtime, handle) = start().await;
    handle.ready(MAGE, SkillId::Icebolt).await.unwrap();

    assert!(handle.despawn(WOLF).await.unwrap());
    assert!(!handle.despawn(WOLF).await.unwrap());
    assert_eq!(
        handle
            .use_skill(MAGE, SkillId::Icebolt, WOLF)
            .await
            .unwrap(),
        CombatSkillResult::InvalidTarget
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn builder_requires_oracles() {
    let result = Runtime::builder().region(region()).build().await;
    assert!(matches!(result, Err(RuntimeError::MissingOracles)));
}

#[tokio::test]
async fn duplicate_regions_are_rejected() {
    let result = Runtime::builder()
        .oracles(OracleManager::from_ranks(ranks()))
        .region(region())
        .region(region())
        .build()
        .await;
    assert!(matches!(result, Err(RuntimeError::DuplicateRegion(REGION))));
}
