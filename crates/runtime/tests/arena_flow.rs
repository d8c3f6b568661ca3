//! End-to-end flows through the runtime: join, cast, interrupt, die,
//! respawn, reset. Uses the paused tokio clock so deadline-driven behavior
//! is deterministic.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use arena_content::{Guardian, Sorcerer};
use arena_core::{Archetype, CharacterId, CombatEvent, Element, TeamId, WorldPoint};
use arena_runtime::{Runtime, RuntimeHandle};

const SORCERER: CharacterId = CharacterId(1);
const GUARDIAN: CharacterId = CharacterId(2);

fn guardian_position() -> WorldPoint {
    WorldPoint { x: 200.0, y: 0.0, z: 0.0 }
}

fn init_tracing() {
    // Set RUST_LOG=arena=trace to see the worker's JSON event lines.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn join_both(handle: &RuntimeHandle) {
    init_tracing();
    let sorcerer: Arc<dyn Archetype> = Arc::new(Sorcerer);
    let guardian: Arc<dyn Archetype> = Arc::new(Guardian);
    let events = handle
        .join(SORCERER, TeamId(0), sorcerer, WorldPoint::default())
        .await
        .unwrap();
    assert!(matches!(events[0], CombatEvent::Spawned { .. }));
    handle
        .join(GUARDIAN, TeamId(1), guardian, guardian_position())
        .await
        .unwrap();
}

fn drain(rx: &mut broadcast::Receiver<CombatEvent>) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn guardian_health(handle: &RuntimeHandle) -> f32 {
    let snapshot = handle.snapshot().await.unwrap();
    snapshot.character(GUARDIAN).unwrap().health().current()
}

#[tokio::test(start_paused = true)]
async fn cast_resolves_and_damages_the_enemy() {
    let runtime = Runtime::builder().build();
    let handle = runtime.handle();
    let mut events_rx = runtime.subscribe_events();
    join_both(&handle).await;

    // Slot 0 is the Sorcerer's fireball (1.2s cast).
    let events = handle.cast(SORCERER, 0, guardian_position()).await.unwrap();
    let CombatEvent::CastStarted { oil_remaining, .. } = &events[0] else {
        panic!("expected CastStarted, got {events:?}");
    };
    assert_eq!(*oil_remaining, 75.0);

    tokio::time::sleep(Duration::from_millis(1300)).await;

    let events = drain(&mut events_rx);
    assert!(events.iter().any(|e| matches!(e, CombatEvent::CastResolved { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        CombatEvent::DamageApplied { target, amount, element: Element::Fire, .. }
            if *target == GUARDIAN && *amount > 0.0
    )));
    assert!(guardian_health(&handle).await < 140.0);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn moving_interrupts_the_cast_and_keeps_the_cost() {
    let runtime = Runtime::builder().build();
    let handle = runtime.handle();
    let mut events_rx = runtime.subscribe_events();
    join_both(&handle).await;

    handle.cast(SORCERER, 0, guardian_position()).await.unwrap();
    handle
        .report_movement(SORCERER, WorldPoint::default(), 100.0)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let events = drain(&mut events_rx);
    assert!(events.iter().any(|e| matches!(e, CombatEvent::CastInterrupted { .. })));
    assert!(!events.iter().any(|e| matches!(e, CombatEvent::CastResolved { .. })));

    // The oil spent at cast start stays spent.
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.character(SORCERER).unwrap().oil().current(), 75.0);
    assert_eq!(guardian_health(&handle).await, 140.0);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn lethal_damage_dies_once_and_respawns_later() {
    let runtime = Runtime::builder().build();
    let handle = runtime.handle();
    join_both(&handle).await;

    let events = handle
        .inflict_damage(GUARDIAN, 1000.0, Element::Physical, None)
        .await
        .unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        CombatEvent::Died { victim, killer: None, .. } if *victim == GUARDIAN
    )));

    // A second blow lands on a corpse and changes nothing.
    let events = handle
        .inflict_damage(GUARDIAN, 1000.0, Element::Physical, None)
        .await
        .unwrap();
    assert!(events.is_empty());

    // Guardian respawn delay is 6s for the first death.
    tokio::time::sleep(Duration::from_millis(5500)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.character(GUARDIAN).unwrap().is_alive());

    tokio::time::sleep(Duration::from_millis(700)).await;
    let snapshot = handle.snapshot().await.unwrap();
    let guardian = snapshot.character(GUARDIAN).unwrap();
    assert!(guardian.is_alive());
    assert_eq!(guardian.health().current(), 140.0);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn round_reset_restores_everyone() {
    let runtime = Runtime::builder().build();
    let handle = runtime.handle();
    join_both(&handle).await;

    handle
        .inflict_damage(GUARDIAN, 50.0, Element::Lightning, None)
        .await
        .unwrap();
    handle
        .inflict_damage(SORCERER, 2000.0, Element::Fire, None)
        .await
        .unwrap();

    let events = handle.round_reset().await.unwrap();
    assert_eq!(events, vec![CombatEvent::RoundReset]);

    let snapshot = handle.snapshot().await.unwrap();
    for id in [SORCERER, GUARDIAN] {
        let character = snapshot.character(id).unwrap();
        assert!(character.is_alive());
        assert_eq!(character.health().current(), character.health().max());
        assert_eq!(character.deaths(), 0);
    }

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stance_switch_round_trips_through_the_worker() {
    let runtime = Runtime::builder().build();
    let handle = runtime.handle();
    join_both(&handle).await;

    let events = handle.switch_stance(GUARDIAN, 1).await.unwrap();
    assert!(matches!(events[0], CombatEvent::StanceChanged { .. }));

    // Inside the switch cooldown the request is swallowed.
    let events = handle.switch_stance(GUARDIAN, 1).await.unwrap();
    assert!(events.is_empty());

    drop(handle);
    runtime.shutdown().await.unwrap();
}
