use tether_client::{ComponentUpdates, FieldCell, SyncState, Vector3};
use tether_shared::{TAG_GROUP, UNIQUE_ID_GROUP};
use tether_test::{
    assert_fields_mask, assert_stopped_mask, init_logging, TestEntity, TestLifecycle,
    TestProtocol, TestTransport,
};

fn owned_entity() -> (TestEntity, TestTransport, TestLifecycle) {
    init_logging();
    let entity = TestEntity::new(1, TestProtocol::standard());
    let transport = TestTransport::new(1);
    let mut lifecycle = TestLifecycle::new();
    lifecycle.own(entity.entity());
    (entity, transport, lifecycle)
}

fn tick(
    entity: &mut TestEntity,
    transport: &mut TestTransport,
    lifecycle: &mut TestLifecycle,
) -> Vec<ComponentUpdates> {
    entity.sync.tick(transport, lifecycle);
    transport.advance();
    transport.take_updates()
}

#[test]
fn first_tick_sends_a_full_baseline() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();

    let sent = tick(&mut entity, &mut transport, &mut lifecycle);

    assert_eq!(entity.sync.state(), SyncState::Tracking);
    assert_eq!(sent.len(), 1);
    let batch = &sent[0];
    assert_eq!(batch.entity, entity.entity());
    assert_eq!(batch.frame, 0);
    for group in ["Transform", "Stats", "Look", UNIQUE_ID_GROUP, TAG_GROUP] {
        assert!(batch.find(group).is_some(), "baseline lacks {}", group);
    }
    assert_fields_mask!(batch.find("Stats").unwrap(), 0, 1);
    assert_eq!(entity.sync.context().forced_syncs, 1);
}

#[test]
fn clean_entity_sends_nothing() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    for _ in 0..3 {
        assert!(tick(&mut entity, &mut transport, &mut lifecycle).is_empty());
    }
}

#[test]
fn changed_field_is_sent_alone() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    entity.health.set(90i64);
    let sent = tick(&mut entity, &mut transport, &mut lifecycle);

    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].updates.len(), 1);
    let update = &sent[0].updates[0];
    assert_eq!(update.component_type, "Stats");
    assert_fields_mask!(update, 0);
    assert_stopped_mask!(update);
}

#[test]
fn creation_only_field_is_sent_once() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    entity.color.set("blue");
    assert!(tick(&mut entity, &mut transport, &mut lifecycle).is_empty());
}

#[test]
fn stop_is_sent_exactly_once() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    entity.position.set(Vector3::new(1.0, 0.0, 0.0));
    let moving = tick(&mut entity, &mut transport, &mut lifecycle);
    let update = moving[0].find("Transform").unwrap();
    assert_stopped_mask!(update);

    // same position as last frame: movement ceased
    let stopped = tick(&mut entity, &mut transport, &mut lifecycle);
    assert_eq!(stopped.len(), 1);
    let update = stopped[0].find("Transform").unwrap();
    assert_fields_mask!(update, 0);
    assert_stopped_mask!(update, 0);

    assert!(tick(&mut entity, &mut transport, &mut lifecycle).is_empty());
    assert!(tick(&mut entity, &mut transport, &mut lifecycle).is_empty());
    assert_eq!(entity.sync.context().stops_sent, 1);
}

#[test]
fn regaining_authority_forces_one_baseline() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);
    tick(&mut entity, &mut transport, &mut lifecycle);

    lifecycle.observe(entity.entity());
    assert!(tick(&mut entity, &mut transport, &mut lifecycle).is_empty());
    assert_eq!(entity.sync.state(), SyncState::Observing);

    lifecycle.own(entity.entity());
    let baseline = tick(&mut entity, &mut transport, &mut lifecycle);
    assert_eq!(entity.sync.state(), SyncState::Tracking);
    assert_eq!(baseline.len(), 1);
    assert!(baseline[0].find("Transform").is_some());
    assert!(baseline[0].find("Stats").is_some());
    // creation-only fields already went out with the first baseline
    assert!(baseline[0].find("Look").is_none());
    assert!(baseline[0]
        .updates
        .iter()
        .all(|update| update.stopped_mask.is_clear()));

    assert!(tick(&mut entity, &mut transport, &mut lifecycle).is_empty());
    assert_eq!(entity.sync.context().forced_syncs, 2);
}

#[test]
fn losing_authority_forgets_sent_history() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);
    assert!(entity
        .sync
        .registry()
        .iter()
        .filter(|binding| !binding.is_method())
        .all(|binding| binding.last_sent().is_some()));

    lifecycle.observe(entity.entity());
    tick(&mut entity, &mut transport, &mut lifecycle);

    assert!(entity
        .sync
        .registry()
        .iter()
        .all(|binding| binding.last_sent().is_none()));
}

#[test]
fn forced_builds_are_identical() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    let mut first = Vec::new();
    let mut second = Vec::new();
    assert!(entity.sync.get_component_updates(&mut first, 1.0, 20, true));
    assert!(entity.sync.get_component_updates(&mut second, 1.0, 20, true));
    assert_eq!(first, second);
}

#[test]
fn blocked_entity_keeps_changes_for_later() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    transport.blocked.insert(entity.entity());
    entity.health.set(50i64);
    assert!(tick(&mut entity, &mut transport, &mut lifecycle).is_empty());

    transport.blocked.clear();
    let sent = tick(&mut entity, &mut transport, &mut lifecycle);
    assert_eq!(sent.len(), 1);
    assert_fields_mask!(sent[0].find("Stats").unwrap(), 0);
}

#[test]
fn failed_send_is_retried_next_tick() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    transport.fail_sends = true;
    entity.name.set("barrel");
    assert!(tick(&mut entity, &mut transport, &mut lifecycle).is_empty());
    assert_eq!(entity.sync.context().send_failures, 1);

    transport.fail_sends = false;
    let sent = tick(&mut entity, &mut transport, &mut lifecycle);
    assert_fields_mask!(sent[0].find("Stats").unwrap(), 1);
}

#[test]
fn changed_tag_is_sent() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    entity.sync.identity_mut().set_tag("boss");
    let sent = tick(&mut entity, &mut transport, &mut lifecycle);
    assert_eq!(sent[0].updates.len(), 1);
    assert_eq!(sent[0].updates[0].component_type, TAG_GROUP);
}

#[test]
fn dropped_cell_is_purged_without_breaking_the_tick() {
    let (mut entity, mut transport, mut lifecycle) = owned_entity();
    tick(&mut entity, &mut transport, &mut lifecycle);

    // replacing the cell drops the one the binding points at
    entity.health = FieldCell::new(0i64);
    tick(&mut entity, &mut transport, &mut lifecycle);
    tick(&mut entity, &mut transport, &mut lifecycle);

    assert_eq!(entity.sync.registry().len(), 3);
}
