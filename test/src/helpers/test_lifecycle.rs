use std::collections::HashMap;

use tether_client::{Entity, EntityLifecycle, EntityState};

/// Authority records kept by hand
#[derive(Default)]
pub struct TestLifecycle {
    states: HashMap<Entity, EntityState>,
    pub adoption_requests: Vec<Entity>,
}

impl TestLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&mut self, state: EntityState) {
        self.states.insert(state.entity, state);
    }

    pub fn own(&mut self, entity: Entity) {
        self.set_state(EntityState::owned(entity));
    }

    pub fn observe(&mut self, entity: Entity) {
        self.set_state(EntityState::remote(entity));
    }

    pub fn orphan(&mut self, entity: Entity) {
        self.set_state(EntityState::orphaned(entity));
    }

    pub fn forget(&mut self, entity: Entity) {
        self.states.remove(&entity);
    }
}

impl EntityLifecycle for TestLifecycle {
    fn entity_state(&self, entity: Entity) -> Option<EntityState> {
        self.states.get(&entity).cloned()
    }

    fn request_orphan_adoption(&mut self, entity: Entity) {
        self.adoption_requests.push(entity);
    }
}
