use crate::world::entity::entity_state::EntityState;

/// Read-only view of an entity's authority flags.
///
/// Without an `EntityState` (offline, or before the entity is registered
/// with a session) the local peer holds every authority.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthorityGate {
    state: Option<EntityState>,
}

impl AuthorityGate {
    pub fn new(state: Option<EntityState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> Option<&EntityState> {
        self.state.as_ref()
    }

    pub fn has_state_authority(&self) -> bool {
        self.state
            .as_ref()
            .map_or(true, |state| state.has_state_authority)
    }

    pub fn has_input_authority(&self) -> bool {
        self.state
            .as_ref()
            .map_or(true, |state| state.has_input_authority)
    }

    pub fn is_orphaned(&self) -> bool {
        self.state.as_ref().map_or(true, |state| state.is_orphaned)
    }

    /// Orphaned according to an actual authority record. Command routing
    /// uses this so offline peers keep invoking their own commands.
    pub fn is_recorded_orphan(&self) -> bool {
        self.state.as_ref().is_some_and(|state| state.is_orphaned)
    }
}
