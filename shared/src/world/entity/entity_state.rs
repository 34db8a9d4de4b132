use crate::Entity;

/// Authority record of an entity, maintained by the entity-lifecycle
/// collaborator and only ever read by the sync core
#[derive(Clone, Debug, PartialEq)]
pub struct EntityState {
    pub entity: Entity,
    pub has_state_authority: bool,
    pub has_input_authority: bool,
    pub is_orphaned: bool,
    /// Seconds, in the transport's clock, of the last adoption request
    pub last_time_requested_orphan_adoption: Option<f64>,
}

impl EntityState {
    /// Record for an entity the local peer fully controls
    pub fn owned(entity: Entity) -> Self {
        Self {
            entity,
            has_state_authority: true,
            has_input_authority: true,
            is_orphaned: false,
            last_time_requested_orphan_adoption: None,
        }
    }

    /// Record for an entity another peer controls
    pub fn remote(entity: Entity) -> Self {
        Self {
            entity,
            has_state_authority: false,
            has_input_authority: false,
            is_orphaned: false,
            last_time_requested_orphan_adoption: None,
        }
    }

    /// Record for an entity nobody holds state authority over
    pub fn orphaned(entity: Entity) -> Self {
        Self {
            is_orphaned: true,
            ..Self::remote(entity)
        }
    }
}
