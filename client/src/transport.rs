use tether_shared::{
    ClientId, ComponentUpdates, Entity, EntityState, OutboundCommand, SimulationFrame, Vector3d,
};

use crate::error::TransportError;

/// Connection-side collaborator. Sending is fire-and-forget: an `Ok` only
/// means the transport accepted the payload.
pub trait Transport {
    fn is_connected(&self) -> bool;

    /// Id of the local peer, used as the sender of local command invocations
    fn client_id(&self) -> ClientId;

    fn client_simulation_frame(&self) -> SimulationFrame;

    /// Network-synchronized clock, in seconds. Drives send rate limits and
    /// orphan adoption cooldowns. Interpolation does not read it: received
    /// samples and render time both use `frame * tick_interval`.
    fn time_as_double(&self) -> f64;

    /// Local floating origin, stamped on outgoing updates
    fn floating_origin(&self) -> Vector3d;

    /// False while the entity is mid authority handoff
    fn can_send_updates(&self, entity: Entity) -> bool;

    fn send_component_updates(&mut self, batch: ComponentUpdates) -> Result<(), TransportError>;

    fn send_command(&mut self, command: OutboundCommand) -> Result<(), TransportError>;

    /// Whether `entity` is known to the session
    fn is_valid_network_entity(&self, entity: Entity) -> bool;
}

/// Entity lifecycle collaborator, owner of authority records
pub trait EntityLifecycle {
    fn entity_state(&self, entity: Entity) -> Option<EntityState>;

    fn request_orphan_adoption(&mut self, entity: Entity);
}
