//! # Tether Client
//! Per-entity replication driver: decides every tick what to send, applies
//! what is received and routes commands between peers.

#![deny(unstable_features, unused_import_braces)]

pub use tether_shared::{
    ArgValue, Binding, BindingDescriptor, ChannelId, ClientId, CommandMetadata, CommandOptions,
    ComponentUpdate, ComponentUpdates, Entity, EntityState, FieldCell, FieldType, FieldValue,
    InboundCommand, MessageTarget, OrphanPolicy, OutboundCommand, Protocol, ReceiverCell,
    SendSet, SimulationFrame, Vector3, Vector3d,
};

mod command_handler;
mod entity_sync;
mod error;
mod sync_context;
mod transport;

pub use command_handler::CommandHandler;
pub use entity_sync::{EntitySync, SyncState};
pub use error::TransportError;
pub use sync_context::SyncContext;
pub use transport::{EntityLifecycle, Transport};
