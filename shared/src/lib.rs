//! # Tether Shared
//! Entity state replication and command routing primitives shared by every
//! peer: bindings, dirty tracking, update synthesis, interpolation, authority
//! and command schemas.

#![deny(unstable_features, unused_import_braces)]

pub use tether_serde::{
    BitCounter, BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr,
};

mod messages;
mod protocol;
mod types;
mod world;

pub use messages::{
    command::{ArgValue, CommandOptions, InboundCommand, MessageTarget, OutboundCommand},
    command_codec::{decode_args, encode_args, DEFAULT_MAX_COMMAND_BYTES},
    command_metadata::CommandMetadata,
    command_receiver::{CommandReceiver, ReceiverAccessor, ReceiverCell},
    command_schema::{
        command_name, CommandRegistry, CommandSignature, MethodDescriptor, ParamDescriptor,
        TypeDescriptor,
    },
    error::CommandError,
    routing::{resolve_send_set, SendSet},
};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use types::{ChannelId, ClientId, SimulationFrame};
pub use world::{
    component::{
        binding::{Binding, BindingDescriptor, ChangeCallback, FieldRole, SyncMode},
        component_update::{
            is_identity_group, ComponentUpdate, ComponentUpdates, TAG_GROUP, UNIQUE_ID_GROUP,
        },
        diff_mask::{DiffMask, DIFF_MASK_BITS},
        error::{BindingError, FieldError},
        field_cell::{FieldAccessor, FieldCell},
        field_value::{FieldType, FieldValue},
        vector::{Quaternion, Vector2, Vector3, Vector3d},
    },
    delegation::{
        authority_gate::AuthorityGate,
        orphan_adoption::{OrphanAdoption, OrphanPolicy},
    },
    entity::{entity::Entity, entity_state::EntityState},
    host::{
        identity_tracker::{IdentitySnapshot, IdentityTracker},
        update_synthesizer::{build_updates, commit_updates, SentField, SynthesizedUpdates},
    },
    origin::floating_origin::{OriginCorrector, DEFAULT_MAX_ORIGIN_DELTA},
    registry::{
        binding_registry::{BindingRegistry, ComponentGroup},
        dirty_tracker::{DirtyOutcome, DirtyTracker},
        error::RegistryError,
    },
    remote::{
        interpolation::{InterpolationBuffer, InterpolationSettings, Sample},
        update_applier::{apply_update, apply_updates},
    },
};
