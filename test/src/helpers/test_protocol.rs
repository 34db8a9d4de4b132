use std::{sync::Arc, time::Duration};

use tether_client::{FieldType, MessageTarget, Protocol};
use tether_shared::{MethodDescriptor, OrphanPolicy, TypeDescriptor};

/// Builder for the protocols used across the integration tests
pub struct TestProtocol;

impl TestProtocol {
    /// `Actor` and `Door`, 50ms ticks, default interpolation
    pub fn standard() -> Arc<Protocol> {
        finish(Self::builder())
    }

    /// Like `standard`, with automatic orphan adoption
    pub fn adopting(cooldown: f64) -> Arc<Protocol> {
        let mut protocol = Self::builder();
        protocol
            .orphan_policy(OrphanPolicy::AutoAdopt)
            .adoption_cooldown(cooldown);
        finish(protocol)
    }

    /// Like `standard`, rejecting floating origin shifts above `max_delta`
    pub fn with_max_origin_delta(max_delta: f64) -> Arc<Protocol> {
        let mut protocol = Self::builder();
        protocol.max_origin_delta(max_delta);
        finish(protocol)
    }

    /// Like `standard`, with a cap on encoded command arguments
    pub fn with_max_command_bytes(max_bytes: usize) -> Arc<Protocol> {
        let mut protocol = Self::builder();
        protocol.max_command_bytes(max_bytes);
        finish(protocol)
    }

    pub fn builder() -> Protocol {
        let mut protocol = Protocol::builder();
        protocol
            .tick_interval(Duration::from_millis(50))
            .add_type(
                TypeDescriptor::new("Actor")
                    .method(MethodDescriptor::command("ping", MessageTarget::All)),
            )
            .add_type(
                TypeDescriptor::new("Door")
                    .extends("Actor")
                    .method(
                        MethodDescriptor::command("open", MessageTarget::StateAuthorityOnly)
                            .param("force", FieldType::Float),
                    )
                    .method(
                        MethodDescriptor::command("knock", MessageTarget::Other)
                            .param("message", FieldType::Text),
                    )
                    .method(MethodDescriptor::command("steer", MessageTarget::InputAuthorityOnly))
                    .method(
                        MethodDescriptor::command("store", MessageTarget::All)
                            .param("blob", FieldType::Bytes),
                    )
                    .method(
                        MethodDescriptor::command("link", MessageTarget::All)
                            .param("other", FieldType::Entity),
                    ),
            );
        protocol
    }
}

fn finish(mut protocol: Protocol) -> Arc<Protocol> {
    protocol.lock();
    Arc::new(protocol)
}
