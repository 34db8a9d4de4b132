use std::sync::Arc;

use log::{error, warn};

use tether_shared::{
    decode_args, encode_args, resolve_send_set, ArgValue, AuthorityGate, BindingRegistry,
    CommandError, CommandMetadata, CommandOptions, Entity, FieldValue, InboundCommand,
    MessageTarget, OutboundCommand, Protocol, SendSet,
};

use crate::transport::Transport;

/// Resolves, validates and dispatches the commands of one entity
pub struct CommandHandler {
    protocol: Arc<Protocol>,
}

impl CommandHandler {
    pub fn new(protocol: Arc<Protocol>) -> Self {
        Self { protocol }
    }

    /// Sends `type_name.method` to the peers `target` designates. Nothing
    /// is sent or invoked unless every check passes and the arguments
    /// encode.
    #[allow(clippy::too_many_arguments)]
    pub fn send(
        &self,
        entity: Entity,
        registry: &mut BindingRegistry,
        gate: &AuthorityGate,
        transport: &mut dyn Transport,
        type_name: &str,
        method: &str,
        target: MessageTarget,
        options: &CommandOptions,
        args: &[ArgValue],
    ) -> Result<SendSet, CommandError> {
        let signature = self
            .protocol
            .commands
            .resolve(type_name, method, args)
            .map_err(|err| {
                error!("Cannot send {}.{} on {}: {}", type_name, method, entity, err);
                err
            })?;

        let is_connected = transport.is_connected();
        if is_connected {
            let is_valid_entity = |candidate: Entity| transport.is_valid_network_entity(candidate);
            signature
                .validate(args, Some(&is_valid_entity))
                .map_err(|err| {
                    error!("Cannot send {} on {}: {}", signature.name, entity, err);
                    err
                })?;
        }

        if !signature.routing.permits(target) {
            let err = CommandError::RoutingNotPermitted {
                command: signature.name.clone(),
                policy: signature.routing,
                target,
            };
            error!("{}", err);
            return Err(err);
        }

        if target == MessageTarget::StateAuthorityOnly && gate.is_recorded_orphan() {
            let err = CommandError::Orphaned {
                command: signature.name.clone(),
                entity: entity.to_string(),
            };
            warn!("{}", err);
            return Err(err);
        }

        let send_set = resolve_send_set(
            target,
            gate.has_state_authority(),
            gate.has_input_authority(),
            is_connected,
        );
        if send_set.is_empty() {
            if target == MessageTarget::Other {
                warn!(
                    "Dropping {} on {}: no other peers while disconnected",
                    signature.name, entity
                );
            }
            return Ok(send_set);
        }

        let args = signature.normalize(args);

        let receivers = if send_set.local {
            select_receivers(registry, &signature.name, options)?
        } else {
            Vec::new()
        };

        let frame = transport.client_simulation_frame();
        if send_set.others {
            let payload = encode_args(signature, &args, self.protocol.max_command_bytes)
                .map_err(|err| {
                    error!("Cannot encode {} on {}: {}", signature.name, entity, err);
                    err
                })?;
            let outbound = OutboundCommand {
                entity,
                name: signature.name.clone(),
                target,
                channel: options.channel,
                frame,
                send_to_all_bindings: options.send_to_all_bindings,
                receiver: options.receiver.clone(),
                payload,
            };
            transport.send_command(outbound).map_err(|err| {
                error!("Transport failed to send {} on {}: {}", signature.name, entity, err);
                CommandError::Transport {
                    command: signature.name.clone(),
                    reason: err.to_string(),
                }
            })?;
        }

        if send_set.local {
            let metadata = CommandMetadata::new(transport.client_id(), frame);
            invoke(registry, &receivers, &metadata, &args);
        }

        Ok(send_set)
    }

    /// Dispatches a command received from another peer with the receiver
    /// choice of its sender. Returns how many bindings were invoked, zero
    /// when the command was dropped because the local peer no longer holds
    /// the authority it targets.
    pub fn handle(
        &self,
        registry: &mut BindingRegistry,
        gate: &AuthorityGate,
        inbound: &InboundCommand,
    ) -> Result<usize, CommandError> {
        let signature = self
            .protocol
            .commands
            .try_signature(&inbound.name)
            .map_err(|err| {
                warn!("Dropping inbound command on {}: {}", inbound.entity, err);
                err
            })?;

        if !signature.routing.permits(inbound.target) {
            let err = CommandError::RoutingNotPermitted {
                command: signature.name.clone(),
                policy: signature.routing,
                target: inbound.target,
            };
            warn!("Dropping inbound command on {}: {}", inbound.entity, err);
            return Err(err);
        }

        let holds_target = match inbound.target {
            MessageTarget::StateAuthorityOnly => gate.has_state_authority(),
            MessageTarget::InputAuthorityOnly => gate.has_input_authority(),
            MessageTarget::All | MessageTarget::Other => true,
        };
        if !holds_target {
            warn!(
                "Dropping {} on {}: it targets {:?} which the local peer does not hold",
                inbound.name, inbound.entity, inbound.target
            );
            return Ok(0);
        }

        let args = decode_args(signature, &inbound.payload).map_err(|err| {
            warn!("Dropping {} on {}: {}", inbound.name, inbound.entity, err);
            err
        })?;

        let receivers = select_receivers(registry, &signature.name, &inbound.options())?;
        let metadata = CommandMetadata::new(inbound.sender, inbound.frame);
        Ok(invoke(registry, &receivers, &metadata, &args))
    }
}

/// Method bindings that should run `command`. More than one is an error
/// unless the caller broadcasts or names the receiver group.
fn select_receivers(
    registry: &mut BindingRegistry,
    command: &str,
    options: &CommandOptions,
) -> Result<Vec<usize>, CommandError> {
    let mut matching = registry.method_bindings(command);
    if let Some(group) = &options.receiver {
        matching.retain(|index| registry.binding(*index).group() == group);
    }

    match matching.len() {
        0 => {
            let err = CommandError::NoReceiver {
                command: command.to_string(),
            };
            error!("{}", err);
            Err(err)
        }
        1 => Ok(matching),
        _ if options.send_to_all_bindings => Ok(matching),
        count => {
            let err = CommandError::AmbiguousReceiver {
                command: command.to_string(),
                count,
            };
            error!("{}", err);
            Err(err)
        }
    }
}

fn invoke(
    registry: &BindingRegistry,
    receivers: &[usize],
    metadata: &CommandMetadata,
    args: &[FieldValue],
) -> usize {
    let mut invoked = 0;
    for index in receivers {
        let binding = registry.binding(*index);
        let Some(receiver) = binding.receiver() else {
            continue;
        };
        if receiver.invoke(metadata, args) {
            invoked += 1;
        } else {
            warn!("Receiver of {} in group {} is gone", binding.name(), binding.group());
        }
    }
    invoked
}
