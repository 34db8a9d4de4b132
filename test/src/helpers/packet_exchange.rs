use tether_client::{ClientId, EntitySync, InboundCommand};

use crate::helpers::{TestLifecycle, TestTransport};

/// Hands every update batch `from` sent to `to`. Returns how many fields
/// were received.
pub fn deliver_updates(
    from: &mut TestTransport,
    to: &mut EntitySync,
    to_transport: &TestTransport,
    to_lifecycle: &TestLifecycle,
) -> usize {
    from.take_updates()
        .iter()
        .map(|batch| to.apply_component_updates(batch, to_transport, to_lifecycle))
        .sum()
}

/// Hands every command `from` sent to `to`, as if sent by `sender`.
/// Returns how many bindings ran.
pub fn deliver_commands(
    from: &mut TestTransport,
    sender: ClientId,
    to: &mut EntitySync,
    to_lifecycle: &TestLifecycle,
) -> usize {
    from.take_commands()
        .into_iter()
        .map(|command| {
            let inbound = InboundCommand::from_outbound(command, sender);
            to.handle_command(&inbound, to_lifecycle).unwrap_or(0)
        })
        .sum()
}
