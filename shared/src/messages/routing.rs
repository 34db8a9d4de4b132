use crate::messages::command::MessageTarget;

/// Where a command goes: the local bindings, the other peers, both or
/// neither
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SendSet {
    pub local: bool,
    pub others: bool,
}

impl SendSet {
    pub const NONE: SendSet = SendSet {
        local: false,
        others: false,
    };
    pub const LOCAL: SendSet = SendSet {
        local: true,
        others: false,
    };
    pub const OTHERS: SendSet = SendSet {
        local: false,
        others: true,
    };
    pub const BOTH: SendSet = SendSet {
        local: true,
        others: true,
    };

    pub fn is_empty(&self) -> bool {
        !self.local && !self.others
    }
}

/// Resolves the peers `target` designates from the local peer's authority
/// and connection state
pub fn resolve_send_set(
    target: MessageTarget,
    has_state_authority: bool,
    has_input_authority: bool,
    is_connected: bool,
) -> SendSet {
    let authority_or_owner = |has_authority: bool| {
        if has_authority {
            SendSet::LOCAL
        } else if is_connected {
            SendSet::OTHERS
        } else {
            SendSet::NONE
        }
    };

    match target {
        MessageTarget::All => {
            if is_connected {
                SendSet::BOTH
            } else {
                SendSet::LOCAL
            }
        }
        MessageTarget::StateAuthorityOnly => authority_or_owner(has_state_authority),
        MessageTarget::InputAuthorityOnly => authority_or_owner(has_input_authority),
        MessageTarget::Other => {
            if is_connected {
                SendSet::OTHERS
            } else {
                SendSet::NONE
            }
        }
    }
}
