use std::sync::{Arc, Mutex};

use tether_client::{
    ArgValue, CommandMetadata, CommandOptions, Entity, EntityState, EntitySync, FieldValue,
    InboundCommand, MessageTarget, Protocol, ReceiverCell, SendSet,
};
use tether_shared::{encode_args, CommandError, DEFAULT_MAX_COMMAND_BYTES};
use tether_test::{deliver_commands, init_logging, TestLifecycle, TestProtocol, TestTransport};

type Calls = Arc<Mutex<Vec<(CommandMetadata, Vec<FieldValue>)>>>;

fn recorder() -> (ReceiverCell, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    let cell = ReceiverCell::new(move |metadata: &CommandMetadata, args: &[FieldValue]| {
        sink.lock().unwrap().push((*metadata, args.to_vec()));
    });
    (cell, calls)
}

fn count(calls: &Calls) -> usize {
    calls.lock().unwrap().len()
}

/// A door entity on one peer, with a receiver for each of its commands
struct Door {
    sync: EntitySync,
    transport: TestTransport,
    lifecycle: TestLifecycle,
    open: Calls,
    store: Calls,
    link: Calls,
    knock: Calls,
    steer: Calls,
    // keeps the receivers alive
    cells: Vec<ReceiverCell>,
}

impl Door {
    fn new() -> Self {
        Self::with_protocol(TestProtocol::standard())
    }

    fn with_protocol(protocol: Arc<Protocol>) -> Self {
        init_logging();
        let mut sync = EntitySync::new(Entity::from_u64(7), protocol);
        let mut cells = Vec::new();
        let mut bind = |command: &str| {
            let (cell, calls) = recorder();
            sync.bind_command("Door", command, &cell).unwrap();
            cells.push(cell);
            calls
        };
        let open = bind("Door.open");
        let store = bind("Door.store");
        let link = bind("Door.link");
        let knock = bind("Door.knock");
        let steer = bind("Door.steer");
        Self {
            sync,
            transport: TestTransport::new(1),
            lifecycle: TestLifecycle::new(),
            open,
            store,
            link,
            knock,
            steer,
            cells,
        }
    }

    fn offline(mut self) -> Self {
        self.transport.connected = false;
        self
    }

    /// Binds a second receiver for `command`, under component group `group`
    fn bind_extra(&mut self, group: &str, command: &str) -> Calls {
        let (cell, calls) = recorder();
        self.sync.bind_command(group, command, &cell).unwrap();
        self.cells.push(cell);
        calls
    }

    fn send(
        &mut self,
        method: &str,
        target: MessageTarget,
        args: &[ArgValue],
    ) -> Result<SendSet, CommandError> {
        self.send_with(method, target, &CommandOptions::new(), args)
    }

    fn send_with(
        &mut self,
        method: &str,
        target: MessageTarget,
        options: &CommandOptions,
        args: &[ArgValue],
    ) -> Result<SendSet, CommandError> {
        self.sync.try_send_command(
            &mut self.transport,
            &self.lifecycle,
            "Door",
            method,
            target,
            options,
            args,
        )
    }

    /// Hands everything this peer sent to `to`, as if sent by `sender`
    fn deliver_to(&mut self, sender: u32, to: &mut Door) -> usize {
        deliver_commands(&mut self.transport, sender, &mut to.sync, &to.lifecycle)
    }

    fn entity(&self) -> Entity {
        self.sync.entity()
    }
}

fn bytes(value: &[u8]) -> [ArgValue; 1] {
    [ArgValue::value(value.to_vec())]
}

#[test]
fn all_reaches_self_and_others_when_connected() {
    let mut door = Door::new();
    door.transport.client_id = 3;
    door.transport.frame = 40;

    let result = door.send("store", MessageTarget::All, &bytes(&[1, 2]));

    assert_eq!(result, Ok(SendSet::BOTH));
    assert_eq!(door.transport.sent_commands.len(), 1);
    assert_eq!(door.transport.sent_commands[0].name, "Door.store");
    let calls = door.store.lock().unwrap();
    assert_eq!(calls[0].0, CommandMetadata::new(3, 40));
    assert_eq!(calls[0].1, vec![FieldValue::Bytes(vec![1, 2])]);
}

#[test]
fn all_stays_local_when_offline() {
    let mut door = Door::new().offline();

    let result = door.send("store", MessageTarget::All, &bytes(&[9]));

    assert_eq!(result, Ok(SendSet::LOCAL));
    assert!(door.transport.sent_commands.is_empty());
    assert_eq!(count(&door.store), 1);
}

#[test]
fn state_authority_target_follows_authority() {
    let mut door = Door::new();
    let entity = door.entity();
    let force = [ArgValue::value(2.0f32)];

    door.lifecycle.own(entity);
    let result = door.send("open", MessageTarget::StateAuthorityOnly, &force);
    assert_eq!(result, Ok(SendSet::LOCAL));
    assert!(door.transport.sent_commands.is_empty());

    door.lifecycle.observe(entity);
    let result = door.send("open", MessageTarget::StateAuthorityOnly, &force);
    assert_eq!(result, Ok(SendSet::OTHERS));
    assert_eq!(door.transport.sent_commands.len(), 1);
    assert_eq!(
        door.transport.sent_commands[0].target,
        MessageTarget::StateAuthorityOnly
    );

    door.transport.connected = false;
    let result = door.send("open", MessageTarget::StateAuthorityOnly, &force);
    assert_eq!(result, Ok(SendSet::NONE));

    assert_eq!(count(&door.open), 1);
    assert_eq!(door.transport.sent_commands.len(), 1);
}

#[test]
fn input_authority_target_follows_input_authority() {
    let mut door = Door::new();
    let entity = door.entity();
    let mut state = EntityState::remote(entity);
    state.has_input_authority = true;
    door.lifecycle.set_state(state);

    let result = door.send("steer", MessageTarget::InputAuthorityOnly, &[]);
    assert_eq!(result, Ok(SendSet::LOCAL));
    assert_eq!(count(&door.steer), 1);

    door.lifecycle.observe(entity);
    let result = door.send("steer", MessageTarget::InputAuthorityOnly, &[]);
    assert_eq!(result, Ok(SendSet::OTHERS));
    assert_eq!(count(&door.steer), 1);
}

#[test]
fn other_while_disconnected_is_a_quiet_no_op() {
    let mut door = Door::new().offline();
    let message = [ArgValue::value("hello")];

    let result = door.send("knock", MessageTarget::Other, &message);
    assert_eq!(result, Ok(SendSet::NONE));
    assert!(door.transport.sent_commands.is_empty());

    door.transport.connected = true;
    let result = door.send("knock", MessageTarget::Other, &message);
    assert_eq!(result, Ok(SendSet::OTHERS));
    assert_eq!(door.transport.sent_commands.len(), 1);
    assert_eq!(count(&door.knock), 0);
}

#[test]
fn state_authority_command_to_orphan_fails_without_sending() {
    let mut door = Door::new();
    let entity = door.entity();
    door.lifecycle.orphan(entity);
    let force = [ArgValue::value(1.0f32)];

    let result = door.send("open", MessageTarget::StateAuthorityOnly, &force);

    assert!(matches!(result, Err(CommandError::Orphaned { .. })));
    assert!(door.transport.sent_commands.is_empty());
    assert_eq!(count(&door.open), 0);
    assert!(!door.sync.send_command(
        &mut door.transport,
        &door.lifecycle,
        "Door",
        "open",
        MessageTarget::StateAuthorityOnly,
        &CommandOptions::new(),
        &force,
    ));
}

#[test]
fn target_outside_registered_routing_is_rejected() {
    let mut door = Door::new();

    let result = door.send("open", MessageTarget::All, &[ArgValue::value(1.0f32)]);

    assert_eq!(
        result,
        Err(CommandError::RoutingNotPermitted {
            command: "Door.open".to_string(),
            policy: MessageTarget::StateAuthorityOnly,
            target: MessageTarget::All,
        })
    );
    assert!(door.transport.sent_commands.is_empty());
}

#[test]
fn null_byte_array_arrives_empty() {
    let mut door = Door::new().offline();

    door.send("store", MessageTarget::All, &[ArgValue::Null]).unwrap();

    let calls = door.store.lock().unwrap();
    assert_eq!(calls[0].1, vec![FieldValue::Bytes(Vec::new())]);
}

#[test]
fn encoding_failure_sends_and_invokes_nothing() {
    let mut door = Door::with_protocol(TestProtocol::with_max_command_bytes(4));

    let result = door.send("store", MessageTarget::All, &bytes(&[0; 64]));

    assert!(matches!(
        result,
        Err(CommandError::PayloadTooLarge { limit: 4, .. })
    ));
    assert!(door.transport.sent_commands.is_empty());
    assert_eq!(count(&door.store), 0);
}

#[test]
fn transport_failure_fails_the_call() {
    let mut door = Door::new();
    door.transport.fail_sends = true;

    let result = door.send("store", MessageTarget::All, &bytes(&[1]));

    assert!(matches!(result, Err(CommandError::Transport { .. })));
    assert_eq!(count(&door.store), 0);
    assert_eq!(door.sync.context().commands_dropped, 1);
}

#[test]
fn unknown_entity_argument_is_only_checked_online() {
    let mut door = Door::new();
    let stranger = [ArgValue::value(FieldValue::Entity(Some(Entity::from_u64(99))))];

    let result = door.send("link", MessageTarget::All, &stranger);
    assert!(matches!(
        result,
        Err(CommandError::InvalidEntityArgument { index: 0, .. })
    ));

    door.transport.valid_entities.insert(Entity::from_u64(99));
    let result = door.send("link", MessageTarget::All, &stranger);
    assert_eq!(result, Ok(SendSet::BOTH));

    door.transport.connected = false;
    let unknown = [ArgValue::value(FieldValue::Entity(Some(Entity::from_u64(5))))];
    let result = door.send("link", MessageTarget::All, &unknown);
    assert_eq!(result, Ok(SendSet::LOCAL));
    assert_eq!(count(&door.link), 2);
}

#[test]
fn several_receivers_need_a_choice() {
    let mut door = Door::new().offline();
    let lock = door.bind_extra("Lock", "Door.open");
    let force = [ArgValue::value(1.0f32)];

    let result = door.send("open", MessageTarget::StateAuthorityOnly, &force);
    assert_eq!(
        result,
        Err(CommandError::AmbiguousReceiver {
            command: "Door.open".to_string(),
            count: 2,
        })
    );

    let to_lock = CommandOptions::new().receiver("Lock");
    door.send_with("open", MessageTarget::StateAuthorityOnly, &to_lock, &force).unwrap();
    assert_eq!(count(&lock), 1);
    assert_eq!(count(&door.open), 0);

    let to_all = CommandOptions::new().send_to_all_bindings();
    door.send_with("open", MessageTarget::StateAuthorityOnly, &to_all, &force).unwrap();
    assert_eq!(count(&lock), 2);
    assert_eq!(count(&door.open), 1);
}

#[test]
fn receiver_choice_is_the_same_on_every_peer() {
    let mut sender = Door::new();
    let sender_lock = sender.bind_extra("Lock", "Door.store");
    let mut remote = Door::new();
    let remote_lock = remote.bind_extra("Lock", "Door.store");

    let to_lock = CommandOptions::new().receiver("Lock");
    let result = sender.send_with("store", MessageTarget::All, &to_lock, &bytes(&[1]));
    assert_eq!(result, Ok(SendSet::BOTH));
    assert_eq!(sender.deliver_to(1, &mut remote), 1);

    assert_eq!((count(&sender.store), count(&sender_lock)), (0, 1));
    assert_eq!((count(&remote.store), count(&remote_lock)), (0, 1));

    let to_all = CommandOptions::new().send_to_all_bindings();
    sender
        .send_with("store", MessageTarget::All, &to_all, &bytes(&[2]))
        .unwrap();
    assert_eq!(sender.deliver_to(1, &mut remote), 2);

    assert_eq!((count(&sender.store), count(&sender_lock)), (1, 2));
    assert_eq!((count(&remote.store), count(&remote_lock)), (1, 2));
}

#[test]
fn ambiguous_inbound_command_is_rejected() {
    let protocol = TestProtocol::standard();
    let signature = protocol.commands.try_signature("Door.store").unwrap();
    let payload = encode_args(
        signature,
        &[FieldValue::Bytes(vec![3])],
        DEFAULT_MAX_COMMAND_BYTES,
    )
    .unwrap();
    let mut remote = Door::with_protocol(protocol.clone());
    remote.bind_extra("Lock", "Door.store");
    let inbound = InboundCommand {
        entity: remote.entity(),
        name: "Door.store".to_string(),
        target: MessageTarget::All,
        sender: 4,
        frame: 2,
        send_to_all_bindings: false,
        receiver: None,
        payload,
    };

    let result = remote.sync.handle_command(&inbound, &remote.lifecycle);

    assert!(matches!(
        result,
        Err(CommandError::AmbiguousReceiver { count: 2, .. })
    ));
    assert_eq!(count(&remote.store), 0);
}

#[test]
fn inbound_target_outside_registered_routing_is_rejected() {
    let mut observer = Door::new();
    let entity = observer.entity();
    observer.lifecycle.observe(entity);
    let inbound = InboundCommand {
        entity,
        name: "Door.open".to_string(),
        target: MessageTarget::All,
        sender: 4,
        frame: 2,
        send_to_all_bindings: false,
        receiver: None,
        payload: Vec::new(),
    };

    let result = observer.sync.handle_command(&inbound, &observer.lifecycle);

    assert_eq!(
        result,
        Err(CommandError::RoutingNotPermitted {
            command: "Door.open".to_string(),
            policy: MessageTarget::StateAuthorityOnly,
            target: MessageTarget::All,
        })
    );
    assert_eq!(count(&observer.open), 0);
    assert_eq!(observer.sync.context().commands_dropped, 1);
}

#[test]
fn command_without_receiver_fails() {
    let mut door = Door::new().offline();

    let result = door.send("ping", MessageTarget::All, &[]);

    assert_eq!(
        result,
        Err(CommandError::NoReceiver {
            command: "Actor.ping".to_string()
        })
    );
}

#[test]
fn unregistered_method_is_rejected_loudly() {
    let mut door = Door::new();

    let result = door.send("slam", MessageTarget::All, &[]);
    assert!(matches!(result, Err(CommandError::DoesNotExist { .. })));

    let wide = [ArgValue::value("wide")];
    let result = door.send("open", MessageTarget::StateAuthorityOnly, &wide);
    assert!(matches!(
        result,
        Err(CommandError::ArgumentType { index: 0, .. })
    ));
    assert!(door.transport.sent_commands.is_empty());
}

#[test]
fn remote_command_reaches_the_state_authority() {
    // peer 2 observes the door, peer 1 owns it
    let mut observer = Door::new();
    observer.transport.client_id = 2;
    observer.transport.frame = 12;
    let entity = observer.entity();
    observer.lifecycle.observe(entity);

    let mut owner = Door::new();
    owner.lifecycle.own(entity);

    let force = [ArgValue::value(2.5f32)];
    let result = observer.send("open", MessageTarget::StateAuthorityOnly, &force);
    assert_eq!(result, Ok(SendSet::OTHERS));

    assert_eq!(observer.deliver_to(2, &mut owner), 1);
    let calls = owner.open.lock().unwrap();
    assert_eq!(calls[0].0, CommandMetadata::new(2, 12));
    assert_eq!(calls[0].1, vec![FieldValue::Float(2.5)]);
    drop(calls);

    // authority moved away before the command arrived
    observer
        .send("open", MessageTarget::StateAuthorityOnly, &[ArgValue::value(1.0f32)])
        .unwrap();
    owner.lifecycle.observe(entity);
    assert_eq!(observer.deliver_to(2, &mut owner), 0);
    assert_eq!(count(&owner.open), 1);
}

#[test]
fn destroyed_entity_ignores_commands() {
    let mut door = Door::new();
    door.sync.mark_destroyed();

    let result = door.send("store", MessageTarget::All, &[ArgValue::Null]);

    assert_eq!(result, Ok(SendSet::NONE));
    assert!(door.transport.sent_commands.is_empty());
    assert_eq!(count(&door.store), 0);
}
