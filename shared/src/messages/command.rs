use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{world::component::field_value::FieldValue, ChannelId, ClientId, Entity, SimulationFrame};

/// Which peers a command is meant for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageTarget {
    All,
    Other,
    StateAuthorityOnly,
    InputAuthorityOnly,
}

impl MessageTarget {
    /// Whether a command registered with routing `self` may be sent to
    /// `target`. `All` permits every target, the others only themselves.
    pub fn permits(&self, target: MessageTarget) -> bool {
        *self == MessageTarget::All || *self == target
    }
}

impl Serde for MessageTarget {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let value: u8 = match self {
            MessageTarget::All => 0,
            MessageTarget::Other => 1,
            MessageTarget::StateAuthorityOnly => 2,
            MessageTarget::InputAuthorityOnly => 3,
        };
        value.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(MessageTarget::All),
            1 => Ok(MessageTarget::Other),
            2 => Ok(MessageTarget::StateAuthorityOnly),
            3 => Ok(MessageTarget::InputAuthorityOnly),
            value => Err(SerdeErr::InvalidDiscriminant {
                type_name: "MessageTarget",
                value,
            }),
        }
    }
}

/// Argument of an outgoing command
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Null,
    Value(FieldValue),
}

impl ArgValue {
    pub fn value(value: impl Into<FieldValue>) -> Self {
        ArgValue::Value(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }

    /// Type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Null => "null",
            ArgValue::Value(value) => value.field_type().name(),
        }
    }
}

impl From<FieldValue> for ArgValue {
    fn from(value: FieldValue) -> Self {
        ArgValue::Value(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => ArgValue::Value(value.into()),
            None => ArgValue::Null,
        }
    }
}

/// How a command reaches the local method bindings serving it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOptions {
    pub channel: ChannelId,
    /// Invoke every binding serving the command
    pub send_to_all_bindings: bool,
    /// Invoke only the binding of this component group
    pub receiver: Option<String>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(mut self, channel: ChannelId) -> Self {
        self.channel = channel;
        self
    }

    pub fn send_to_all_bindings(mut self) -> Self {
        self.send_to_all_bindings = true;
        self
    }

    pub fn receiver(mut self, group: &str) -> Self {
        self.receiver = Some(group.to_string());
        self
    }
}

/// Command handed to the transport
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundCommand {
    pub entity: Entity,
    pub name: String,
    pub target: MessageTarget,
    pub channel: ChannelId,
    pub frame: SimulationFrame,
    /// Receiver choice of the sender, replayed on every peer
    pub send_to_all_bindings: bool,
    pub receiver: Option<String>,
    pub payload: Vec<u8>,
}

/// Command delivered by the transport
#[derive(Clone, Debug, PartialEq)]
pub struct InboundCommand {
    pub entity: Entity,
    pub name: String,
    pub target: MessageTarget,
    pub sender: ClientId,
    pub frame: SimulationFrame,
    /// Broadcast to every binding serving the command
    pub send_to_all_bindings: bool,
    /// Only the binding of this component group runs the command
    pub receiver: Option<String>,
    pub payload: Vec<u8>,
}

impl InboundCommand {
    /// What the receiving peer sees of `outbound`, sent by `sender`
    pub fn from_outbound(outbound: OutboundCommand, sender: ClientId) -> Self {
        Self {
            entity: outbound.entity,
            name: outbound.name,
            target: outbound.target,
            sender,
            frame: outbound.frame,
            send_to_all_bindings: outbound.send_to_all_bindings,
            receiver: outbound.receiver,
            payload: outbound.payload,
        }
    }

    /// Receiver selection the sender asked for
    pub fn options(&self) -> CommandOptions {
        CommandOptions {
            send_to_all_bindings: self.send_to_all_bindings,
            receiver: self.receiver.clone(),
            ..Default::default()
        }
    }
}

impl Serde for OutboundCommand {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity.ser(writer);
        self.name.ser(writer);
        self.target.ser(writer);
        self.channel.0.ser(writer);
        self.frame.ser(writer);
        self.send_to_all_bindings.ser(writer);
        self.receiver.ser(writer);
        self.payload.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity: Entity::de(reader)?,
            name: String::de(reader)?,
            target: MessageTarget::de(reader)?,
            channel: ChannelId(u8::de(reader)?),
            frame: SimulationFrame::de(reader)?,
            send_to_all_bindings: bool::de(reader)?,
            receiver: Option::<String>::de(reader)?,
            payload: Vec::<u8>::de(reader)?,
        })
    }
}
