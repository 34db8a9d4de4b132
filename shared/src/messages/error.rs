use thiserror::Error;

use crate::messages::command::MessageTarget;

/// Errors that can occur while resolving, validating, encoding or
/// dispatching a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Type was never registered with the Protocol
    #[error("Type {type_name} is not registered. Register it with Protocol::add_type()")]
    UnknownType { type_name: String },

    /// No method of that name on the type or any of its ancestors
    #[error("Method {method} does not exist on {type_name} or any of its parent types")]
    DoesNotExist { type_name: String, method: String },

    /// Method exists but carries no routing registration
    #[error("Command {command} was not baked: the method has no registered routing")]
    NotBaked { command: String },

    /// Method exists but is not public
    #[error("Command {command} is not public and cannot be sent over the network")]
    NotPublic { command: String },

    /// Method exists but is static
    #[error("Command {command} is static, commands must be instance methods")]
    IsStatic { command: String },

    /// Number of arguments does not match the signature
    #[error("Command {command} takes {expected} arguments, {actual} were given")]
    ArgumentCount {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// Argument is not assignable to its parameter
    #[error("Argument {index} ({name}) of command {command} must be {expected}, got {actual}")]
    ArgumentType {
        command: String,
        index: usize,
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Null passed for a parameter that cannot be null
    #[error("Argument {index} ({name}) of command {command} is null, {expected} parameters cannot be null")]
    NullArgument {
        command: String,
        index: usize,
        name: String,
        expected: &'static str,
    },

    /// Entity argument is not known to the network
    #[error("Argument {index} ({name}) of command {command} references {entity}, which is not a network entity")]
    InvalidEntityArgument {
        command: String,
        index: usize,
        name: String,
        entity: String,
    },

    /// Target not allowed by the routing the command was registered with
    #[error("Command {command} is registered with {policy:?} routing and cannot be sent to {target:?}")]
    RoutingNotPermitted {
        command: String,
        policy: MessageTarget,
        target: MessageTarget,
    },

    /// StateAuthorityOnly command sent to an entity nobody has authority over
    #[error("Command {command} targets the state authority of {entity}, which is orphaned")]
    Orphaned { command: String, entity: String },

    /// Encoded arguments exceed the configured maximum
    #[error("Arguments of command {command} encode to {bytes} bytes, the limit is {limit}")]
    PayloadTooLarge {
        command: String,
        bytes: usize,
        limit: usize,
    },

    /// Inbound payload could not be decoded
    #[error("Could not decode arguments of command {command}: {reason}")]
    Decode { command: String, reason: String },

    /// Inbound command name is not registered
    #[error("Received command {command} which is not registered with the Protocol")]
    UnknownCommand { command: String },

    /// No method binding serves the command
    #[error("No binding on the entity serves command {command}")]
    NoReceiver { command: String },

    /// Several method bindings serve the command and none was chosen
    #[error("{count} bindings serve command {command}. Pass a receiver or send to all bindings")]
    AmbiguousReceiver { command: String, count: usize },

    /// Transport refused the command
    #[error("Transport failed to send command {command}: {reason}")]
    Transport { command: String, reason: String },
}
