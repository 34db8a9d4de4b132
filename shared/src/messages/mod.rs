pub mod command;
pub mod command_codec;
pub mod command_metadata;
pub mod command_receiver;
pub mod command_schema;
pub mod error;
pub mod routing;
