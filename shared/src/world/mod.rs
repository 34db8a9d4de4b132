pub mod component;
pub mod delegation;
pub mod entity;
pub mod host;
pub mod origin;
pub mod registry;
pub mod remote;
