pub mod binding_registry;
pub mod dirty_tracker;
pub mod error;
