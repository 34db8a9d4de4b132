use thiserror::Error;

use crate::world::component::error::BindingError;

/// Errors that can occur during binding registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Index does not refer to a registered binding
    #[error("No binding registered at index {index}. Indices are invalidated by rebuild()")]
    UnknownBinding { index: usize },

    /// Group not present in the current rebuild
    #[error("Component group {group} is not registered. Add a binding for it and rebuild()")]
    UnknownGroup { group: String },

    /// Binding was rejected
    #[error(transparent)]
    Binding(#[from] BindingError),
}
