use thiserror::Error;

/// Errors that can occur while reading or writing a field cell
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Owning FieldCell was dropped, the binding is stale
    #[error("FieldCell backing this binding has been dropped")]
    CellDropped,

    /// Lock on the cell was poisoned by a panicking writer
    #[error("Lock on FieldCell is poisoned")]
    LockPoisoned,

    /// Value does not have the cell's field type
    #[error("FieldCell holds {expected} values, cannot store {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors that can occur while building or using a binding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Mask index does not fit a 64-bit diff mask
    #[error("Binding {binding} uses mask bit {bit}, diff masks only hold 64 fields")]
    MaskBitOutOfRange { binding: String, bit: u8 },

    /// Two bindings of one group claim the same mask bit
    #[error("Bindings {first} and {second} of group {group} both use mask bit {bit}")]
    DuplicateMaskBit {
        group: String,
        first: String,
        second: String,
        bit: u8,
    },

    /// Group declared in a payload is not known to this entity
    #[error("Component group {group} is not bound on this entity")]
    UnknownGroup { group: String },

    /// Payload references a bit no binding of the group uses
    #[error("Component group {group} has no binding for mask bit {bit}")]
    UnknownMaskBit { group: String, bit: u8 },

    /// Field value did not match the declared field type
    #[error("Binding {binding} declared as {expected} cannot carry {actual}")]
    FieldTypeMismatch {
        binding: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Underlying object has been removed
    #[error("Binding {binding} of group {group} no longer has a backing object")]
    Stale { group: String, binding: String },

    /// Payload bytes could not be decoded
    #[error("Could not decode component group {group}: {reason}")]
    Decode { group: String, reason: String },
}
