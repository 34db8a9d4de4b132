use thiserror::Error;

/// Errors that can occur while reading a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// Reader ran past the end of its buffer
    #[error("Attempted to read {bits_requested} bit(s) past the end of a {buffer_bits}-bit buffer")]
    EndOfBuffer {
        bits_requested: u32,
        buffer_bits: u32,
    },

    /// An enum discriminant did not match any known variant
    #[error("Invalid discriminant {value} while reading {type_name}")]
    InvalidDiscriminant {
        type_name: &'static str,
        value: u8,
    },

    /// A string payload was not valid UTF-8
    #[error("String payload of {len} bytes is not valid UTF-8")]
    InvalidUtf8 { len: usize },

    /// A length prefix exceeds what the stream can carry
    #[error("Length prefix {len} exceeds the limit of {limit}")]
    LengthOverflow { len: u64, limit: u64 },
}
