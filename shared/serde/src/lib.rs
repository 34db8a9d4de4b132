//! # Tether Serde
//! Bit-level serialization shared by tether's component payloads and command
//! arguments.

#![deny(unstable_features, unused_import_braces)]

mod bit_counter;
mod bit_reader;
mod bit_writer;
mod error;
mod impls;
mod serde;

pub use bit_counter::BitCounter;
pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use serde::{ConstBitLength, Serde};
