use std::fmt;

use tether_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

// Entity
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    pub fn from_u64(value: u64) -> Self {
        Entity(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl Serde for Entity {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Entity(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for Entity {
    fn const_bit_length() -> u32 {
        u64::const_bit_length()
    }
}
