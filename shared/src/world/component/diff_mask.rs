use std::fmt;

use tether_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

pub const DIFF_MASK_BITS: u8 = 64;

/// One bit per binding of a component group
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiffMask(u64);

impl DiffMask {
    pub const EMPTY: DiffMask = DiffMask(0);

    pub fn new() -> Self {
        Self(0)
    }

    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn bit(&self, index: u8) -> bool {
        index < DIFF_MASK_BITS && self.0 & (1 << index) != 0
    }

    pub fn set_bit(&mut self, index: u8, value: bool) {
        if index >= DIFF_MASK_BITS {
            return;
        }
        if value {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }

    pub fn or(&mut self, other: &DiffMask) {
        self.0 |= other.0;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_clear(&self) -> bool {
        self.0 == 0
    }

    /// Set bits in ascending order
    pub fn iter_bits(&self) -> impl Iterator<Item = u8> + '_ {
        (0..DIFF_MASK_BITS).filter(move |index| self.bit(*index))
    }
}

impl fmt::Debug for DiffMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiffMask({:#b})", self.0)
    }
}

impl Serde for DiffMask {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for DiffMask {
    fn const_bit_length() -> u32 {
        u64::const_bit_length()
    }
}
