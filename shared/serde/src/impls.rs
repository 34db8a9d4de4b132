use crate::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

// Length prefixes are written as 7-bit groups, each followed by a continue bit.
const MAX_LENGTH: u64 = u32::MAX as u64;

fn write_length(writer: &mut dyn BitWrite, len: usize) {
    let mut value = len as u64;
    loop {
        let proceed = value >= 0x80;
        writer.write_bit(proceed);
        for _ in 0..7 {
            writer.write_bit(value & 1 != 0);
            value >>= 1;
        }
        if !proceed {
            return;
        }
    }
}

fn read_length(reader: &mut BitReader) -> Result<usize, SerdeErr> {
    let mut output: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let proceed = reader.read_bit()?;
        for _ in 0..7 {
            if reader.read_bit()? {
                output |= 1 << shift;
            }
            shift += 1;
        }
        if output > MAX_LENGTH || shift > 35 {
            return Err(SerdeErr::LengthOverflow {
                len: output,
                limit: MAX_LENGTH,
            });
        }
        if !proceed {
            return Ok(output as usize);
        }
    }
}

// Bool

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }

    fn bit_length(&self) -> u32 {
        1
    }
}

impl ConstBitLength for bool {
    fn const_bit_length() -> u32 {
        1
    }
}

// Integers

macro_rules! impl_serde_for_integer {
    ($ty:ty, $unsigned:ty) => {
        impl Serde for $ty {
            fn ser(&self, writer: &mut dyn BitWrite) {
                for byte in (*self as $unsigned).to_le_bytes() {
                    writer.write_byte(byte);
                }
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                for byte in bytes.iter_mut() {
                    *byte = reader.read_byte()?;
                }
                Ok(<$unsigned>::from_le_bytes(bytes) as $ty)
            }

            fn bit_length(&self) -> u32 {
                <Self as ConstBitLength>::const_bit_length()
            }
        }

        impl ConstBitLength for $ty {
            fn const_bit_length() -> u32 {
                (std::mem::size_of::<$ty>() * 8) as u32
            }
        }
    };
}

impl_serde_for_integer!(u8, u8);
impl_serde_for_integer!(u16, u16);
impl_serde_for_integer!(u32, u32);
impl_serde_for_integer!(u64, u64);
impl_serde_for_integer!(i8, u8);
impl_serde_for_integer!(i16, u16);
impl_serde_for_integer!(i32, u32);
impl_serde_for_integer!(i64, u64);

// Floats

impl Serde for f32 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.to_bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(f32::from_bits(u32::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        32
    }
}

impl ConstBitLength for f32 {
    fn const_bit_length() -> u32 {
        32
    }
}

impl Serde for f64 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.to_bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(f64::from_bits(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        64
    }
}

impl ConstBitLength for f64 {
    fn const_bit_length() -> u32 {
        64
    }
}

impl<const N: usize> Serde for [f32; N] {
    fn ser(&self, writer: &mut dyn BitWrite) {
        for value in self {
            value.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut output = [0.0f32; N];
        for value in output.iter_mut() {
            *value = f32::de(reader)?;
        }
        Ok(output)
    }

    fn bit_length(&self) -> u32 {
        32 * N as u32
    }
}

// Variable length

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_length(writer, self.len());
        for byte in self.as_bytes() {
            writer.write_byte(*byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let bytes = Vec::<u8>::de(reader)?;
        let len = bytes.len();
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8 { len })
    }
}

impl Serde for Vec<u8> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_length(writer, self.len());
        for byte in self {
            writer.write_byte(*byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let len = read_length(reader)?;
        let mut output = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            output.push(reader.read_byte()?);
        }
        Ok(output)
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Some(value) => {
                writer.write_bit(true);
                value.ser(writer);
            }
            None => writer.write_bit(false),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}
