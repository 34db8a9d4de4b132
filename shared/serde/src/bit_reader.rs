use crate::SerdeErr;

/// Reads bits back out of a buffer produced by `BitWriter`
pub struct BitReader<'b> {
    buffer: &'b [u8],
    scratch: u8,
    scratch_index: u8,
    buffer_index: usize,
    bits_read: u32,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            scratch: 0,
            scratch_index: 0,
            buffer_index: 0,
            bits_read: 0,
        }
    }

    pub fn bits_read(&self) -> u32 {
        self.bits_read
    }

    /// Whether any whole unread byte remains. Trailing padding bits of the
    /// final byte are not counted.
    pub fn has_remaining_bytes(&self) -> bool {
        self.buffer_index < self.buffer.len()
    }

    fn buffer_bits(&self) -> u32 {
        (self.buffer.len() * 8) as u32
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.scratch_index == 0 {
            if self.buffer_index >= self.buffer.len() {
                return Err(SerdeErr::EndOfBuffer {
                    bits_requested: 1,
                    buffer_bits: self.buffer_bits(),
                });
            }

            self.scratch = self.buffer[self.buffer_index];

            self.buffer_index += 1;
            self.scratch_index += 8;
        }

        let value = self.scratch & 1;

        self.scratch >>= 1;

        self.scratch_index -= 1;
        self.bits_read += 1;

        Ok(value != 0)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output = 0u8;
        for i in 0..8 {
            if self.read_bit()? {
                output |= 1 << i;
            }
        }
        Ok(output)
    }
}
