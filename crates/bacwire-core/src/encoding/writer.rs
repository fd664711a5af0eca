use crate::EncodeError;

/// Bit-granular writer into a caller-owned buffer.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    bit_pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, bit_pos: 0 }
    }

    /// Octets touched so far, counting a partially written octet.
    pub const fn position(&self) -> usize {
        self.bit_pos.div_ceil(8)
    }

    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.position())
    }

    fn remaining_bits(&self) -> usize {
        (self.buf.len() * 8).saturating_sub(self.bit_pos)
    }

    pub fn as_written(&self) -> &[u8] {
        &self.buf[..self.position()]
    }

    pub fn write_bit(&mut self, value: bool) -> Result<(), EncodeError> {
        self.write_bits(value as u32, 1)
    }

    /// Writes the low `count` bits of `value` (at most 32), most significant first.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<(), EncodeError> {
        debug_assert!(count <= 32);
        if self.remaining_bits() < count as usize {
            return Err(EncodeError::BufferTooSmall);
        }
        for i in (0..count).rev() {
            let idx = self.bit_pos / 8;
            let shift = 7 - (self.bit_pos % 8);
            if shift == 7 {
                self.buf[idx] = 0;
            }
            if (value >> i) & 1 == 1 {
                self.buf[idx] |= 1 << shift;
            }
            self.bit_pos += 1;
        }
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        if self.bit_pos % 8 != 0 {
            return self.write_bits(value as u32, 8);
        }
        if self.remaining() < 1 {
            return Err(EncodeError::BufferTooSmall);
        }
        self.buf[self.bit_pos / 8] = value;
        self.bit_pos += 8;
        Ok(())
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        if self.remaining_bits() < data.len() * 8 {
            return Err(EncodeError::BufferTooSmall);
        }
        if self.bit_pos % 8 != 0 {
            return data.iter().try_for_each(|b| self.write_bits(*b as u32, 8));
        }
        let start = self.bit_pos / 8;
        let end = start + data.len();
        self.buf[start..end].copy_from_slice(data);
        self.bit_pos = end * 8;
        Ok(())
    }

    pub fn write_be_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_all(&value.to_be_bytes())
    }

    pub fn write_be_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.write_all(&value.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::Writer;
    use crate::EncodeError;

    #[test]
    fn writer_writes_values() {
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        w.write_u8(1).unwrap();
        w.write_all(&[2, 3]).unwrap();
        assert_eq!(w.as_written(), &[1, 2, 3]);
    }

    #[test]
    fn writer_bounds() {
        let mut buf = [0u8; 1];
        let mut w = Writer::new(&mut buf);
        w.write_u8(1).unwrap();
        assert_eq!(w.write_u8(2).unwrap_err(), EncodeError::BufferTooSmall);
    }

    #[test]
    fn packs_bit_fields_into_stale_buffer() {
        let mut buf = [0xFFu8; 2];
        let mut w = Writer::new(&mut buf);
        w.write_bits(0b1011, 4).unwrap();
        w.write_bit(false).unwrap();
        w.write_bits(0b110, 3).unwrap();
        w.write_bits(0x5, 4).unwrap();
        assert_eq!(w.bit_position(), 12);
        assert_eq!(w.as_written(), &[0b1011_0110, 0x50]);
    }
}
