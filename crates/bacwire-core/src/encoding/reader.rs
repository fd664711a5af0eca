use crate::encoding::options::DecodeOptions;
use crate::DecodeError;

/// Bit-granular cursor over a borrowed frame.
///
/// The reader is `Copy`: taking a copy is a checkpoint, and probing a copy
/// never moves the original.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    bit_pos: usize,
    options: DecodeOptions,
    nesting: u16,
}

impl<'a> Reader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            bit_pos: 0,
            options: DecodeOptions::lenient(),
            nesting: 0,
        }
    }

    pub const fn with_options(buf: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            buf,
            bit_pos: 0,
            options,
            nesting: 0,
        }
    }

    pub const fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Octets consumed so far, counting a partially read octet as consumed.
    pub const fn position(&self) -> usize {
        self.bit_pos.div_ceil(8)
    }

    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Moves the cursor back to a bit position previously taken from
    /// [`bit_position`](Self::bit_position).
    pub fn reset(&mut self, bit_pos: usize) {
        self.bit_pos = bit_pos.min(self.buf.len() * 8);
    }

    /// Constructed blocks currently open around the cursor.
    pub const fn nesting(&self) -> u16 {
        self.nesting
    }

    /// Enters one more constructed block, failing past `max_nesting`.
    pub fn enter_nested(&mut self) -> Result<(), DecodeError> {
        if self.nesting >= self.options.max_nesting {
            return Err(DecodeError::NestingTooDeep {
                limit: self.options.max_nesting,
            });
        }
        self.nesting += 1;
        Ok(())
    }

    pub fn leave_nested(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    pub fn remaining_bits(&self) -> usize {
        (self.buf.len() * 8).saturating_sub(self.bit_pos)
    }

    /// Whole octets left after the cursor.
    pub fn remaining(&self) -> usize {
        self.remaining_bits() / 8
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0
    }

    pub const fn is_aligned(&self) -> bool {
        self.bit_pos % 8 == 0
    }

    pub fn read_bit(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads `count` bits (at most 32) most significant first.
    pub fn read_bits(&mut self, count: u8) -> Result<u32, DecodeError> {
        debug_assert!(count <= 32);
        if self.remaining_bits() < count as usize {
            return Err(DecodeError::UnexpectedEof);
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.buf[self.bit_pos / 8];
            let bit = (byte >> (7 - (self.bit_pos % 8))) & 1;
            value = (value << 1) | bit as u32;
            self.bit_pos += 1;
        }
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        if self.is_aligned() {
            let byte = self
                .buf
                .get(self.bit_pos / 8)
                .copied()
                .ok_or(DecodeError::UnexpectedEof)?;
            self.bit_pos += 8;
            return Ok(byte);
        }
        Ok(self.read_bits(8)? as u8)
    }

    /// Borrows the next `len` octets. The cursor must sit on an octet boundary.
    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if !self.is_aligned() {
            return Err(DecodeError::Unsupported);
        }
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEof);
        }
        let start = self.bit_pos / 8;
        self.bit_pos += len * 8;
        Ok(&self.buf[start..start + len])
    }

    pub fn read_be_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(self.read_bits(16)? as u16)
    }

    pub fn read_be_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_bits(32)
    }

    /// Splits off the next `len` octets as a reader of their own and advances
    /// past them. The child shares this reader's options and nesting depth.
    pub fn sub_reader(&mut self, len: usize) -> Result<Reader<'a>, DecodeError> {
        let bytes = self.read_exact(len)?;
        Ok(Reader {
            buf: bytes,
            bit_pos: 0,
            options: self.options,
            nesting: self.nesting,
        })
    }

    /// Reads a reserved or constant field of `bits` width and checks it
    /// against `expected`.
    pub fn reserved(
        &mut self,
        field: &'static str,
        bits: u8,
        expected: u32,
    ) -> Result<u32, DecodeError> {
        let actual = self.read_bits(bits)?;
        self.check_constant(field, expected, actual)?;
        Ok(actual)
    }

    /// Lenient decoding logs a mismatch and continues; strict decoding fails.
    pub fn check_constant(
        &self,
        field: &'static str,
        expected: u32,
        actual: u32,
    ) -> Result<(), DecodeError> {
        if expected == actual {
            return Ok(());
        }
        if self.options.is_strict() {
            return Err(DecodeError::ConstantFieldMismatch {
                field,
                expected,
                actual,
            });
        }
        log::warn!(
            "unexpected value in {field} at bit {}: expected 0x{expected:x}, got 0x{actual:x}",
            self.bit_pos
        );
        Ok(())
    }

    /// Attempts `parse` from the current position.
    ///
    /// On success the cursor stays advanced. On a soft failure (see
    /// [`DecodeError::is_soft`]) the cursor is restored and `Ok(None)` is
    /// returned; any other failure propagates.
    pub fn speculate<T, F>(&mut self, parse: F) -> Result<Option<T>, DecodeError>
    where
        F: FnOnce(&mut Self) -> Result<T, DecodeError>,
    {
        let checkpoint = self.bit_pos;
        match parse(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_soft() => {
                self.reset(checkpoint);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Reader;
    use crate::encoding::options::DecodeOptions;
    use crate::DecodeError;

    #[test]
    fn reader_reads_values() {
        let mut r = Reader::new(&[1, 2, 3, 4, 5]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_exact(2).unwrap(), &[2, 3]);
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn reader_bounds() {
        let mut r = Reader::new(&[1]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u8().unwrap_err(), DecodeError::UnexpectedEof);
    }

    #[test]
    fn reads_packed_bit_fields() {
        let mut r = Reader::new(&[0b1011_0110, 0xFF]);
        assert_eq!(r.read_bits(4).unwrap(), 0b1011);
        assert!(!r.read_bit().unwrap());
        assert_eq!(r.read_bits(3).unwrap(), 0b110);
        assert!(r.is_aligned());
        assert_eq!(r.read_u8().unwrap(), 0xFF);
        assert!(r.is_empty());
    }

    #[test]
    fn unaligned_octet_read() {
        let mut r = Reader::new(&[0x0A, 0xBC]);
        r.read_bits(4).unwrap();
        assert_eq!(r.read_u8().unwrap(), 0xAB);
        assert_eq!(r.read_exact(1).unwrap_err(), DecodeError::Unsupported);
    }

    #[test]
    fn speculate_rewinds_on_soft_error() {
        let mut r = Reader::new(&[0x01]);
        let got = r.speculate(|r| r.read_be_u16()).unwrap();
        assert_eq!(got, None);
        assert_eq!(r.bit_position(), 0);

        let got = r.speculate(|r| r.read_u8()).unwrap();
        assert_eq!(got, Some(1));
        assert!(r.is_empty());
    }

    #[test]
    fn speculate_propagates_hard_error() {
        let mut r = Reader::new(&[0x01]);
        let err = r
            .speculate(|r| {
                r.read_u8()?;
                Err::<(), _>(DecodeError::Overflow)
            })
            .unwrap_err();
        assert_eq!(err, DecodeError::Overflow);
    }

    #[test]
    fn reserved_mismatch_depends_on_strictness() {
        let mut lenient = Reader::new(&[0xC0]);
        assert_eq!(lenient.reserved("reserved", 2, 0).unwrap(), 0b11);

        let mut strict = Reader::with_options(&[0xC0], DecodeOptions::strict());
        assert_eq!(
            strict.reserved("reserved", 2, 0).unwrap_err(),
            DecodeError::ConstantFieldMismatch {
                field: "reserved",
                expected: 0,
                actual: 3
            }
        );
    }

    #[test]
    fn sub_reader_is_bounded() {
        let mut r = Reader::new(&[1, 2, 3]);
        let mut child = r.sub_reader(2).unwrap();
        assert_eq!(child.read_be_u16().unwrap(), 0x0102);
        assert!(child.read_u8().is_err());
        assert_eq!(r.read_u8().unwrap(), 3);
    }

    #[test]
    fn reset_returns_to_checkpoint() {
        let mut r = Reader::new(&[0xAB, 0xCD]);
        let checkpoint = r.bit_position();
        r.read_bits(12).unwrap();
        r.reset(checkpoint);
        assert_eq!(r.read_be_u16().unwrap(), 0xABCD);
        r.reset(1000);
        assert!(r.is_empty());
    }

    #[test]
    fn nesting_is_capped_and_inherited() {
        let mut r = Reader::with_options(&[1, 2], DecodeOptions::default().with_max_nesting(2));
        r.enter_nested().unwrap();
        let mut child = r.sub_reader(1).unwrap();
        assert_eq!(child.nesting(), 1);
        child.enter_nested().unwrap();
        assert_eq!(
            child.enter_nested().unwrap_err(),
            DecodeError::NestingTooDeep { limit: 2 }
        );
        r.leave_nested();
        assert_eq!(r.nesting(), 0);
    }
}
