use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Minimal octet count for an unsigned payload (at least one).
pub const fn unsigned_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        bits.div_ceil(8)
    }
}

/// Minimal octet count for a two's-complement signed payload.
pub const fn signed_len(value: i64) -> usize {
    let significant = if value < 0 {
        64 - (!value).leading_zeros() as usize
    } else {
        64 - value.leading_zeros() as usize
    };
    (significant + 1).div_ceil(8)
}

/// Writes `value` big-endian into exactly `len` octets.
pub fn encode_unsigned(w: &mut Writer<'_>, value: u64, len: usize) -> Result<(), EncodeError> {
    if len > 8 || (len < 8 && value >> (len * 8) != 0) {
        return Err(EncodeError::ValueOutOfRange);
    }
    let bytes = value.to_be_bytes();
    w.write_all(&bytes[8 - len..])
}

/// Reads a big-endian unsigned integer of `len` octets; zero octets read as 0.
pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u64, DecodeError> {
    if len > 8 {
        return Err(DecodeError::Overflow);
    }
    let mut value = 0u64;
    for _ in 0..len {
        value = (value << 8) | r.read_u8()? as u64;
    }
    Ok(value)
}

pub fn encode_signed(w: &mut Writer<'_>, value: i64, len: usize) -> Result<(), EncodeError> {
    if len == 0 || len > 8 || signed_len(value) > len {
        return Err(EncodeError::ValueOutOfRange);
    }
    let bytes = value.to_be_bytes();
    w.write_all(&bytes[8 - len..])
}

/// Reads a sign-extended two's-complement integer of `len` octets.
pub fn decode_signed(r: &mut Reader<'_>, len: usize) -> Result<i64, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    if len > 8 {
        return Err(DecodeError::Overflow);
    }
    let mut out = [0u8; 8];
    for slot in &mut out[8 - len..] {
        *slot = r.read_u8()?;
    }
    if (out[8 - len] & 0x80) != 0 {
        for b in &mut out[..8 - len] {
            *b = 0xFF;
        }
    }
    Ok(i64::from_be_bytes(out))
}

#[cfg(test)]
mod tests {
    use super::{
        decode_signed, decode_unsigned, encode_signed, encode_unsigned, signed_len, unsigned_len,
    };
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::{DecodeError, EncodeError};
    use proptest::prelude::*;

    #[test]
    fn minimal_lengths() {
        assert_eq!(unsigned_len(0), 1);
        assert_eq!(unsigned_len(0xFF), 1);
        assert_eq!(unsigned_len(0x100), 2);
        assert_eq!(unsigned_len(u64::MAX), 8);
        assert_eq!(signed_len(0), 1);
        assert_eq!(signed_len(127), 1);
        assert_eq!(signed_len(128), 2);
        assert_eq!(signed_len(-128), 1);
        assert_eq!(signed_len(-129), 2);
        assert_eq!(signed_len(i64::MIN), 8);
    }

    #[test]
    fn zero_length_unsigned_is_zero() {
        let mut r = Reader::new(&[]);
        assert_eq!(decode_unsigned(&mut r, 0).unwrap(), 0);
    }

    #[test]
    fn oversized_integers_overflow() {
        let bytes = [0u8; 9];
        let mut r = Reader::new(&bytes);
        assert_eq!(decode_unsigned(&mut r, 9).unwrap_err(), DecodeError::Overflow);
        assert_eq!(decode_signed(&mut r, 9).unwrap_err(), DecodeError::Overflow);
    }

    #[test]
    fn value_must_fit_declared_length() {
        let mut b = [0u8; 8];
        let mut w = Writer::new(&mut b);
        assert_eq!(
            encode_unsigned(&mut w, 0x1234, 1).unwrap_err(),
            EncodeError::ValueOutOfRange
        );
        assert_eq!(
            encode_signed(&mut w, 300, 1).unwrap_err(),
            EncodeError::ValueOutOfRange
        );
        encode_unsigned(&mut w, 0x12, 3).unwrap();
        assert_eq!(w.as_written(), &[0, 0, 0x12]);
    }

    proptest! {
        #[test]
        fn unsigned_roundtrip(v in any::<u64>()) {
            let mut b = [0u8; 8];
            let mut w = Writer::new(&mut b);
            let len = unsigned_len(v);
            encode_unsigned(&mut w, v, len).unwrap();
            prop_assert_eq!(w.position(), len);
            let mut r = Reader::new(w.as_written());
            let got = decode_unsigned(&mut r, len).unwrap();
            prop_assert_eq!(got, v);
        }

        #[test]
        fn signed_roundtrip(v in any::<i64>()) {
            let mut b = [0u8; 8];
            let mut w = Writer::new(&mut b);
            let len = signed_len(v);
            encode_signed(&mut w, v, len).unwrap();
            let mut r = Reader::new(w.as_written());
            let got = decode_signed(&mut r, len).unwrap();
            prop_assert_eq!(got, v);
        }
    }
}
