use crate::encoding::writer::Writer;
use crate::EncodeError;
use alloc::vec;
use alloc::vec::Vec;

/// A wire entity that can serialize itself and report its exact encoded size.
///
/// `bit_len` must equal the number of bits `encode` writes, which is also the
/// number of bits the matching decoder consumes.
pub trait Encode {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError>;

    fn bit_len(&self) -> usize;

    fn byte_len(&self) -> usize {
        self.bit_len().div_ceil(8)
    }

    /// Encodes into a freshly sized buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = vec![0u8; self.byte_len()];
        let mut w = Writer::new(&mut buf);
        self.encode(&mut w)?;
        if w.bit_position() != self.bit_len() {
            return Err(EncodeError::InvalidLength);
        }
        Ok(buf)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Some(inner) => inner.encode(w),
            None => Ok(()),
        }
    }

    fn bit_len(&self) -> usize {
        self.as_ref().map_or(0, Encode::bit_len)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.iter().try_for_each(|item| item.encode(w))
    }

    fn bit_len(&self) -> usize {
        self.iter().map(Encode::bit_len).sum()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.as_slice().encode(w)
    }

    fn bit_len(&self) -> usize {
        self.as_slice().bit_len()
    }
}
