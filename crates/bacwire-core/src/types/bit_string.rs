use alloc::vec::Vec;

/// An application bit string: the count of unused trailing bits in the last
/// octet followed by the packed bits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString {
    pub unused_bits: u8,
    pub data: Vec<u8>,
}

impl BitString {
    pub fn new(unused_bits: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            unused_bits,
            data: data.into(),
        }
    }

    /// Number of meaningful bits.
    pub fn len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused_bits as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bit `index`, counting from the most significant bit of the first octet.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len() {
            return None;
        }
        let byte = self.data[index / 8];
        Some(byte & (0x80 >> (index % 8)) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::BitString;

    #[test]
    fn status_flags_bits() {
        let flags = BitString::new(4, [0b0100_0000]);
        assert_eq!(flags.len(), 4);
        assert_eq!(flags.bit(1), Some(true));
        assert_eq!(flags.bit(0), Some(false));
        assert_eq!(flags.bit(4), None);
    }
}
