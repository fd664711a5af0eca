use crate::encoding::{encode::Encode, reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Tag number nibble announcing a one-octet extended tag number.
pub const EXTENDED_TAG_NUMBER: u8 = 0x0F;
/// Length/value/type announcing an extended length octet.
pub const EXTENDED_LENGTH: u8 = 0x05;
/// Extended length octet announcing a following 16-bit length.
pub const EXTENDED_LENGTH_U16: u8 = 254;
/// Extended length octet announcing a following 32-bit length.
pub const EXTENDED_LENGTH_U32: u8 = 255;
pub const OPENING_TAG: u8 = 0x06;
pub const CLOSING_TAG: u8 = 0x07;

/// The generic BACnet tag header.
///
/// Every extension is present exactly when the field before it selects it:
/// `ext_tag_number` iff `tag_number_or_type == 15`, `ext_length` iff
/// `length_value_type == 5`, and the 16- or 32-bit length iff `ext_length` is
/// 254 or 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagHeader {
    pub tag_number_or_type: u8,
    pub is_context_specific: bool,
    pub length_value_type: u8,
    pub ext_tag_number: Option<u8>,
    pub ext_length: Option<u8>,
    pub ext_ext_length: Option<u16>,
    pub ext_ext_ext_length: Option<u32>,
}

impl TagHeader {
    /// Builds the shortest header for a data tag of `length` payload octets.
    pub const fn new(tag_number: u8, is_context_specific: bool, length: u32) -> Self {
        let (tag_number_or_type, ext_tag_number) = split_tag_number(tag_number);
        let (length_value_type, ext_length, ext_ext_length, ext_ext_ext_length) =
            if length < EXTENDED_LENGTH as u32 {
                (length as u8, None, None, None)
            } else if length < EXTENDED_LENGTH_U16 as u32 {
                (EXTENDED_LENGTH, Some(length as u8), None, None)
            } else if length <= u16::MAX as u32 {
                (
                    EXTENDED_LENGTH,
                    Some(EXTENDED_LENGTH_U16),
                    Some(length as u16),
                    None,
                )
            } else {
                (
                    EXTENDED_LENGTH,
                    Some(EXTENDED_LENGTH_U32),
                    None,
                    Some(length),
                )
            };
        Self {
            tag_number_or_type,
            is_context_specific,
            length_value_type,
            ext_tag_number,
            ext_length,
            ext_ext_length,
            ext_ext_ext_length,
        }
    }

    pub const fn application(tag_number: u8, length: u32) -> Self {
        Self::new(tag_number, false, length)
    }

    pub const fn context(tag_number: u8, length: u32) -> Self {
        Self::new(tag_number, true, length)
    }

    pub const fn opening(tag_number: u8) -> Self {
        Self::marker(tag_number, OPENING_TAG)
    }

    pub const fn closing(tag_number: u8) -> Self {
        Self::marker(tag_number, CLOSING_TAG)
    }

    const fn marker(tag_number: u8, length_value_type: u8) -> Self {
        let (tag_number_or_type, ext_tag_number) = split_tag_number(tag_number);
        Self {
            tag_number_or_type,
            is_context_specific: true,
            length_value_type,
            ext_tag_number,
            ext_length: None,
            ext_ext_length: None,
            ext_ext_ext_length: None,
        }
    }

    /// The tag number after applying the extension, if any.
    pub const fn actual_tag_number(&self) -> u8 {
        match self.ext_tag_number {
            Some(n) => n,
            None => self.tag_number_or_type,
        }
    }

    /// Payload length in octets after applying the deepest length extension.
    ///
    /// Meaningless for opening/closing markers and application booleans,
    /// which carry no length.
    pub const fn actual_length(&self) -> u32 {
        if let Some(len) = self.ext_ext_ext_length {
            return len;
        }
        if let Some(len) = self.ext_ext_length {
            return len as u32;
        }
        if let Some(len) = self.ext_length {
            return len as u32;
        }
        self.length_value_type as u32
    }

    pub const fn is_opening(&self) -> bool {
        self.is_context_specific && self.length_value_type == OPENING_TAG
    }

    pub const fn is_closing(&self) -> bool {
        self.is_context_specific && self.length_value_type == CLOSING_TAG
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let tag_number_or_type = r.read_bits(4)? as u8;
        let is_context_specific = r.read_bit()?;
        let length_value_type = r.read_bits(3)? as u8;

        let ext_tag_number = if tag_number_or_type == EXTENDED_TAG_NUMBER {
            Some(r.read_u8()?)
        } else {
            None
        };
        let ext_length = if length_value_type == EXTENDED_LENGTH {
            Some(r.read_u8()?)
        } else {
            None
        };
        let ext_ext_length = if ext_length == Some(EXTENDED_LENGTH_U16) {
            Some(r.read_be_u16()?)
        } else {
            None
        };
        let ext_ext_ext_length = if ext_length == Some(EXTENDED_LENGTH_U32) {
            Some(r.read_be_u32()?)
        } else {
            None
        };

        Ok(Self {
            tag_number_or_type,
            is_context_specific,
            length_value_type,
            ext_tag_number,
            ext_length,
            ext_ext_length,
            ext_ext_ext_length,
        })
    }

    fn check_extensions(&self) -> Result<(), EncodeError> {
        let consistent = self.tag_number_or_type <= EXTENDED_TAG_NUMBER
            && self.length_value_type <= CLOSING_TAG
            && (self.tag_number_or_type == EXTENDED_TAG_NUMBER) == self.ext_tag_number.is_some()
            && (self.length_value_type == EXTENDED_LENGTH) == self.ext_length.is_some()
            && (self.ext_length == Some(EXTENDED_LENGTH_U16)) == self.ext_ext_length.is_some()
            && (self.ext_length == Some(EXTENDED_LENGTH_U32)) == self.ext_ext_ext_length.is_some();
        if consistent {
            Ok(())
        } else {
            Err(EncodeError::InvalidLength)
        }
    }
}

impl Encode for TagHeader {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.check_extensions()?;
        w.write_bits(self.tag_number_or_type as u32, 4)?;
        w.write_bit(self.is_context_specific)?;
        w.write_bits(self.length_value_type as u32, 3)?;
        if let Some(n) = self.ext_tag_number {
            w.write_u8(n)?;
        }
        if let Some(len) = self.ext_length {
            w.write_u8(len)?;
        }
        if let Some(len) = self.ext_ext_length {
            w.write_be_u16(len)?;
        }
        if let Some(len) = self.ext_ext_ext_length {
            w.write_be_u32(len)?;
        }
        Ok(())
    }

    fn bit_len(&self) -> usize {
        8 + self.ext_tag_number.map_or(0, |_| 8)
            + self.ext_length.map_or(0, |_| 8)
            + self.ext_ext_length.map_or(0, |_| 16)
            + self.ext_ext_ext_length.map_or(0, |_| 32)
    }
}

const fn split_tag_number(tag_number: u8) -> (u8, Option<u8>) {
    if tag_number < EXTENDED_TAG_NUMBER {
        (tag_number, None)
    } else {
        (EXTENDED_TAG_NUMBER, Some(tag_number))
    }
}
