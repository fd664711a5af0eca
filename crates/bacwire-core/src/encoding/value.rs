use crate::encoding::header::TagHeader;
use crate::encoding::primitives::{
    decode_signed, decode_unsigned, encode_signed, encode_unsigned, signed_len, unsigned_len,
};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::error::Layer;
use crate::types::{BitString, Date, ObjectId, Time};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// Application tag numbers, which double as the data types a context tag can
/// be told to carry.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Null),
            1 => Ok(Self::Boolean),
            2 => Ok(Self::UnsignedInt),
            3 => Ok(Self::SignedInt),
            4 => Ok(Self::Real),
            5 => Ok(Self::Double),
            6 => Ok(Self::OctetString),
            7 => Ok(Self::CharacterString),
            8 => Ok(Self::BitString),
            9 => Ok(Self::Enumerated),
            10 => Ok(Self::Date),
            11 => Ok(Self::Time),
            12 => Ok(Self::ObjectId),
            other => Err(DecodeError::UnknownVariant {
                layer: Layer::ApplicationTag,
                value: other as u16,
            }),
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Character set octet for ANSI X3.4 / UTF-8 character strings.
pub const CHARSET_UTF8: u8 = 0;

/// A decoded tag payload.
///
/// `Raw` holds the payload of a context tag whose data type was not known at
/// decode time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagValue {
    Null,
    Boolean(bool),
    Unsigned(u64),
    Signed(i64),
    Real(f32),
    Double(f64),
    OctetString(Vec<u8>),
    CharacterString { encoding: u8, bytes: Vec<u8> },
    BitString(BitString),
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectIdentifier(ObjectId),
    Raw(Vec<u8>),
}

impl TagValue {
    pub fn character_string(text: &str) -> Self {
        Self::CharacterString {
            encoding: CHARSET_UTF8,
            bytes: text.as_bytes().to_vec(),
        }
    }

    /// The application tag this value is encoded under, `None` for `Raw`.
    pub const fn app_tag(&self) -> Option<AppTag> {
        Some(match self {
            Self::Null => AppTag::Null,
            Self::Boolean(_) => AppTag::Boolean,
            Self::Unsigned(_) => AppTag::UnsignedInt,
            Self::Signed(_) => AppTag::SignedInt,
            Self::Real(_) => AppTag::Real,
            Self::Double(_) => AppTag::Double,
            Self::OctetString(_) => AppTag::OctetString,
            Self::CharacterString { .. } => AppTag::CharacterString,
            Self::BitString(_) => AppTag::BitString,
            Self::Enumerated(_) => AppTag::Enumerated,
            Self::Date(_) => AppTag::Date,
            Self::Time(_) => AppTag::Time,
            Self::ObjectIdentifier(_) => AppTag::ObjectId,
            Self::Raw(_) => return None,
        })
    }

    /// Shortest payload length in octets, as a context tag would carry it.
    pub fn natural_len(&self) -> u32 {
        let len = match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Unsigned(v) => unsigned_len(*v),
            Self::Signed(v) => signed_len(*v),
            Self::Real(_) => 4,
            Self::Double(_) => 8,
            Self::OctetString(b) | Self::Raw(b) => b.len(),
            Self::CharacterString { bytes, .. } => 1 + bytes.len(),
            Self::BitString(bits) => 1 + bits.data.len(),
            Self::Enumerated(v) => unsigned_len(*v as u64),
            Self::Date(_) | Self::Time(_) | Self::ObjectIdentifier(_) => 4,
        };
        len as u32
    }

    /// Reads a payload of `len` octets as `data_type`.
    pub fn decode(r: &mut Reader<'_>, data_type: AppTag, len: u32) -> Result<Self, DecodeError> {
        let len = len as usize;
        Ok(match data_type {
            AppTag::Null => {
                expect_len(len, 0)?;
                Self::Null
            }
            AppTag::Boolean => {
                expect_len(len, 1)?;
                match r.read_u8()? {
                    0 => Self::Boolean(false),
                    1 => Self::Boolean(true),
                    _ => return Err(DecodeError::InvalidValue),
                }
            }
            AppTag::UnsignedInt => Self::Unsigned(decode_unsigned(r, len)?),
            AppTag::SignedInt => Self::Signed(decode_signed(r, len)?),
            AppTag::Real => {
                expect_len(len, 4)?;
                Self::Real(f32::from_bits(r.read_be_u32()?))
            }
            AppTag::Double => {
                expect_len(len, 8)?;
                let hi = r.read_be_u32()? as u64;
                let lo = r.read_be_u32()? as u64;
                Self::Double(f64::from_bits((hi << 32) | lo))
            }
            AppTag::OctetString => Self::OctetString(r.read_exact(len)?.to_vec()),
            AppTag::CharacterString => {
                if len == 0 {
                    return Err(DecodeError::InvalidLength);
                }
                let encoding = r.read_u8()?;
                Self::CharacterString {
                    encoding,
                    bytes: r.read_exact(len - 1)?.to_vec(),
                }
            }
            AppTag::BitString => {
                if len == 0 {
                    return Err(DecodeError::InvalidLength);
                }
                let unused_bits = r.read_u8()?;
                Self::BitString(BitString::new(unused_bits, r.read_exact(len - 1)?))
            }
            AppTag::Enumerated => {
                if len > 4 {
                    return Err(DecodeError::Overflow);
                }
                Self::Enumerated(decode_unsigned(r, len)? as u32)
            }
            AppTag::Date => Self::Date(Date::from_octets(read_quad(r, len)?)),
            AppTag::Time => Self::Time(Time::from_octets(read_quad(r, len)?)),
            AppTag::ObjectId => {
                expect_len(len, 4)?;
                Self::ObjectIdentifier(ObjectId::from_raw(r.read_be_u32()?))
            }
        })
    }

    /// Reads `len` octets without interpreting them.
    pub fn decode_raw(r: &mut Reader<'_>, len: u32) -> Result<Self, DecodeError> {
        Ok(Self::Raw(r.read_exact(len as usize)?.to_vec()))
    }

    /// Writes the payload into exactly `len` octets.
    pub fn encode(&self, w: &mut Writer<'_>, len: u32) -> Result<(), EncodeError> {
        let len = len as usize;
        match self {
            Self::Null => fixed_len(len, 0),
            Self::Boolean(v) => {
                fixed_len(len, 1)?;
                w.write_u8(*v as u8)
            }
            Self::Unsigned(v) => encode_unsigned(w, *v, len),
            Self::Signed(v) => encode_signed(w, *v, len),
            Self::Real(v) => {
                fixed_len(len, 4)?;
                w.write_be_u32(v.to_bits())
            }
            Self::Double(v) => {
                fixed_len(len, 8)?;
                w.write_all(&v.to_bits().to_be_bytes())
            }
            Self::OctetString(b) | Self::Raw(b) => {
                fixed_len(len, b.len())?;
                w.write_all(b)
            }
            Self::CharacterString { encoding, bytes } => {
                fixed_len(len, 1 + bytes.len())?;
                w.write_u8(*encoding)?;
                w.write_all(bytes)
            }
            Self::BitString(bits) => {
                fixed_len(len, 1 + bits.data.len())?;
                w.write_u8(bits.unused_bits)?;
                w.write_all(&bits.data)
            }
            Self::Enumerated(v) => {
                if len > 4 {
                    return Err(EncodeError::ValueOutOfRange);
                }
                encode_unsigned(w, *v as u64, len)
            }
            Self::Date(d) => {
                fixed_len(len, 4)?;
                w.write_all(&d.to_octets())
            }
            Self::Time(t) => {
                fixed_len(len, 4)?;
                w.write_all(&t.to_octets())
            }
            Self::ObjectIdentifier(id) => {
                fixed_len(len, 4)?;
                w.write_be_u32(id.raw())
            }
        }
    }

    pub const fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_enumerated(&self) -> Option<u32> {
        match self {
            Self::Enumerated(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Self::ObjectIdentifier(id) => Some(*id),
            _ => None,
        }
    }

    /// The text of a UTF-8 character string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::CharacterString {
                encoding: CHARSET_UTF8,
                bytes,
            } => core::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

/// The header a value gets when written as a context tag with its natural length.
pub(crate) fn context_header(tag_number: u8, value: &TagValue) -> TagHeader {
    TagHeader::context(tag_number, value.natural_len())
}

fn expect_len(actual: usize, expected: usize) -> Result<(), DecodeError> {
    if actual == expected {
        Ok(())
    } else {
        Err(DecodeError::InvalidLength)
    }
}

fn fixed_len(declared: usize, needed: usize) -> Result<(), EncodeError> {
    if declared == needed {
        Ok(())
    } else {
        Err(EncodeError::InvalidLength)
    }
}

fn read_quad(r: &mut Reader<'_>, len: usize) -> Result<[u8; 4], DecodeError> {
    expect_len(len, 4)?;
    let b = r.read_exact(4)?;
    Ok([b[0], b[1], b[2], b[3]])
}
