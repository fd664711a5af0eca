use crate::encoding::header::TagHeader;
use crate::encoding::value::{context_header, AppTag, TagValue};
use crate::encoding::{encode::Encode, reader::Reader, writer::Writer};
use crate::types::{Date, ObjectId, Time};
use crate::{DecodeError, EncodeError};

/// Any BACnet tag, application or context specific.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tag {
    Application(ApplicationTag),
    Context(ContextTag),
}

impl Tag {
    /// Decodes one tag without outside knowledge of its type.
    ///
    /// Context data tags keep their payload as [`TagValue::Raw`]; opening and
    /// closing markers come back as bare context tags.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let header = TagHeader::decode(r)?;
        if header.is_context_specific {
            ContextTag::decode_payload_raw(r, header).map(Self::Context)
        } else {
            ApplicationTag::decode_payload(r, header).map(Self::Application)
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut Reader::new(bytes))
    }

    pub const fn header(&self) -> &TagHeader {
        match self {
            Self::Application(tag) => &tag.header,
            Self::Context(tag) => &tag.header,
        }
    }

    pub const fn tag_number(&self) -> u8 {
        self.header().actual_tag_number()
    }

    pub const fn is_opening(&self) -> bool {
        self.header().is_opening()
    }

    pub const fn is_closing(&self) -> bool {
        self.header().is_closing()
    }

    /// The carried value, if this is not an opening or closing marker.
    pub const fn value(&self) -> Option<&TagValue> {
        match self {
            Self::Application(tag) => Some(&tag.value),
            Self::Context(tag) => tag.data(),
        }
    }
}

impl Encode for Tag {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Application(tag) => tag.encode(w),
            Self::Context(tag) => tag.encode(w),
        }
    }

    fn bit_len(&self) -> usize {
        match self {
            Self::Application(tag) => tag.bit_len(),
            Self::Context(tag) => tag.bit_len(),
        }
    }
}

/// An application tag: the header names the data type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationTag {
    pub header: TagHeader,
    pub value: TagValue,
}

impl ApplicationTag {
    /// Wraps `value` in the shortest application header for it.
    pub fn new(value: TagValue) -> Result<Self, EncodeError> {
        let tag = value.app_tag().ok_or(EncodeError::Unsupported)?;
        let header = match &value {
            TagValue::Boolean(v) => TagHeader::application(tag.to_u8(), *v as u32),
            _ => TagHeader::application(tag.to_u8(), value.natural_len()),
        };
        Ok(Self { header, value })
    }

    pub fn unsigned(value: u64) -> Self {
        Self::typed(AppTag::UnsignedInt, TagValue::Unsigned(value))
    }

    pub fn enumerated(value: u32) -> Self {
        Self::typed(AppTag::Enumerated, TagValue::Enumerated(value))
    }

    pub fn object_id(id: ObjectId) -> Self {
        Self::typed(AppTag::ObjectId, TagValue::ObjectIdentifier(id))
    }

    pub fn character_string(text: &str) -> Self {
        Self::typed(AppTag::CharacterString, TagValue::character_string(text))
    }

    pub fn date(date: Date) -> Self {
        Self::typed(AppTag::Date, TagValue::Date(date))
    }

    pub fn time(time: Time) -> Self {
        Self::typed(AppTag::Time, TagValue::Time(time))
    }

    fn typed(tag: AppTag, value: TagValue) -> Self {
        Self {
            header: TagHeader::application(tag.to_u8(), value.natural_len()),
            value,
        }
    }

    pub fn data_type(&self) -> Result<AppTag, DecodeError> {
        AppTag::from_u8(self.header.actual_tag_number())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let header = TagHeader::decode(r)?;
        if header.is_context_specific {
            return Err(DecodeError::InvalidTag);
        }
        Self::decode_payload(r, header)
    }

    /// Decodes an application tag that must be of `expected` type.
    ///
    /// Any other tag is an [`DecodeError::InvalidTag`], which a speculative
    /// parse treats as "field absent".
    pub fn decode_expecting(r: &mut Reader<'_>, expected: AppTag) -> Result<Self, DecodeError> {
        let header = TagHeader::decode(r)?;
        if header.is_context_specific || header.actual_tag_number() != expected.to_u8() {
            return Err(DecodeError::InvalidTag);
        }
        Self::decode_payload(r, header)
    }

    fn decode_payload(r: &mut Reader<'_>, header: TagHeader) -> Result<Self, DecodeError> {
        let data_type = AppTag::from_u8(header.actual_tag_number())?;
        if data_type == AppTag::Boolean {
            return match header.length_value_type {
                0 | 1 => Ok(Self {
                    header,
                    value: TagValue::Boolean(header.length_value_type == 1),
                }),
                _ => Err(DecodeError::InvalidValue),
            };
        }
        if header.length_value_type > 5 {
            return Err(DecodeError::InvalidTag);
        }
        let value = TagValue::decode(r, data_type, header.actual_length())?;
        Ok(Self { header, value })
    }

    fn payload_len(&self) -> u32 {
        match self.value {
            TagValue::Boolean(_) => 0,
            _ => self.header.actual_length(),
        }
    }
}

impl Encode for ApplicationTag {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if let TagValue::Boolean(v) = self.value {
            if self.header.length_value_type != v as u8 {
                return Err(EncodeError::ValueOutOfRange);
            }
        }
        self.header.encode(w)?;
        if !matches!(self.value, TagValue::Boolean(_)) {
            self.value.encode(w, self.header.actual_length())?;
        }
        Ok(())
    }

    fn bit_len(&self) -> usize {
        self.header.bit_len() + self.payload_len() as usize * 8
    }
}

/// Payload of a context tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContextValue {
    Opening,
    Closing,
    Data(TagValue),
}

/// A context-specific tag; its meaning comes from where it appears.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextTag {
    pub header: TagHeader,
    pub value: ContextValue,
}

impl ContextTag {
    /// Wraps `value` in the shortest context header for `tag_number`.
    pub fn new(tag_number: u8, value: TagValue) -> Self {
        Self {
            header: context_header(tag_number, &value),
            value: ContextValue::Data(value),
        }
    }

    pub const fn opening(tag_number: u8) -> Self {
        Self {
            header: TagHeader::opening(tag_number),
            value: ContextValue::Opening,
        }
    }

    pub const fn closing(tag_number: u8) -> Self {
        Self {
            header: TagHeader::closing(tag_number),
            value: ContextValue::Closing,
        }
    }

    pub const fn tag_number(&self) -> u8 {
        self.header.actual_tag_number()
    }

    pub const fn data(&self) -> Option<&TagValue> {
        match &self.value {
            ContextValue::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Decodes a context data tag numbered `expected_tag_number` whose payload
    /// is of `data_type`.
    ///
    /// A different tag number fails with [`DecodeError::TagMismatch`]; an
    /// application tag or a marker fails with [`DecodeError::InvalidTag`].
    pub fn decode(
        r: &mut Reader<'_>,
        expected_tag_number: u8,
        data_type: AppTag,
    ) -> Result<Self, DecodeError> {
        let header = Self::decode_header(r, expected_tag_number)?;
        if header.is_opening() || header.is_closing() {
            return Err(DecodeError::InvalidTag);
        }
        let value = TagValue::decode(r, data_type, header.actual_length())?;
        Ok(Self {
            header,
            value: ContextValue::Data(value),
        })
    }

    /// Like [`decode`](Self::decode) but the field may be missing: a soft
    /// failure rewinds the reader and yields `None`.
    pub fn decode_optional(
        r: &mut Reader<'_>,
        expected_tag_number: u8,
        data_type: AppTag,
    ) -> Result<Option<Self>, DecodeError> {
        r.speculate(|r| Self::decode(r, expected_tag_number, data_type))
    }

    /// Decodes the opening or closing marker numbered `expected_tag_number`.
    pub fn decode_marker(
        r: &mut Reader<'_>,
        expected_tag_number: u8,
        opening: bool,
    ) -> Result<TagHeader, DecodeError> {
        let header = Self::decode_header(r, expected_tag_number)?;
        let matches = if opening {
            header.is_opening()
        } else {
            header.is_closing()
        };
        if !matches {
            return Err(DecodeError::InvalidTag);
        }
        Ok(header)
    }

    fn decode_header(r: &mut Reader<'_>, expected_tag_number: u8) -> Result<TagHeader, DecodeError> {
        let header = TagHeader::decode(r)?;
        if !header.is_context_specific {
            return Err(DecodeError::InvalidTag);
        }
        if header.actual_tag_number() != expected_tag_number {
            return Err(DecodeError::TagMismatch {
                expected: expected_tag_number,
                actual: header.actual_tag_number(),
            });
        }
        Ok(header)
    }

    fn decode_payload_raw(r: &mut Reader<'_>, header: TagHeader) -> Result<Self, DecodeError> {
        let value = if header.is_opening() {
            ContextValue::Opening
        } else if header.is_closing() {
            ContextValue::Closing
        } else {
            ContextValue::Data(TagValue::decode_raw(r, header.actual_length())?)
        };
        Ok(Self { header, value })
    }
}

impl Encode for ContextTag {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let marker_ok = match self.value {
            ContextValue::Opening => self.header.is_opening(),
            ContextValue::Closing => self.header.is_closing(),
            ContextValue::Data(_) => !self.header.is_opening() && !self.header.is_closing(),
        };
        if !self.header.is_context_specific || !marker_ok {
            return Err(EncodeError::InvalidLength);
        }
        self.header.encode(w)?;
        if let ContextValue::Data(value) = &self.value {
            value.encode(w, self.header.actual_length())?;
        }
        Ok(())
    }

    fn bit_len(&self) -> usize {
        let payload = match self.value {
            ContextValue::Data(_) => self.header.actual_length() as usize * 8,
            _ => 0,
        };
        self.header.bit_len() + payload
    }
}

/// Whether the next tag is the closing marker numbered `expected_tag_number`.
///
/// Probes a copy of the reader, so the caller's position never moves.
pub fn peek_is_closing_tag(r: &Reader<'_>, expected_tag_number: u8) -> bool {
    let mut probe = *r;
    match TagHeader::decode(&mut probe) {
        Ok(header) => header.is_closing() && header.actual_tag_number() == expected_tag_number,
        Err(_) => false,
    }
}
