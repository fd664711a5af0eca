use crate::encoding::header::TagHeader;
use crate::encoding::tag::{peek_is_closing_tag, ContextTag, Tag};
use crate::encoding::{encode::Encode, reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// One item inside a tagged parameter list: a primitive tag or a nested
/// opening/closing bracketed block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Tag(Tag),
    Constructed(ConstructedData),
}

impl Element {
    /// Decodes one element. An opening tag starts a nested block that runs to
    /// its matching closing tag.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let mut probe = *r;
        let header = TagHeader::decode(&mut probe)?;
        if header.is_opening() {
            ConstructedData::decode(r, header.actual_tag_number()).map(Self::Constructed)
        } else {
            Tag::decode(r).map(Self::Tag)
        }
    }

    pub const fn as_tag(&self) -> Option<&Tag> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::Constructed(_) => None,
        }
    }
}

impl Encode for Element {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Tag(tag) => tag.encode(w),
            Self::Constructed(data) => data.encode(w),
        }
    }

    fn bit_len(&self) -> usize {
        match self {
            Self::Tag(tag) => tag.bit_len(),
            Self::Constructed(data) => data.bit_len(),
        }
    }
}

/// Elements bracketed by an opening and closing tag of the same number.
///
/// The element list has no count: it ends when the closing tag with the
/// matching number is next. Closing tags with other numbers are kept as
/// elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructedData {
    pub opening: TagHeader,
    pub elements: Vec<Element>,
    pub closing: TagHeader,
}

impl ConstructedData {
    pub fn new(tag_number: u8, elements: Vec<Element>) -> Self {
        Self {
            opening: TagHeader::opening(tag_number),
            elements,
            closing: TagHeader::closing(tag_number),
        }
    }

    /// Convenience for the common single-value block, e.g. a property value.
    pub fn with_tags(tag_number: u8, tags: impl IntoIterator<Item = Tag>) -> Self {
        Self::new(tag_number, tags.into_iter().map(Element::Tag).collect())
    }

    pub const fn tag_number(&self) -> u8 {
        self.opening.actual_tag_number()
    }

    pub fn decode(r: &mut Reader<'_>, tag_number: u8) -> Result<Self, DecodeError> {
        let opening = ContextTag::decode_marker(r, tag_number, true)?;
        r.enter_nested()?;
        let elements = decode_until_closing(r, tag_number);
        r.leave_nested();
        let elements = elements?;
        let closing = ContextTag::decode_marker(r, tag_number, false)?;
        Ok(Self {
            opening,
            elements,
            closing,
        })
    }

    /// Optional block: absent when the next tag is not the expected opening tag.
    pub fn decode_optional(r: &mut Reader<'_>, tag_number: u8) -> Result<Option<Self>, DecodeError> {
        let mut probe = *r;
        match ContextTag::decode_marker(&mut probe, tag_number, true) {
            Ok(_) => Self::decode(r, tag_number).map(Some),
            Err(err) if err.is_soft() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// The primitive tags directly inside this block.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.elements.iter().filter_map(Element::as_tag)
    }
}

impl Encode for ConstructedData {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if !self.opening.is_opening()
            || !self.closing.is_closing()
            || self.opening.actual_tag_number() != self.closing.actual_tag_number()
        {
            return Err(EncodeError::InvalidLength);
        }
        self.opening.encode(w)?;
        self.elements.encode(w)?;
        self.closing.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.opening.bit_len() + self.elements.bit_len() + self.closing.bit_len()
    }
}

fn decode_until_closing(r: &mut Reader<'_>, tag_number: u8) -> Result<Vec<Element>, DecodeError> {
    let mut elements = Vec::new();
    while !peek_is_closing_tag(r, tag_number) {
        elements.push(Element::decode(r)?);
    }
    Ok(elements)
}

/// Decodes elements until the reader is exhausted.
pub fn decode_elements(r: &mut Reader<'_>) -> Result<Vec<Element>, DecodeError> {
    let mut elements = Vec::new();
    while !r.is_empty() {
        elements.push(Element::decode(r)?);
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::{decode_elements, ConstructedData, Element};
    use crate::encoding::options::{DecodeOptions, DEFAULT_MAX_NESTING};
    use crate::encoding::{encode::Encode, reader::Reader, tag::Tag, value::TagValue};
    use crate::DecodeError;

    #[test]
    fn property_value_block() {
        let bytes = [0x3E, 0x44, 0x42, 0x91, 0x00, 0x00, 0x3F];
        let mut r = Reader::new(&bytes);
        let data = ConstructedData::decode(&mut r, 3).unwrap();
        assert!(r.is_empty());
        assert_eq!(data.elements.len(), 1);
        assert_eq!(
            data.tags().next().and_then(Tag::value),
            Some(&TagValue::Real(72.5))
        );
        assert_eq!(data.bit_len(), bytes.len() * 8);
        assert_eq!(data.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn nested_blocks() {
        let bytes = [0x1E, 0x0E, 0x21, 0x01, 0x0F, 0x2F, 0x1F];
        let mut r = Reader::new(&bytes);
        let data = ConstructedData::decode(&mut r, 1).unwrap();
        assert_eq!(data.elements.len(), 2);
        match &data.elements[0] {
            Element::Constructed(inner) => assert_eq!(inner.tag_number(), 0),
            other => panic!("unexpected element {other:?}"),
        }
        assert!(data.elements[1].as_tag().is_some_and(Tag::is_closing));
        assert_eq!(data.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn wrong_closing_number_runs_into_eof() {
        let bytes = [0x3E, 0x21, 0x01, 0x2F];
        let mut r = Reader::new(&bytes);
        assert_eq!(
            ConstructedData::decode(&mut r, 3).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }

    #[test]
    fn optional_block_absent() {
        let bytes = [0x49, 0x08];
        let mut r = Reader::new(&bytes);
        assert_eq!(ConstructedData::decode_optional(&mut r, 3).unwrap(), None);
        assert_eq!(r.bit_position(), 0);
        assert_eq!(decode_elements(&mut r).unwrap().len(), 1);
    }

    #[test]
    fn runaway_nesting_is_an_error() {
        let bytes = vec![0x0E; 60_000];
        let mut r = Reader::new(&bytes);
        assert_eq!(
            decode_elements(&mut r).unwrap_err(),
            DecodeError::NestingTooDeep {
                limit: DEFAULT_MAX_NESTING
            }
        );
    }

    #[test]
    fn nesting_at_the_limit_decodes() {
        let mut bytes = vec![0x0E; 3];
        bytes.extend_from_slice(&[0x0F; 3]);
        let options = DecodeOptions::default().with_max_nesting(3);
        let mut r = Reader::with_options(&bytes, options);
        let elements = decode_elements(&mut r).unwrap();
        assert_eq!(r.nesting(), 0);
        assert_eq!(elements.to_bytes().unwrap(), bytes);

        let options = DecodeOptions::default().with_max_nesting(2);
        let mut r = Reader::with_options(&bytes, options);
        assert_eq!(
            decode_elements(&mut r).unwrap_err(),
            DecodeError::NestingTooDeep { limit: 2 }
        );
    }
}
