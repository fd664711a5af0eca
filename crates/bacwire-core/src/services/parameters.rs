use crate::encoding::constructed::{decode_elements, Element};
use crate::encoding::{encode::Encode, reader::Reader, tag::Tag, writer::Writer};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// The tagged parameters of a service, kept as the element list they were
/// decoded from.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceParameters {
    pub elements: Vec<Element>,
}

impl ServiceParameters {
    pub const fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Decodes elements until the (already bounded) reader is exhausted.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        decode_elements(r).map(Self::new)
    }

    /// Top-level primitive tags, skipping bracketed blocks.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.elements.iter().filter_map(Element::as_tag)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Encode for ServiceParameters {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.elements.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.elements.bit_len()
    }
}
