use crate::encoding::{
    constructed::ConstructedData,
    encode::Encode,
    reader::Reader,
    tag::{ContextTag, Tag},
    value::{AppTag, TagValue},
    writer::Writer,
};
use crate::services::read_property::PropertyReference;
use crate::types::{ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};

/// Write-Property request: reference, value `[3]` and optional priority `[4]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WritePropertyRequest {
    pub reference: PropertyReference,
    pub property_value: ConstructedData,
    pub priority: Option<ContextTag>,
}

impl WritePropertyRequest {
    pub fn new(
        object_id: ObjectId,
        property_id: PropertyId,
        array_index: Option<u32>,
        value: Tag,
        priority: Option<u8>,
    ) -> Self {
        Self {
            reference: PropertyReference::new(object_id, property_id, array_index),
            property_value: ConstructedData::with_tags(3, [value]),
            priority: priority.map(|p| ContextTag::new(4, TagValue::Unsigned(p as u64))),
        }
    }

    pub fn priority(&self) -> Option<u64> {
        self.priority.as_ref()?.data()?.as_unsigned()
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let reference = PropertyReference::decode(r)?;
        let property_value = ConstructedData::decode(r, 3)?;
        let priority = ContextTag::decode_optional(r, 4, AppTag::UnsignedInt)?;
        Ok(Self {
            reference,
            property_value,
            priority,
        })
    }
}

impl Encode for WritePropertyRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.reference.encode(w)?;
        self.property_value.encode(w)?;
        self.priority.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.reference.bit_len() + self.property_value.bit_len() + self.priority.bit_len()
    }
}
