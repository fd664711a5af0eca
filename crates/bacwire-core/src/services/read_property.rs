use crate::encoding::{
    constructed::ConstructedData,
    encode::Encode,
    reader::Reader,
    tag::ContextTag,
    value::{AppTag, TagValue},
    writer::Writer,
};
use crate::types::{ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};

/// Object `[0]`, property `[1]` and optional array index `[2]`, shared by
/// the property access services.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyReference {
    pub object_identifier: ContextTag,
    pub property_identifier: ContextTag,
    pub property_array_index: Option<ContextTag>,
}

impl PropertyReference {
    pub fn new(object_id: ObjectId, property_id: PropertyId, array_index: Option<u32>) -> Self {
        Self {
            object_identifier: ContextTag::new(0, TagValue::ObjectIdentifier(object_id)),
            property_identifier: ContextTag::new(1, TagValue::Enumerated(property_id.to_u32())),
            property_array_index: array_index
                .map(|idx| ContextTag::new(2, TagValue::Unsigned(idx as u64))),
        }
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        self.object_identifier.data()?.as_object_id()
    }

    pub fn property_id(&self) -> Option<PropertyId> {
        self.property_identifier
            .data()?
            .as_enumerated()
            .map(PropertyId::from_u32)
    }

    pub fn array_index(&self) -> Option<u64> {
        self.property_array_index.as_ref()?.data()?.as_unsigned()
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            object_identifier: ContextTag::decode(r, 0, AppTag::ObjectId)?,
            property_identifier: ContextTag::decode(r, 1, AppTag::Enumerated)?,
            property_array_index: ContextTag::decode_optional(r, 2, AppTag::UnsignedInt)?,
        })
    }
}

impl Encode for PropertyReference {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.object_identifier.encode(w)?;
        self.property_identifier.encode(w)?;
        self.property_array_index.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.object_identifier.bit_len()
            + self.property_identifier.bit_len()
            + self.property_array_index.bit_len()
    }
}

/// Read-Property request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyRequest {
    pub reference: PropertyReference,
}

impl ReadPropertyRequest {
    pub fn new(object_id: ObjectId, property_id: PropertyId, array_index: Option<u32>) -> Self {
        Self {
            reference: PropertyReference::new(object_id, property_id, array_index),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        PropertyReference::decode(r).map(|reference| Self { reference })
    }
}

impl Encode for ReadPropertyRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.reference.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.reference.bit_len()
    }
}

/// Read-Property acknowledgement: the reference echoed back plus the value
/// bracketed in `[3]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyAck {
    pub reference: PropertyReference,
    pub property_value: ConstructedData,
}

impl ReadPropertyAck {
    pub fn new(
        object_id: ObjectId,
        property_id: PropertyId,
        array_index: Option<u32>,
        property_value: ConstructedData,
    ) -> Self {
        Self {
            reference: PropertyReference::new(object_id, property_id, array_index),
            property_value,
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let reference = PropertyReference::decode(r)?;
        let property_value = ConstructedData::decode(r, 3)?;
        Ok(Self {
            reference,
            property_value,
        })
    }
}

impl Encode for ReadPropertyAck {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.reference.encode(w)?;
        self.property_value.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.reference.bit_len() + self.property_value.bit_len()
    }
}
