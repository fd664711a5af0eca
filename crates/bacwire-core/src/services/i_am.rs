use crate::encoding::{
    encode::Encode,
    reader::Reader,
    tag::ApplicationTag,
    value::AppTag,
    writer::Writer,
};
use crate::types::{ObjectId, Segmentation};
use crate::{DecodeError, EncodeError};

/// I-Am: four application-tagged values describing a device.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IAmRequest {
    pub device_identifier: ApplicationTag,
    pub max_apdu_length_accepted: ApplicationTag,
    pub segmentation_supported: ApplicationTag,
    pub vendor_id: ApplicationTag,
}

impl IAmRequest {
    pub fn new(
        device_id: ObjectId,
        max_apdu: u32,
        segmentation: Segmentation,
        vendor_id: u16,
    ) -> Self {
        Self {
            device_identifier: ApplicationTag::object_id(device_id),
            max_apdu_length_accepted: ApplicationTag::unsigned(max_apdu as u64),
            segmentation_supported: ApplicationTag::enumerated(segmentation.to_u32()),
            vendor_id: ApplicationTag::unsigned(vendor_id as u64),
        }
    }

    pub fn device_id(&self) -> Option<ObjectId> {
        self.device_identifier.value.as_object_id()
    }

    pub fn max_apdu(&self) -> Option<u64> {
        self.max_apdu_length_accepted.value.as_unsigned()
    }

    pub fn segmentation(&self) -> Option<Segmentation> {
        self.segmentation_supported
            .value
            .as_enumerated()
            .and_then(Segmentation::from_u32)
    }

    pub fn vendor(&self) -> Option<u64> {
        self.vendor_id.value.as_unsigned()
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            device_identifier: ApplicationTag::decode_expecting(r, AppTag::ObjectId)?,
            max_apdu_length_accepted: ApplicationTag::decode_expecting(r, AppTag::UnsignedInt)?,
            segmentation_supported: ApplicationTag::decode_expecting(r, AppTag::Enumerated)?,
            vendor_id: ApplicationTag::decode_expecting(r, AppTag::UnsignedInt)?,
        })
    }
}

impl Encode for IAmRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.device_identifier.encode(w)?;
        self.max_apdu_length_accepted.encode(w)?;
        self.segmentation_supported.encode(w)?;
        self.vendor_id.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.device_identifier.bit_len()
            + self.max_apdu_length_accepted.bit_len()
            + self.segmentation_supported.bit_len()
            + self.vendor_id.bit_len()
    }
}
