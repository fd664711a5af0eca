use crate::encoding::{
    encode::Encode,
    reader::Reader,
    tag::ContextTag,
    value::{AppTag, TagValue},
    writer::Writer,
};
use crate::{DecodeError, EncodeError};

/// Who-Is, optionally limited to a device instance range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhoIsRequest {
    pub low_limit: Option<ContextTag>,
    pub high_limit: Option<ContextTag>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self {
            low_limit: None,
            high_limit: None,
        }
    }

    pub fn range(low: u32, high: u32) -> Self {
        Self {
            low_limit: Some(ContextTag::new(0, TagValue::Unsigned(low as u64))),
            high_limit: Some(ContextTag::new(1, TagValue::Unsigned(high as u64))),
        }
    }

    /// The instance range, when both limits are present.
    pub fn limits(&self) -> Option<(u64, u64)> {
        let low = self.low_limit.as_ref()?.data()?.as_unsigned()?;
        let high = self.high_limit.as_ref()?.data()?.as_unsigned()?;
        Some((low, high))
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let low_limit = ContextTag::decode_optional(r, 0, AppTag::UnsignedInt)?;
        let high_limit = ContextTag::decode_optional(r, 1, AppTag::UnsignedInt)?;
        Ok(Self {
            low_limit,
            high_limit,
        })
    }
}

impl Encode for WhoIsRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.low_limit.encode(w)?;
        self.high_limit.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.low_limit.bit_len() + self.high_limit.bit_len()
    }
}
