use crate::encoding::{
    encode::Encode,
    reader::Reader,
    tag::ContextTag,
    value::{AppTag, TagValue},
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError};

/// Subscribe-COV request. With both optional fields absent it cancels the
/// subscription.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscribeCovRequest {
    pub subscriber_process_identifier: ContextTag,
    pub monitored_object_identifier: ContextTag,
    pub issue_confirmed_notifications: Option<ContextTag>,
    pub lifetime: Option<ContextTag>,
}

impl SubscribeCovRequest {
    pub fn subscribe(process_id: u32, object_id: ObjectId, confirmed: bool, lifetime: u32) -> Self {
        Self {
            issue_confirmed_notifications: Some(ContextTag::new(2, TagValue::Boolean(confirmed))),
            lifetime: Some(ContextTag::new(3, TagValue::Unsigned(lifetime as u64))),
            ..Self::cancel(process_id, object_id)
        }
    }

    pub fn cancel(process_id: u32, object_id: ObjectId) -> Self {
        Self {
            subscriber_process_identifier: ContextTag::new(0, TagValue::Unsigned(process_id as u64)),
            monitored_object_identifier: ContextTag::new(1, TagValue::ObjectIdentifier(object_id)),
            issue_confirmed_notifications: None,
            lifetime: None,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        self.issue_confirmed_notifications.is_none() && self.lifetime.is_none()
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            subscriber_process_identifier: ContextTag::decode(r, 0, AppTag::UnsignedInt)?,
            monitored_object_identifier: ContextTag::decode(r, 1, AppTag::ObjectId)?,
            issue_confirmed_notifications: ContextTag::decode_optional(r, 2, AppTag::Boolean)?,
            lifetime: ContextTag::decode_optional(r, 3, AppTag::UnsignedInt)?,
        })
    }
}

impl Encode for SubscribeCovRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.subscriber_process_identifier.encode(w)?;
        self.monitored_object_identifier.encode(w)?;
        self.issue_confirmed_notifications.encode(w)?;
        self.lifetime.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.subscriber_process_identifier.bit_len()
            + self.monitored_object_identifier.bit_len()
            + self.issue_confirmed_notifications.bit_len()
            + self.lifetime.bit_len()
    }
}
