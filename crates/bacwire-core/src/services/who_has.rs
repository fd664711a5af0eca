use crate::encoding::{
    encode::Encode,
    reader::Reader,
    tag::{ApplicationTag, ContextTag},
    value::{AppTag, TagValue},
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError};

/// The object a Who-Has asks about, by identifier `[2]` or by name `[3]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WhoHasObject {
    Identifier(ContextTag),
    Name(ContextTag),
}

impl Encode for WhoHasObject {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Identifier(tag) | Self::Name(tag) => tag.encode(w),
        }
    }

    fn bit_len(&self) -> usize {
        match self {
            Self::Identifier(tag) | Self::Name(tag) => tag.bit_len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhoHasRequest {
    pub low_limit: Option<ContextTag>,
    pub high_limit: Option<ContextTag>,
    pub object: WhoHasObject,
}

impl WhoHasRequest {
    pub fn by_id(object_id: ObjectId) -> Self {
        Self {
            low_limit: None,
            high_limit: None,
            object: WhoHasObject::Identifier(ContextTag::new(
                2,
                TagValue::ObjectIdentifier(object_id),
            )),
        }
    }

    pub fn by_name(name: &str) -> Self {
        Self {
            low_limit: None,
            high_limit: None,
            object: WhoHasObject::Name(ContextTag::new(3, TagValue::character_string(name))),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let low_limit = ContextTag::decode_optional(r, 0, AppTag::UnsignedInt)?;
        let high_limit = ContextTag::decode_optional(r, 1, AppTag::UnsignedInt)?;
        let object = match ContextTag::decode_optional(r, 2, AppTag::ObjectId)? {
            Some(tag) => WhoHasObject::Identifier(tag),
            None => WhoHasObject::Name(ContextTag::decode(r, 3, AppTag::CharacterString)?),
        };
        Ok(Self {
            low_limit,
            high_limit,
            object,
        })
    }
}

impl Encode for WhoHasRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.low_limit.encode(w)?;
        self.high_limit.encode(w)?;
        self.object.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.low_limit.bit_len() + self.high_limit.bit_len() + self.object.bit_len()
    }
}

/// I-Have: the answer to a Who-Has.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IHaveRequest {
    pub device_identifier: ApplicationTag,
    pub object_identifier: ApplicationTag,
    pub object_name: ApplicationTag,
}

impl IHaveRequest {
    pub fn new(device_id: ObjectId, object_id: ObjectId, object_name: &str) -> Self {
        Self {
            device_identifier: ApplicationTag::object_id(device_id),
            object_identifier: ApplicationTag::object_id(object_id),
            object_name: ApplicationTag::character_string(object_name),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            device_identifier: ApplicationTag::decode_expecting(r, AppTag::ObjectId)?,
            object_identifier: ApplicationTag::decode_expecting(r, AppTag::ObjectId)?,
            object_name: ApplicationTag::decode_expecting(r, AppTag::CharacterString)?,
        })
    }
}

impl Encode for IHaveRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.device_identifier.encode(w)?;
        self.object_identifier.encode(w)?;
        self.object_name.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.device_identifier.bit_len()
            + self.object_identifier.bit_len()
            + self.object_name.bit_len()
    }
}

#[cfg(test)]
mod tests {
    use super::{IHaveRequest, WhoHasObject, WhoHasRequest};
    use crate::encoding::{encode::Encode, reader::Reader};
    use crate::types::{ObjectId, ObjectType};

    #[test]
    fn who_has_by_name() {
        let req = WhoHasRequest::by_name("OAT");
        let bytes = req.to_bytes().unwrap();
        assert_eq!(bytes, [0x3C, 0x00, b'O', b'A', b'T']);
        let mut r = Reader::new(&bytes);
        let decoded = WhoHasRequest::decode(&mut r).unwrap();
        assert!(matches!(decoded.object, WhoHasObject::Name(_)));
        assert_eq!(decoded, req);
    }

    #[test]
    fn who_has_by_id_with_range() {
        let bytes = [0x09, 0x01, 0x19, 0x0A, 0x2C, 0x00, 0x00, 0x00, 0x03];
        let mut r = Reader::new(&bytes);
        let req = WhoHasRequest::decode(&mut r).unwrap();
        assert!(req.low_limit.is_some() && req.high_limit.is_some());
        match &req.object {
            WhoHasObject::Identifier(tag) => assert_eq!(
                tag.data().and_then(|v| v.as_object_id()),
                Some(ObjectId::new(ObjectType::AnalogInput, 3))
            ),
            other => panic!("unexpected object {other:?}"),
        }
        assert_eq!(req.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn i_have_roundtrip() {
        let req = IHaveRequest::new(
            ObjectId::new(ObjectType::Device, 5),
            ObjectId::new(ObjectType::AnalogInput, 3),
            "OAT",
        );
        let bytes = req.to_bytes().unwrap();
        let mut r = Reader::new(&bytes);
        assert_eq!(IHaveRequest::decode(&mut r).unwrap(), req);
        assert!(r.is_empty());
    }
}
