/// Confirmed-service PDUs and the acknowledgement/error PDUs that answer them.
pub mod confirmed;
/// APDU type discriminant.
pub mod pdu;
/// Unconfirmed-Request PDU.
pub mod unconfirmed;

pub use confirmed::{
    AbortPdu, BacnetError, ComplexAck, ConfirmedRequest, RejectPdu, SegmentAck, SimpleAck,
};
pub use pdu::ApduType;
pub use unconfirmed::UnconfirmedRequest;

use crate::encoding::{encode::Encode, reader::Reader, writer::Writer};
use crate::error::Layer;
use crate::{DecodeError, EncodeError};

/// An application-layer PDU, selected by the high nibble of its first octet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Apdu {
    ConfirmedRequest(ConfirmedRequest),
    UnconfirmedRequest(UnconfirmedRequest),
    SimpleAck(SimpleAck),
    ComplexAck(ComplexAck),
    SegmentAck(SegmentAck),
    Error(BacnetError),
    Reject(RejectPdu),
    Abort(AbortPdu),
}

impl Apdu {
    pub const fn apdu_type(&self) -> ApduType {
        match self {
            Self::ConfirmedRequest(_) => ApduType::ConfirmedRequest,
            Self::UnconfirmedRequest(_) => ApduType::UnconfirmedRequest,
            Self::SimpleAck(_) => ApduType::SimpleAck,
            Self::ComplexAck(_) => ApduType::ComplexAck,
            Self::SegmentAck(_) => ApduType::SegmentAck,
            Self::Error(_) => ApduType::Error,
            Self::Reject(_) => ApduType::Reject,
            Self::Abort(_) => ApduType::Abort,
        }
    }

    /// Invoke id of every PDU that belongs to a confirmed transaction.
    pub const fn invoke_id(&self) -> Option<u8> {
        match self {
            Self::ConfirmedRequest(pdu) => Some(pdu.invoke_id),
            Self::UnconfirmedRequest(_) => None,
            Self::SimpleAck(pdu) => Some(pdu.invoke_id),
            Self::ComplexAck(pdu) => Some(pdu.invoke_id),
            Self::SegmentAck(pdu) => Some(pdu.invoke_id),
            Self::Error(pdu) => Some(pdu.invoke_id),
            Self::Reject(pdu) => Some(pdu.invoke_id),
            Self::Abort(pdu) => Some(pdu.invoke_id),
        }
    }

    /// Decodes an APDU occupying exactly `len` octets.
    pub fn decode(r: &mut Reader<'_>, len: usize) -> Result<Self, DecodeError> {
        let mut r = r.sub_reader(len)?;
        let type_nibble = r.read_bits(4)? as u8;
        let apdu_type = ApduType::from_u8(type_nibble).ok_or(DecodeError::UnknownVariant {
            layer: Layer::Apdu,
            value: type_nibble as u16,
        })?;
        let apdu = match apdu_type {
            ApduType::ConfirmedRequest => {
                Self::ConfirmedRequest(ConfirmedRequest::decode_after_type(&mut r)?)
            }
            ApduType::UnconfirmedRequest => {
                Self::UnconfirmedRequest(UnconfirmedRequest::decode_after_type(&mut r)?)
            }
            ApduType::SimpleAck => Self::SimpleAck(SimpleAck::decode_after_type(&mut r)?),
            ApduType::ComplexAck => Self::ComplexAck(ComplexAck::decode_after_type(&mut r)?),
            ApduType::SegmentAck => Self::SegmentAck(SegmentAck::decode_after_type(&mut r)?),
            ApduType::Error => Self::Error(BacnetError::decode_after_type(&mut r)?),
            ApduType::Reject => Self::Reject(RejectPdu::decode_after_type(&mut r)?),
            ApduType::Abort => Self::Abort(AbortPdu::decode_after_type(&mut r)?),
        };
        if !r.is_empty() {
            return Err(DecodeError::InvalidLength);
        }
        Ok(apdu)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut Reader::new(bytes), bytes.len())
    }
}

impl Encode for Apdu {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::ConfirmedRequest(pdu) => pdu.encode(w),
            Self::UnconfirmedRequest(pdu) => pdu.encode(w),
            Self::SimpleAck(pdu) => pdu.encode(w),
            Self::ComplexAck(pdu) => pdu.encode(w),
            Self::SegmentAck(pdu) => pdu.encode(w),
            Self::Error(pdu) => pdu.encode(w),
            Self::Reject(pdu) => pdu.encode(w),
            Self::Abort(pdu) => pdu.encode(w),
        }
    }

    fn bit_len(&self) -> usize {
        match self {
            Self::ConfirmedRequest(pdu) => pdu.bit_len(),
            Self::UnconfirmedRequest(pdu) => pdu.bit_len(),
            Self::SimpleAck(pdu) => pdu.bit_len(),
            Self::ComplexAck(pdu) => pdu.bit_len(),
            Self::SegmentAck(pdu) => pdu.bit_len(),
            Self::Error(pdu) => pdu.bit_len(),
            Self::Reject(pdu) => pdu.bit_len(),
            Self::Abort(pdu) => pdu.bit_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Apdu, ApduType};
    use crate::encoding::{encode::Encode, options::DecodeOptions, reader::Reader};
    use crate::error::Layer;
    use crate::services::{ServiceAck, UnconfirmedServiceRequest};
    use crate::DecodeError;

    #[test]
    fn every_pdu_type_decodes() {
        let frames: [&[u8]; 8] = [
            &[0x00, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D],
            &[0x10, 0x08],
            &[0x20, 0x01, 0x0F],
            &[
                0x30, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D, 0x3E, 0x74, 0x00,
                b'A', b'H', b'U', 0x3F,
            ],
            &[0x42, 0x01, 0x03, 0x04],
            &[0x50, 0x01, 0x0C, 0x91, 0x02, 0x91, 0x20],
            &[0x60, 0x01, 0x09],
            &[0x71, 0x01, 0x04],
        ];
        for (expected, bytes) in frames.iter().enumerate() {
            let apdu = Apdu::from_bytes(bytes).unwrap();
            assert_eq!(apdu.apdu_type() as usize, expected);
            assert_eq!(apdu.bit_len(), bytes.len() * 8);
            assert_eq!(apdu.to_bytes().unwrap(), *bytes);
        }
    }

    #[test]
    fn segmented_confirmed_request_carries_sequence_fields() {
        let bytes = [
            0x0A, 0x05, 0x01, 0x02, 0x04, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D,
        ];
        match Apdu::from_bytes(&bytes).unwrap() {
            Apdu::ConfirmedRequest(req) => {
                assert!(req.segmented_message);
                assert!(req.segmented_response_accepted);
                assert_eq!(req.sequence_number, Some(2));
                assert_eq!(req.proposed_window_size, Some(4));
            }
            other => panic!("unexpected apdu {other:?}"),
        }

        match Apdu::from_bytes(&[0x02, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D])
            .unwrap()
        {
            Apdu::ConfirmedRequest(req) => {
                assert_eq!(req.sequence_number, None);
                assert_eq!(req.proposed_window_size, None);
                assert_eq!(req.invoke_id, 1);
            }
            other => panic!("unexpected apdu {other:?}"),
        }
    }

    #[test]
    fn reserved_bits_in_complex_ack_are_advisory() {
        let _ = env_logger::builder().is_test(true).try_init();
        let bytes = [
            0x33, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D, 0x3E, 0x21, 0x05, 0x3F,
        ];
        match Apdu::from_bytes(&bytes).unwrap() {
            Apdu::ComplexAck(ack) => {
                assert!(!ack.segmented_message);
                assert_eq!(ack.invoke_id, 1);
                assert!(matches!(ack.service, ServiceAck::ReadProperty(_)));
            }
            other => panic!("unexpected apdu {other:?}"),
        }

        let mut strict = Reader::with_options(&bytes, DecodeOptions::strict());
        assert!(matches!(
            Apdu::decode(&mut strict, bytes.len()).unwrap_err(),
            DecodeError::ConstantFieldMismatch { .. }
        ));
    }

    #[test]
    fn deeply_nested_parameters_are_rejected() {
        let mut bytes = vec![0x10, 0x02];
        bytes.resize(60_002, 0x0E);
        assert!(matches!(
            Apdu::from_bytes(&bytes),
            Err(DecodeError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn strict_subscribe_cov_rejects_wide_boolean() {
        let bytes = [
            0x00, 0x05, 0x01, 0x05, 0x09, 0x12, 0x1C, 0x00, 0x00, 0x00, 0x0A, 0x29, 0x02, 0x39,
            0x00,
        ];
        let mut r = Reader::with_options(&bytes, DecodeOptions::strict());
        assert_eq!(
            Apdu::decode(&mut r, bytes.len()).unwrap_err(),
            DecodeError::InvalidValue
        );
    }

    #[test]
    fn unknown_pdu_type() {
        assert_eq!(
            Apdu::from_bytes(&[0x80, 0x00]).unwrap_err(),
            DecodeError::UnknownVariant {
                layer: Layer::Apdu,
                value: 8
            }
        );
    }

    #[test]
    fn trailing_octets_after_fixed_pdu() {
        assert_eq!(
            Apdu::from_bytes(&[0x20, 0x01, 0x0F, 0x00]).unwrap_err(),
            DecodeError::InvalidLength
        );
    }

    #[test]
    fn unconfirmed_who_is() {
        let apdu = Apdu::from_bytes(&[0x10, 0x08]).unwrap();
        assert_eq!(apdu.apdu_type(), ApduType::UnconfirmedRequest);
        assert_eq!(apdu.invoke_id(), None);
        match apdu {
            Apdu::UnconfirmedRequest(req) => assert!(matches!(
                req.service,
                UnconfirmedServiceRequest::WhoIs(_)
            )),
            other => panic!("unexpected apdu {other:?}"),
        }
    }
}
