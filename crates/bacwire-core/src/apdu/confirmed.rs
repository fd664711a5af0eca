use crate::apdu::ApduType;
use crate::encoding::constructed::Element;
use crate::encoding::{encode::Encode, reader::Reader, tag::Tag, value::TagValue, writer::Writer};
use crate::services::{ConfirmedServiceRequest, ServiceAck, ServiceParameters};
use crate::types::{AbortReason, ErrorClass, ErrorCode, MaxApdu, MaxSegments, RejectReason};
use crate::{DecodeError, EncodeError};

fn check_segment_fields(
    segmented: bool,
    sequence_number: Option<u8>,
    proposed_window_size: Option<u8>,
) -> Result<(), EncodeError> {
    if sequence_number.is_some() == segmented && proposed_window_size.is_some() == segmented {
        Ok(())
    } else {
        Err(EncodeError::InvalidLength)
    }
}

fn decode_segment_fields(
    r: &mut Reader<'_>,
    segmented: bool,
) -> Result<(Option<u8>, Option<u8>), DecodeError> {
    if segmented {
        Ok((Some(r.read_u8()?), Some(r.read_u8()?)))
    } else {
        Ok((None, None))
    }
}

fn write_type(w: &mut Writer<'_>, apdu_type: ApduType) -> Result<(), EncodeError> {
    w.write_bits(apdu_type.to_u8() as u32, 4)
}

/// Confirmed-Request PDU.
///
/// `sequence_number` and `proposed_window_size` are present exactly when
/// `segmented_message` is set. The service is decoded from whatever the PDU
/// budget leaves after the header, segmented or not.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedRequest {
    pub segmented_message: bool,
    pub more_follows: bool,
    pub segmented_response_accepted: bool,
    pub max_segments_accepted: u8,
    pub max_apdu_length_accepted: u8,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service: ConfirmedServiceRequest,
}

impl ConfirmedRequest {
    /// An unsegmented request accepting segmented replies of up to 1476 octets.
    pub const fn new(invoke_id: u8, service: ConfirmedServiceRequest) -> Self {
        Self {
            segmented_message: false,
            more_follows: false,
            segmented_response_accepted: true,
            max_segments_accepted: 0,
            max_apdu_length_accepted: MaxApdu::UpTo1476 as u8,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service,
        }
    }

    pub fn max_apdu(&self) -> Option<MaxApdu> {
        MaxApdu::from_u8(self.max_apdu_length_accepted)
    }

    pub fn max_segments(&self) -> Option<MaxSegments> {
        MaxSegments::from_u8(self.max_segments_accepted)
    }

    pub fn decode_after_type(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let segmented_message = r.read_bit()?;
        let more_follows = r.read_bit()?;
        let segmented_response_accepted = r.read_bit()?;
        r.reserved("confirmed request reserved", 2, 0)?;
        let max_segments_accepted = r.read_bits(3)? as u8;
        let max_apdu_length_accepted = r.read_bits(4)? as u8;
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = decode_segment_fields(r, segmented_message)?;
        let service = ConfirmedServiceRequest::decode(r, r.remaining())?;
        Ok(Self {
            segmented_message,
            more_follows,
            segmented_response_accepted,
            max_segments_accepted,
            max_apdu_length_accepted,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service,
        })
    }
}

impl Encode for ConfirmedRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        check_segment_fields(
            self.segmented_message,
            self.sequence_number,
            self.proposed_window_size,
        )?;
        if self.max_segments_accepted > 0x07 || self.max_apdu_length_accepted > 0x0F {
            return Err(EncodeError::ValueOutOfRange);
        }
        write_type(w, ApduType::ConfirmedRequest)?;
        w.write_bit(self.segmented_message)?;
        w.write_bit(self.more_follows)?;
        w.write_bit(self.segmented_response_accepted)?;
        w.write_bits(0, 2)?;
        w.write_bits(self.max_segments_accepted as u32, 3)?;
        w.write_bits(self.max_apdu_length_accepted as u32, 4)?;
        w.write_u8(self.invoke_id)?;
        if let (Some(seq), Some(window)) = (self.sequence_number, self.proposed_window_size) {
            w.write_u8(seq)?;
            w.write_u8(window)?;
        }
        self.service.encode(w)
    }

    fn bit_len(&self) -> usize {
        24 + self.sequence_number.map_or(0, |_| 8)
            + self.proposed_window_size.map_or(0, |_| 8)
            + self.service.bit_len()
    }
}

/// Complex-ACK PDU carrying a service acknowledgement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexAck {
    pub segmented_message: bool,
    pub more_follows: bool,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service: ServiceAck,
}

impl ComplexAck {
    pub const fn new(invoke_id: u8, service: ServiceAck) -> Self {
        Self {
            segmented_message: false,
            more_follows: false,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service,
        }
    }

    pub fn decode_after_type(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let segmented_message = r.read_bit()?;
        let more_follows = r.read_bit()?;
        r.reserved("complex ack reserved", 2, 0)?;
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = decode_segment_fields(r, segmented_message)?;
        let service = ServiceAck::decode(r, r.remaining())?;
        Ok(Self {
            segmented_message,
            more_follows,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service,
        })
    }
}

impl Encode for ComplexAck {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        check_segment_fields(
            self.segmented_message,
            self.sequence_number,
            self.proposed_window_size,
        )?;
        write_type(w, ApduType::ComplexAck)?;
        w.write_bit(self.segmented_message)?;
        w.write_bit(self.more_follows)?;
        w.write_bits(0, 2)?;
        w.write_u8(self.invoke_id)?;
        if let (Some(seq), Some(window)) = (self.sequence_number, self.proposed_window_size) {
            w.write_u8(seq)?;
            w.write_u8(window)?;
        }
        self.service.encode(w)
    }

    fn bit_len(&self) -> usize {
        16 + self.sequence_number.map_or(0, |_| 8)
            + self.proposed_window_size.map_or(0, |_| 8)
            + self.service.bit_len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleAck {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl SimpleAck {
    pub fn decode_after_type(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.reserved("simple ack reserved", 4, 0)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

impl Encode for SimpleAck {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        write_type(w, ApduType::SimpleAck)?;
        w.write_bits(0, 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    fn bit_len(&self) -> usize {
        24
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentAck {
    pub negative_ack: bool,
    pub sent_by_server: bool,
    pub invoke_id: u8,
    pub sequence_number: u8,
    pub actual_window_size: u8,
}

impl SegmentAck {
    pub fn decode_after_type(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.reserved("segment ack reserved", 2, 0)?;
        Ok(Self {
            negative_ack: r.read_bit()?,
            sent_by_server: r.read_bit()?,
            invoke_id: r.read_u8()?,
            sequence_number: r.read_u8()?,
            actual_window_size: r.read_u8()?,
        })
    }
}

impl Encode for SegmentAck {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        write_type(w, ApduType::SegmentAck)?;
        w.write_bits(0, 2)?;
        w.write_bit(self.negative_ack)?;
        w.write_bit(self.sent_by_server)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.sequence_number)?;
        w.write_u8(self.actual_window_size)
    }

    fn bit_len(&self) -> usize {
        32
    }
}

/// Error PDU: the failed service choice plus its error parameters, usually an
/// error class and error code.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacnetError {
    pub invoke_id: u8,
    pub service_choice: u8,
    pub parameters: ServiceParameters,
}

impl BacnetError {
    pub fn decode_after_type(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.reserved("error reserved", 4, 0)?;
        let invoke_id = r.read_u8()?;
        let service_choice = r.read_u8()?;
        let parameters = ServiceParameters::decode(r)?;
        Ok(Self {
            invoke_id,
            service_choice,
            parameters,
        })
    }

    /// The first two enumerations, either bare or wrapped in opening tag `[0]`.
    fn class_and_code(&self) -> (Option<u32>, Option<u32>) {
        match self.parameters.elements.first() {
            Some(Element::Constructed(block)) if block.tag_number() == 0 => {
                first_two(block.tags().filter_map(enumerated_value))
            }
            _ => first_two(self.parameters.tags().filter_map(enumerated_value)),
        }
    }

    pub fn error_class(&self) -> Option<u32> {
        self.class_and_code().0
    }

    pub fn error_code(&self) -> Option<u32> {
        self.class_and_code().1
    }

    pub fn known_class(&self) -> Option<ErrorClass> {
        self.error_class().and_then(ErrorClass::from_u32)
    }

    pub fn known_code(&self) -> Option<ErrorCode> {
        self.error_code().and_then(ErrorCode::from_u32)
    }
}

fn first_two(mut values: impl Iterator<Item = u32>) -> (Option<u32>, Option<u32>) {
    (values.next(), values.next())
}

fn enumerated_value(tag: &Tag) -> Option<u32> {
    match tag.value()? {
        TagValue::Enumerated(v) => Some(*v),
        TagValue::Raw(bytes) if !bytes.is_empty() && bytes.len() <= 4 => {
            Some(bytes.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32))
        }
        _ => None,
    }
}

impl Encode for BacnetError {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        write_type(w, ApduType::Error)?;
        w.write_bits(0, 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)?;
        self.parameters.encode(w)
    }

    fn bit_len(&self) -> usize {
        24 + self.parameters.bit_len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectPdu {
    pub invoke_id: u8,
    pub reason: u8,
}

impl RejectPdu {
    pub fn known_reason(&self) -> Option<RejectReason> {
        RejectReason::from_u8(self.reason)
    }

    pub fn decode_after_type(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.reserved("reject reserved", 4, 0)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

impl Encode for RejectPdu {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        write_type(w, ApduType::Reject)?;
        w.write_bits(0, 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason)
    }

    fn bit_len(&self) -> usize {
        24
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbortPdu {
    pub server: bool,
    pub invoke_id: u8,
    pub reason: u8,
}

impl AbortPdu {
    pub fn known_reason(&self) -> Option<AbortReason> {
        AbortReason::from_u8(self.reason)
    }

    pub fn decode_after_type(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.reserved("abort reserved", 3, 0)?;
        Ok(Self {
            server: r.read_bit()?,
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

impl Encode for AbortPdu {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        write_type(w, ApduType::Abort)?;
        w.write_bits(0, 3)?;
        w.write_bit(self.server)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason)
    }

    fn bit_len(&self) -> usize {
        24
    }
}
