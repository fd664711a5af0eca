use crate::apdu::ApduType;
use crate::encoding::{encode::Encode, reader::Reader, writer::Writer};
use crate::services::UnconfirmedServiceRequest;
use crate::{DecodeError, EncodeError};

/// Unconfirmed-Request PDU.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnconfirmedRequest {
    pub service: UnconfirmedServiceRequest,
}

impl UnconfirmedRequest {
    pub const fn new(service: UnconfirmedServiceRequest) -> Self {
        Self { service }
    }

    /// Decodes the rest of the PDU once the type nibble has been read; the
    /// service gets everything left in `r`.
    pub fn decode_after_type(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.reserved("unconfirmed request reserved", 4, 0)?;
        let service = UnconfirmedServiceRequest::decode(r, r.remaining())?;
        Ok(Self { service })
    }
}

impl Encode for UnconfirmedRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_bits(ApduType::UnconfirmedRequest.to_u8() as u32, 4)?;
        w.write_bits(0, 4)?;
        self.service.encode(w)
    }

    fn bit_len(&self) -> usize {
        8 + self.service.bit_len()
    }
}
