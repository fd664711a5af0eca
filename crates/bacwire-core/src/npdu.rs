use crate::apdu::Apdu;
use crate::encoding::{encode::Encode, reader::Reader, writer::Writer};
use crate::nlm::Nlm;
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;

/// Hop count given to freshly routed frames.
pub const DEFAULT_HOP_COUNT: u8 = 0xFF;

/// A network number plus a MAC address of any length up to 255 octets.
///
/// An empty address on a destination means broadcast on that network.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteAddress {
    pub network: u16,
    pub address: Vec<u8>,
}

impl RouteAddress {
    pub fn new(network: u16, address: impl Into<Vec<u8>>) -> Self {
        Self {
            network,
            address: address.into(),
        }
    }

    /// Broadcast on `network`; `0xFFFF` is the global broadcast.
    pub fn broadcast(network: u16) -> Self {
        Self::new(network, Vec::new())
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let network = r.read_be_u16()?;
        let len = r.read_u8()? as usize;
        let address = r.read_exact(len)?.to_vec();
        Ok(Self { network, address })
    }
}

impl Encode for RouteAddress {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let len = u8::try_from(self.address.len()).map_err(|_| EncodeError::InvalidLength)?;
        w.write_be_u16(self.network)?;
        w.write_u8(len)?;
        w.write_all(&self.address)
    }

    fn bit_len(&self) -> usize {
        (3 + self.address.len()) * 8
    }
}

/// What follows the NPDU header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NpduPayload {
    Nlm(Nlm),
    Apdu(Apdu),
}

impl Encode for NpduPayload {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Nlm(nlm) => nlm.encode(w),
            Self::Apdu(apdu) => apdu.encode(w),
        }
    }

    fn bit_len(&self) -> usize {
        match self {
            Self::Nlm(nlm) => nlm.bit_len(),
            Self::Apdu(apdu) => apdu.bit_len(),
        }
    }
}

/// BACnet Network Protocol Data Unit.
///
/// The control flags for destination, source and network message are not
/// stored; they follow from `destination`, `source` and `payload`.
/// `hop_count` is present exactly when `destination` is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npdu {
    pub version: u8,
    pub expecting_reply: bool,
    /// Two-bit network priority, 0 (normal) to 3 (life safety).
    pub priority: u8,
    pub destination: Option<RouteAddress>,
    pub source: Option<RouteAddress>,
    pub hop_count: Option<u8>,
    pub payload: NpduPayload,
}

impl Npdu {
    /// A local, normal-priority frame carrying `apdu`.
    pub const fn new(apdu: Apdu) -> Self {
        Self::with_payload(NpduPayload::Apdu(apdu))
    }

    /// A local, normal-priority frame carrying a network layer message.
    pub const fn network_message(nlm: Nlm) -> Self {
        Self::with_payload(NpduPayload::Nlm(nlm))
    }

    const fn with_payload(payload: NpduPayload) -> Self {
        Self {
            version: NPDU_VERSION,
            expecting_reply: false,
            priority: 0,
            destination: None,
            source: None,
            hop_count: None,
            payload,
        }
    }

    /// Routes the frame to `destination` with the default hop count.
    pub fn routed_to(mut self, destination: RouteAddress) -> Self {
        self.destination = Some(destination);
        self.hop_count = Some(DEFAULT_HOP_COUNT);
        self
    }

    pub const fn has_nlm(&self) -> bool {
        matches!(self.payload, NpduPayload::Nlm(_))
    }

    pub const fn has_destination(&self) -> bool {
        self.destination.is_some()
    }

    pub const fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn apdu(&self) -> Option<&Apdu> {
        match &self.payload {
            NpduPayload::Apdu(apdu) => Some(apdu),
            NpduPayload::Nlm(_) => None,
        }
    }

    pub fn nlm(&self) -> Option<&Nlm> {
        match &self.payload {
            NpduPayload::Nlm(nlm) => Some(nlm),
            NpduPayload::Apdu(_) => None,
        }
    }

    /// Octets taken by everything before the payload.
    pub fn header_len(&self) -> usize {
        2 + self.destination.as_ref().map_or(0, |d| d.byte_len() + 1)
            + self.source.as_ref().map_or(0, Encode::byte_len)
    }

    /// Decodes an NPDU occupying exactly `len` octets; the payload gets what
    /// the header leaves.
    pub fn decode(r: &mut Reader<'_>, len: usize) -> Result<Self, DecodeError> {
        let mut r = r.sub_reader(len)?;
        let version = r.read_u8()?;
        r.check_constant("npdu version", NPDU_VERSION as u32, version as u32)?;
        let has_nlm = r.read_bit()?;
        r.reserved("npdu control bit 6", 1, 0)?;
        let has_destination = r.read_bit()?;
        r.reserved("npdu control bit 4", 1, 0)?;
        let has_source = r.read_bit()?;
        let expecting_reply = r.read_bit()?;
        let priority = r.read_bits(2)? as u8;

        let destination = if has_destination {
            Some(RouteAddress::decode(&mut r)?)
        } else {
            None
        };
        let source = if has_source {
            Some(RouteAddress::decode(&mut r)?)
        } else {
            None
        };
        let hop_count = if has_destination {
            Some(r.read_u8()?)
        } else {
            None
        };

        let payload_len = r.remaining();
        let payload = if has_nlm {
            NpduPayload::Nlm(Nlm::decode(&mut r, payload_len)?)
        } else {
            NpduPayload::Apdu(Apdu::decode(&mut r, payload_len)?)
        };

        Ok(Self {
            version,
            expecting_reply,
            priority,
            destination,
            source,
            hop_count,
            payload,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut Reader::new(bytes), bytes.len())
    }
}

impl Encode for Npdu {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.priority > 0x03 {
            return Err(EncodeError::ValueOutOfRange);
        }
        if self.hop_count.is_some() != self.destination.is_some() {
            return Err(EncodeError::InvalidLength);
        }
        w.write_u8(self.version)?;
        w.write_bit(self.has_nlm())?;
        w.write_bit(false)?;
        w.write_bit(self.has_destination())?;
        w.write_bit(false)?;
        w.write_bit(self.has_source())?;
        w.write_bit(self.expecting_reply)?;
        w.write_bits(self.priority as u32, 2)?;
        self.destination.encode(w)?;
        self.source.encode(w)?;
        self.hop_count.map_or(Ok(()), |hops| w.write_u8(hops))?;
        self.payload.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.header_len() * 8 + self.payload.bit_len()
    }
}
