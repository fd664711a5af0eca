use bacwire_core::encoding::{encode::Encode, reader::Reader, writer::Writer};
use bacwire_core::npdu::Npdu;
use bacwire_core::{DecodeError, EncodeError, Layer};
use std::net::{Ipv4Addr, SocketAddrV4};

/// BVLC type octet for BACnet/IP (Annex J).
pub const BVLC_TYPE_BIP: u8 = 0x81;
/// Type, function and length octets.
pub const BVLC_HEADER_LEN: usize = 4;
pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;

const BDT_ENTRY_LEN: usize = 10;
const FDT_ENTRY_LEN: usize = 10;
const IP_ADDRESS_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BvlcFunction {
    Result,
    WriteBroadcastDistributionTable,
    ReadBroadcastDistributionTable,
    ReadBroadcastDistributionTableAck,
    ForwardedNpdu,
    RegisterForeignDevice,
    ReadForeignDeviceTable,
    ReadForeignDeviceTableAck,
    DeleteForeignDeviceTableEntry,
    DistributeBroadcastToNetwork,
    OriginalUnicastNpdu,
    OriginalBroadcastNpdu,
    SecureBvll,
}

impl BvlcFunction {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Result),
            0x01 => Some(Self::WriteBroadcastDistributionTable),
            0x02 => Some(Self::ReadBroadcastDistributionTable),
            0x03 => Some(Self::ReadBroadcastDistributionTableAck),
            0x04 => Some(Self::ForwardedNpdu),
            0x05 => Some(Self::RegisterForeignDevice),
            0x06 => Some(Self::ReadForeignDeviceTable),
            0x07 => Some(Self::ReadForeignDeviceTableAck),
            0x08 => Some(Self::DeleteForeignDeviceTableEntry),
            0x09 => Some(Self::DistributeBroadcastToNetwork),
            0x0A => Some(Self::OriginalUnicastNpdu),
            0x0B => Some(Self::OriginalBroadcastNpdu),
            0x0C => Some(Self::SecureBvll),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Result => 0x00,
            Self::WriteBroadcastDistributionTable => 0x01,
            Self::ReadBroadcastDistributionTable => 0x02,
            Self::ReadBroadcastDistributionTableAck => 0x03,
            Self::ForwardedNpdu => 0x04,
            Self::RegisterForeignDevice => 0x05,
            Self::ReadForeignDeviceTable => 0x06,
            Self::ReadForeignDeviceTableAck => 0x07,
            Self::DeleteForeignDeviceTableEntry => 0x08,
            Self::DistributeBroadcastToNetwork => 0x09,
            Self::OriginalUnicastNpdu => 0x0A,
            Self::OriginalBroadcastNpdu => 0x0B,
            Self::SecureBvll => 0x0C,
        }
    }
}

/// Result codes carried by BVLC-Result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum BvlcResultCode {
    Successful = 0x0000,
    WriteBroadcastDistributionTableNak = 0x0010,
    ReadBroadcastDistributionTableNak = 0x0020,
    RegisterForeignDeviceNak = 0x0030,
    ReadForeignDeviceTableNak = 0x0040,
    DeleteForeignDeviceTableEntryNak = 0x0050,
    DistributeBroadcastToNetworkNak = 0x0060,
}

impl BvlcResultCode {
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0000 => Some(Self::Successful),
            0x0010 => Some(Self::WriteBroadcastDistributionTableNak),
            0x0020 => Some(Self::ReadBroadcastDistributionTableNak),
            0x0030 => Some(Self::RegisterForeignDeviceNak),
            0x0040 => Some(Self::ReadForeignDeviceTableNak),
            0x0050 => Some(Self::DeleteForeignDeviceTableEntryNak),
            0x0060 => Some(Self::DistributeBroadcastToNetworkNak),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BroadcastDistributionEntry {
    pub address: SocketAddrV4,
    pub mask: Ipv4Addr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignDeviceTableEntry {
    pub address: SocketAddrV4,
    pub ttl_seconds: u16,
    pub remaining_seconds: u16,
}

fn decode_ipv4(r: &mut Reader<'_>) -> Result<Ipv4Addr, DecodeError> {
    let octets = r.read_exact(4)?;
    Ok(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))
}

fn decode_address(r: &mut Reader<'_>) -> Result<SocketAddrV4, DecodeError> {
    let ip = decode_ipv4(r)?;
    Ok(SocketAddrV4::new(ip, r.read_be_u16()?))
}

fn encode_address(w: &mut Writer<'_>, address: &SocketAddrV4) -> Result<(), EncodeError> {
    w.write_all(&address.ip().octets())?;
    w.write_be_u16(address.port())
}

/// Decodes fixed-size table rows until the body is used up.
fn decode_table<T>(
    r: &mut Reader<'_>,
    entry_len: usize,
    decode_entry: impl Fn(&mut Reader<'_>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    if r.remaining() % entry_len != 0 {
        return Err(DecodeError::InvalidLength);
    }
    let mut out = Vec::with_capacity(r.remaining() / entry_len);
    while !r.is_empty() {
        out.push(decode_entry(r)?);
    }
    Ok(out)
}

fn decode_bdt_entry(r: &mut Reader<'_>) -> Result<BroadcastDistributionEntry, DecodeError> {
    Ok(BroadcastDistributionEntry {
        address: decode_address(r)?,
        mask: decode_ipv4(r)?,
    })
}

fn decode_fdt_entry(r: &mut Reader<'_>) -> Result<ForeignDeviceTableEntry, DecodeError> {
    Ok(ForeignDeviceTableEntry {
        address: decode_address(r)?,
        ttl_seconds: r.read_be_u16()?,
        remaining_seconds: r.read_be_u16()?,
    })
}

fn encode_bdt(w: &mut Writer<'_>, entries: &[BroadcastDistributionEntry]) -> Result<(), EncodeError> {
    for entry in entries {
        encode_address(w, &entry.address)?;
        w.write_all(&entry.mask.octets())?;
    }
    Ok(())
}

fn encode_fdt(w: &mut Writer<'_>, entries: &[ForeignDeviceTableEntry]) -> Result<(), EncodeError> {
    for entry in entries {
        encode_address(w, &entry.address)?;
        w.write_be_u16(entry.ttl_seconds)?;
        w.write_be_u16(entry.remaining_seconds)?;
    }
    Ok(())
}

/// A BACnet Virtual Link Control frame.
///
/// The function code and the length field are derived from the variant and
/// its contents. NPDU-carrying variants hand the NPDU whatever the length
/// field leaves after their own fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bvlc {
    Result { code: u16 },
    WriteBroadcastDistributionTable { entries: Vec<BroadcastDistributionEntry> },
    ReadBroadcastDistributionTable,
    ReadBroadcastDistributionTableAck { entries: Vec<BroadcastDistributionEntry> },
    ForwardedNpdu { origin: SocketAddrV4, npdu: Npdu },
    RegisterForeignDevice { ttl_seconds: u16 },
    ReadForeignDeviceTable,
    ReadForeignDeviceTableAck { entries: Vec<ForeignDeviceTableEntry> },
    DeleteForeignDeviceTableEntry { address: SocketAddrV4 },
    DistributeBroadcastToNetwork { npdu: Npdu },
    OriginalUnicastNpdu { npdu: Npdu },
    OriginalBroadcastNpdu { npdu: Npdu },
    /// BACnet/SC wrapper; the payload is kept opaque.
    SecureBvll { data: Vec<u8> },
}

impl Bvlc {
    pub const fn function(&self) -> BvlcFunction {
        match self {
            Self::Result { .. } => BvlcFunction::Result,
            Self::WriteBroadcastDistributionTable { .. } => {
                BvlcFunction::WriteBroadcastDistributionTable
            }
            Self::ReadBroadcastDistributionTable => BvlcFunction::ReadBroadcastDistributionTable,
            Self::ReadBroadcastDistributionTableAck { .. } => {
                BvlcFunction::ReadBroadcastDistributionTableAck
            }
            Self::ForwardedNpdu { .. } => BvlcFunction::ForwardedNpdu,
            Self::RegisterForeignDevice { .. } => BvlcFunction::RegisterForeignDevice,
            Self::ReadForeignDeviceTable => BvlcFunction::ReadForeignDeviceTable,
            Self::ReadForeignDeviceTableAck { .. } => BvlcFunction::ReadForeignDeviceTableAck,
            Self::DeleteForeignDeviceTableEntry { .. } => {
                BvlcFunction::DeleteForeignDeviceTableEntry
            }
            Self::DistributeBroadcastToNetwork { .. } => BvlcFunction::DistributeBroadcastToNetwork,
            Self::OriginalUnicastNpdu { .. } => BvlcFunction::OriginalUnicastNpdu,
            Self::OriginalBroadcastNpdu { .. } => BvlcFunction::OriginalBroadcastNpdu,
            Self::SecureBvll { .. } => BvlcFunction::SecureBvll,
        }
    }

    /// The carried NPDU, for the variants that have one.
    pub const fn npdu(&self) -> Option<&Npdu> {
        match self {
            Self::ForwardedNpdu { npdu, .. }
            | Self::DistributeBroadcastToNetwork { npdu }
            | Self::OriginalUnicastNpdu { npdu }
            | Self::OriginalBroadcastNpdu { npdu } => Some(npdu),
            _ => None,
        }
    }

    pub fn result_code(&self) -> Option<BvlcResultCode> {
        match self {
            Self::Result { code } => BvlcResultCode::from_u16(*code),
            _ => None,
        }
    }

    /// Value of the length field: header plus body.
    pub fn length(&self) -> usize {
        BVLC_HEADER_LEN + self.body_len()
    }

    fn body_len(&self) -> usize {
        match self {
            Self::Result { .. } | Self::RegisterForeignDevice { .. } => 2,
            Self::WriteBroadcastDistributionTable { entries }
            | Self::ReadBroadcastDistributionTableAck { entries } => entries.len() * BDT_ENTRY_LEN,
            Self::ReadBroadcastDistributionTable | Self::ReadForeignDeviceTable => 0,
            Self::ForwardedNpdu { npdu, .. } => IP_ADDRESS_LEN + npdu.byte_len(),
            Self::ReadForeignDeviceTableAck { entries } => entries.len() * FDT_ENTRY_LEN,
            Self::DeleteForeignDeviceTableEntry { .. } => IP_ADDRESS_LEN,
            Self::DistributeBroadcastToNetwork { npdu }
            | Self::OriginalUnicastNpdu { npdu }
            | Self::OriginalBroadcastNpdu { npdu } => npdu.byte_len(),
            Self::SecureBvll { data } => data.len(),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let bvlc_type = r.read_u8()?;
        r.check_constant("bvlc type", BVLC_TYPE_BIP as u32, bvlc_type as u32)?;
        let raw_function = r.read_u8()?;
        let length = r.read_be_u16()? as usize;
        if length < BVLC_HEADER_LEN {
            return Err(DecodeError::InvalidLength);
        }
        let function = BvlcFunction::from_u8(raw_function).ok_or(DecodeError::UnknownVariant {
            layer: Layer::Bvlc,
            value: raw_function as u16,
        })?;
        let mut body = r.sub_reader(length - BVLC_HEADER_LEN)?;
        let body = &mut body;

        let frame = match function {
            BvlcFunction::Result => {
                let code = body.read_be_u16()?;
                if code != BvlcResultCode::Successful as u16 {
                    log::debug!("BVLC-Result carries NAK 0x{code:04x}");
                }
                Self::Result { code }
            }
            BvlcFunction::WriteBroadcastDistributionTable => Self::WriteBroadcastDistributionTable {
                entries: decode_table(body, BDT_ENTRY_LEN, decode_bdt_entry)?,
            },
            BvlcFunction::ReadBroadcastDistributionTable => Self::ReadBroadcastDistributionTable,
            BvlcFunction::ReadBroadcastDistributionTableAck => {
                Self::ReadBroadcastDistributionTableAck {
                    entries: decode_table(body, BDT_ENTRY_LEN, decode_bdt_entry)?,
                }
            }
            BvlcFunction::ForwardedNpdu => {
                let origin = decode_address(body)?;
                let npdu = Npdu::decode(body, body.remaining())?;
                Self::ForwardedNpdu { origin, npdu }
            }
            BvlcFunction::RegisterForeignDevice => Self::RegisterForeignDevice {
                ttl_seconds: body.read_be_u16()?,
            },
            BvlcFunction::ReadForeignDeviceTable => Self::ReadForeignDeviceTable,
            BvlcFunction::ReadForeignDeviceTableAck => Self::ReadForeignDeviceTableAck {
                entries: decode_table(body, FDT_ENTRY_LEN, decode_fdt_entry)?,
            },
            BvlcFunction::DeleteForeignDeviceTableEntry => Self::DeleteForeignDeviceTableEntry {
                address: decode_address(body)?,
            },
            BvlcFunction::DistributeBroadcastToNetwork => Self::DistributeBroadcastToNetwork {
                npdu: Npdu::decode(body, body.remaining())?,
            },
            BvlcFunction::OriginalUnicastNpdu => Self::OriginalUnicastNpdu {
                npdu: Npdu::decode(body, body.remaining())?,
            },
            BvlcFunction::OriginalBroadcastNpdu => Self::OriginalBroadcastNpdu {
                npdu: Npdu::decode(body, body.remaining())?,
            },
            BvlcFunction::SecureBvll => Self::SecureBvll {
                data: body.read_exact(body.remaining())?.to_vec(),
            },
        };
        if !body.is_empty() {
            return Err(DecodeError::InvalidLength);
        }
        Ok(frame)
    }

    /// Decodes a datagram. Octets past the length field are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut Reader::new(bytes))
    }
}

impl Encode for Bvlc {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let length = u16::try_from(self.length()).map_err(|_| EncodeError::InvalidLength)?;
        w.write_u8(BVLC_TYPE_BIP)?;
        w.write_u8(self.function().to_u8())?;
        w.write_be_u16(length)?;
        match self {
            Self::Result { code } => w.write_be_u16(*code),
            Self::WriteBroadcastDistributionTable { entries }
            | Self::ReadBroadcastDistributionTableAck { entries } => encode_bdt(w, entries),
            Self::ReadBroadcastDistributionTable | Self::ReadForeignDeviceTable => Ok(()),
            Self::ForwardedNpdu { origin, npdu } => {
                encode_address(w, origin)?;
                npdu.encode(w)
            }
            Self::RegisterForeignDevice { ttl_seconds } => w.write_be_u16(*ttl_seconds),
            Self::ReadForeignDeviceTableAck { entries } => encode_fdt(w, entries),
            Self::DeleteForeignDeviceTableEntry { address } => encode_address(w, address),
            Self::DistributeBroadcastToNetwork { npdu }
            | Self::OriginalUnicastNpdu { npdu }
            | Self::OriginalBroadcastNpdu { npdu } => npdu.encode(w),
            Self::SecureBvll { data } => w.write_all(data),
        }
    }

    fn bit_len(&self) -> usize {
        self.length() * 8
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BroadcastDistributionEntry, Bvlc, BvlcFunction, BvlcResultCode, ForeignDeviceTableEntry,
        BACNET_IP_DEFAULT_PORT,
    };
    use bacwire_core::encoding::{encode::Encode, options::DecodeOptions, reader::Reader};
    use bacwire_core::{DecodeError, Layer};
    use proptest::prelude::*;
    use std::net::{Ipv4Addr, SocketAddrV4};

    #[test]
    fn function_codes_roundtrip() {
        for code in 0x00..=0x0Cu8 {
            let function = BvlcFunction::from_u8(code).unwrap();
            assert_eq!(function.to_u8(), code);
        }
        assert_eq!(BvlcFunction::from_u8(0x0D), None);
    }

    #[test]
    fn register_foreign_device() {
        let bytes = [0x81, 0x05, 0x00, 0x06, 0x00, 0x3C];
        let frame = Bvlc::from_bytes(&bytes).unwrap();
        assert_eq!(frame, Bvlc::RegisterForeignDevice { ttl_seconds: 60 });
        assert_eq!(frame.length(), 6);
        assert_eq!(frame.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn result_code() {
        let frame = Bvlc::from_bytes(&[0x81, 0x00, 0x00, 0x06, 0x00, 0x30]).unwrap();
        assert_eq!(
            frame.result_code(),
            Some(BvlcResultCode::RegisterForeignDeviceNak)
        );
        assert_eq!(frame.npdu(), None);
    }

    #[test]
    fn broadcast_distribution_table_ack() {
        let bytes = [
            0x81, 0x03, 0x00, 0x0E, 192, 168, 10, 20, 0xBA, 0xC0, 255, 255, 255, 0,
        ];
        let frame = Bvlc::from_bytes(&bytes).unwrap();
        assert_eq!(
            frame,
            Bvlc::ReadBroadcastDistributionTableAck {
                entries: vec![BroadcastDistributionEntry {
                    address: SocketAddrV4::new(Ipv4Addr::new(192, 168, 10, 20), 47808),
                    mask: Ipv4Addr::new(255, 255, 255, 0),
                }]
            }
        );
        assert_eq!(frame.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn foreign_device_table_ack() {
        let frame = Bvlc::ReadForeignDeviceTableAck {
            entries: vec![ForeignDeviceTableEntry {
                address: SocketAddrV4::new(Ipv4Addr::new(10, 1, 2, 3), BACNET_IP_DEFAULT_PORT),
                ttl_seconds: 60,
                remaining_seconds: 42,
            }],
        };
        let bytes = frame.to_bytes().unwrap();
        assert_eq!(
            bytes,
            [0x81, 0x07, 0x00, 0x0E, 10, 1, 2, 3, 0xBA, 0xC0, 0x00, 0x3C, 0x00, 0x2A]
        );
        assert_eq!(Bvlc::from_bytes(&bytes).unwrap(), frame);
    }

    #[test]
    fn partial_table_row_is_rejected() {
        assert_eq!(
            Bvlc::from_bytes(&[0x81, 0x03, 0x00, 0x07, 192, 168, 10]).unwrap_err(),
            DecodeError::InvalidLength
        );
    }

    #[test]
    fn length_shorter_than_header() {
        assert_eq!(
            Bvlc::from_bytes(&[0x81, 0x0A, 0x00, 0x03]).unwrap_err(),
            DecodeError::InvalidLength
        );
    }

    #[test]
    fn length_longer_than_datagram() {
        assert_eq!(
            Bvlc::from_bytes(&[0x81, 0x0A, 0x00, 0x0A, 0x01, 0x00, 0x10, 0x08]).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }

    #[test]
    fn unknown_function() {
        assert_eq!(
            Bvlc::from_bytes(&[0x81, 0x99, 0x00, 0x04]).unwrap_err(),
            DecodeError::UnknownVariant {
                layer: Layer::Bvlc,
                value: 0x99
            }
        );
    }

    #[test]
    fn foreign_bvlc_type_is_soft() {
        let bytes = [0x82, 0x06, 0x00, 0x04];
        assert_eq!(
            Bvlc::from_bytes(&bytes).unwrap(),
            Bvlc::ReadForeignDeviceTable
        );
        let mut strict = Reader::with_options(&bytes, DecodeOptions::strict());
        assert!(matches!(
            Bvlc::decode(&mut strict).unwrap_err(),
            DecodeError::ConstantFieldMismatch { .. }
        ));
    }

    #[test]
    fn secure_bvll_is_opaque() {
        let bytes = [0x81, 0x0C, 0x00, 0x07, 0x01, 0x02, 0x03];
        let frame = Bvlc::from_bytes(&bytes).unwrap();
        assert_eq!(frame, Bvlc::SecureBvll { data: vec![1, 2, 3] });
        assert_eq!(frame.to_bytes().unwrap(), bytes);
    }

    proptest! {
        #[test]
        fn broadcast_distribution_tables_reencode(
            rows in proptest::collection::vec((any::<u32>(), any::<u16>(), any::<u32>()), 0..8)
        ) {
            let entries = rows
                .into_iter()
                .map(|(ip, port, mask)| BroadcastDistributionEntry {
                    address: SocketAddrV4::new(Ipv4Addr::from(ip), port),
                    mask: Ipv4Addr::from(mask),
                })
                .collect::<Vec<_>>();
            let frame = Bvlc::WriteBroadcastDistributionTable { entries };
            let bytes = frame.to_bytes().unwrap();
            prop_assert_eq!(bytes.len(), frame.length());
            prop_assert_eq!(Bvlc::from_bytes(&bytes).unwrap(), frame);
        }
    }
}
