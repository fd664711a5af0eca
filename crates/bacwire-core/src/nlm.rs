use crate::encoding::{encode::Encode, reader::Reader, writer::Writer};
use crate::error::Layer;
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// First message type that carries a vendor id and proprietary payload.
pub const PROPRIETARY_MESSAGE_TYPE: u8 = 0x80;

/// One row of an Initialize-Routing-Table(-Ack) message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingTableEntry {
    pub network: u16,
    pub port_id: u8,
    pub port_info: Vec<u8>,
}

impl RoutingTableEntry {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let network = r.read_be_u16()?;
        let port_id = r.read_u8()?;
        let info_len = r.read_u8()? as usize;
        let port_info = r.read_exact(info_len)?.to_vec();
        Ok(Self {
            network,
            port_id,
            port_info,
        })
    }
}

impl Encode for RoutingTableEntry {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let info_len = u8::try_from(self.port_info.len()).map_err(|_| EncodeError::InvalidLength)?;
        w.write_be_u16(self.network)?;
        w.write_u8(self.port_id)?;
        w.write_u8(info_len)?;
        w.write_all(&self.port_info)
    }

    fn bit_len(&self) -> usize {
        (4 + self.port_info.len()) * 8
    }
}

/// Network layer message carried by an NPDU whose control octet flags one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nlm {
    WhoIsRouterToNetwork {
        network: Option<u16>,
    },
    IAmRouterToNetwork {
        networks: Vec<u16>,
    },
    ICouldBeRouterToNetwork {
        network: u16,
        performance_index: u8,
    },
    RejectRouterToNetwork {
        reason: u8,
        network: u16,
    },
    RouterBusyToNetwork {
        networks: Vec<u16>,
    },
    RouterAvailableToNetwork {
        networks: Vec<u16>,
    },
    InitializeRoutingTable {
        entries: Vec<RoutingTableEntry>,
    },
    InitializeRoutingTableAck {
        entries: Vec<RoutingTableEntry>,
    },
    EstablishConnectionToNetwork {
        network: u16,
        termination_time: u8,
    },
    DisconnectConnectionToNetwork {
        network: u16,
    },
    WhatIsNetworkNumber,
    NetworkNumberIs {
        network: u16,
        configured: bool,
    },
    /// Message types 0x80 and above.
    Proprietary {
        message_type: u8,
        vendor_id: u16,
        data: Vec<u8>,
    },
}

impl Nlm {
    pub const fn message_type(&self) -> u8 {
        match self {
            Self::WhoIsRouterToNetwork { .. } => 0x00,
            Self::IAmRouterToNetwork { .. } => 0x01,
            Self::ICouldBeRouterToNetwork { .. } => 0x02,
            Self::RejectRouterToNetwork { .. } => 0x03,
            Self::RouterBusyToNetwork { .. } => 0x04,
            Self::RouterAvailableToNetwork { .. } => 0x05,
            Self::InitializeRoutingTable { .. } => 0x06,
            Self::InitializeRoutingTableAck { .. } => 0x07,
            Self::EstablishConnectionToNetwork { .. } => 0x08,
            Self::DisconnectConnectionToNetwork { .. } => 0x09,
            Self::WhatIsNetworkNumber => 0x12,
            Self::NetworkNumberIs { .. } => 0x13,
            Self::Proprietary { message_type, .. } => *message_type,
        }
    }

    pub const fn vendor_id(&self) -> Option<u16> {
        match self {
            Self::Proprietary { vendor_id, .. } => Some(*vendor_id),
            _ => None,
        }
    }

    /// Decodes a message occupying exactly `len` octets.
    pub fn decode(r: &mut Reader<'_>, len: usize) -> Result<Self, DecodeError> {
        let mut r = r.sub_reader(len)?;
        let message_type = r.read_u8()?;
        let r = &mut r;
        let nlm = match message_type {
            0x00 => Self::WhoIsRouterToNetwork {
                network: if r.remaining() >= 2 {
                    Some(r.read_be_u16()?)
                } else {
                    None
                },
            },
            0x01 => Self::IAmRouterToNetwork {
                networks: decode_networks(r)?,
            },
            0x02 => Self::ICouldBeRouterToNetwork {
                network: r.read_be_u16()?,
                performance_index: r.read_u8()?,
            },
            0x03 => Self::RejectRouterToNetwork {
                reason: r.read_u8()?,
                network: r.read_be_u16()?,
            },
            0x04 => Self::RouterBusyToNetwork {
                networks: decode_networks(r)?,
            },
            0x05 => Self::RouterAvailableToNetwork {
                networks: decode_networks(r)?,
            },
            0x06 => Self::InitializeRoutingTable {
                entries: decode_routing_table(r)?,
            },
            0x07 => Self::InitializeRoutingTableAck {
                entries: decode_routing_table(r)?,
            },
            0x08 => Self::EstablishConnectionToNetwork {
                network: r.read_be_u16()?,
                termination_time: r.read_u8()?,
            },
            0x09 => Self::DisconnectConnectionToNetwork {
                network: r.read_be_u16()?,
            },
            0x12 => Self::WhatIsNetworkNumber,
            0x13 => {
                let network = r.read_be_u16()?;
                r.reserved("network number reserved", 7, 0)?;
                Self::NetworkNumberIs {
                    network,
                    configured: r.read_bit()?,
                }
            }
            PROPRIETARY_MESSAGE_TYPE..=0xFF => {
                let vendor_id = r.read_be_u16()?;
                let data = r.read_exact(r.remaining())?.to_vec();
                Self::Proprietary {
                    message_type,
                    vendor_id,
                    data,
                }
            }
            other => {
                return Err(DecodeError::UnknownVariant {
                    layer: Layer::Nlm,
                    value: other as u16,
                })
            }
        };
        if !r.is_empty() {
            return Err(DecodeError::InvalidLength);
        }
        Ok(nlm)
    }
}

fn decode_networks(r: &mut Reader<'_>) -> Result<Vec<u16>, DecodeError> {
    if r.remaining() % 2 != 0 {
        return Err(DecodeError::InvalidLength);
    }
    let mut networks = Vec::with_capacity(r.remaining() / 2);
    while !r.is_empty() {
        networks.push(r.read_be_u16()?);
    }
    Ok(networks)
}

fn decode_routing_table(r: &mut Reader<'_>) -> Result<Vec<RoutingTableEntry>, DecodeError> {
    let count = r.read_u8()?;
    (0..count).map(|_| RoutingTableEntry::decode(r)).collect()
}

fn encode_networks(w: &mut Writer<'_>, networks: &[u16]) -> Result<(), EncodeError> {
    networks.iter().try_for_each(|network| w.write_be_u16(*network))
}

fn encode_routing_table(w: &mut Writer<'_>, entries: &[RoutingTableEntry]) -> Result<(), EncodeError> {
    let count = u8::try_from(entries.len()).map_err(|_| EncodeError::InvalidLength)?;
    w.write_u8(count)?;
    entries.encode(w)
}

impl Encode for Nlm {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let message_type = self.message_type();
        if matches!(self, Self::Proprietary { .. }) != (message_type >= PROPRIETARY_MESSAGE_TYPE) {
            return Err(EncodeError::ValueOutOfRange);
        }
        w.write_u8(message_type)?;
        match self {
            Self::WhoIsRouterToNetwork { network } => match network {
                Some(network) => w.write_be_u16(*network),
                None => Ok(()),
            },
            Self::IAmRouterToNetwork { networks }
            | Self::RouterBusyToNetwork { networks }
            | Self::RouterAvailableToNetwork { networks } => encode_networks(w, networks),
            Self::ICouldBeRouterToNetwork {
                network,
                performance_index,
            } => {
                w.write_be_u16(*network)?;
                w.write_u8(*performance_index)
            }
            Self::RejectRouterToNetwork { reason, network } => {
                w.write_u8(*reason)?;
                w.write_be_u16(*network)
            }
            Self::InitializeRoutingTable { entries }
            | Self::InitializeRoutingTableAck { entries } => encode_routing_table(w, entries),
            Self::EstablishConnectionToNetwork {
                network,
                termination_time,
            } => {
                w.write_be_u16(*network)?;
                w.write_u8(*termination_time)
            }
            Self::DisconnectConnectionToNetwork { network } => w.write_be_u16(*network),
            Self::WhatIsNetworkNumber => Ok(()),
            Self::NetworkNumberIs {
                network,
                configured,
            } => {
                w.write_be_u16(*network)?;
                w.write_bits(0, 7)?;
                w.write_bit(*configured)
            }
            Self::Proprietary {
                vendor_id, data, ..
            } => {
                w.write_be_u16(*vendor_id)?;
                w.write_all(data)
            }
        }
    }

    fn bit_len(&self) -> usize {
        let body = match self {
            Self::WhoIsRouterToNetwork { network } => network.map_or(0, |_| 2) * 8,
            Self::IAmRouterToNetwork { networks }
            | Self::RouterBusyToNetwork { networks }
            | Self::RouterAvailableToNetwork { networks } => networks.len() * 16,
            Self::ICouldBeRouterToNetwork { .. }
            | Self::RejectRouterToNetwork { .. }
            | Self::EstablishConnectionToNetwork { .. }
            | Self::NetworkNumberIs { .. } => 24,
            Self::InitializeRoutingTable { entries }
            | Self::InitializeRoutingTableAck { entries } => 8 + entries.bit_len(),
            Self::DisconnectConnectionToNetwork { .. } => 16,
            Self::WhatIsNetworkNumber => 0,
            Self::Proprietary { data, .. } => 16 + data.len() * 8,
        };
        8 + body
    }
}

#[cfg(test)]
mod tests {
    use super::{Nlm, RoutingTableEntry};
    use crate::encoding::{encode::Encode, options::DecodeOptions, reader::Reader};
    use crate::error::Layer;
    use crate::DecodeError;

    fn decode(bytes: &[u8]) -> Result<Nlm, DecodeError> {
        Nlm::decode(&mut Reader::new(bytes), bytes.len())
    }

    #[test]
    fn who_is_router_network_is_optional() {
        assert_eq!(
            decode(&[0x00]).unwrap(),
            Nlm::WhoIsRouterToNetwork { network: None }
        );
        let bytes = [0x00, 0x00, 0x05];
        let nlm = decode(&bytes).unwrap();
        assert_eq!(nlm, Nlm::WhoIsRouterToNetwork { network: Some(5) });
        assert_eq!(nlm.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn network_list_fills_budget() {
        let bytes = [0x01, 0x00, 0x01, 0x00, 0x02, 0xFF, 0xFE];
        let nlm = decode(&bytes).unwrap();
        assert_eq!(
            nlm,
            Nlm::IAmRouterToNetwork {
                networks: vec![1, 2, 0xFFFE]
            }
        );
        assert_eq!(nlm.bit_len(), bytes.len() * 8);
        assert_eq!(decode(&[0x04, 0x00]).unwrap_err(), DecodeError::InvalidLength);
    }

    #[test]
    fn routing_table_ack() {
        let bytes = [0x07, 0x02, 0x00, 0x0A, 0x01, 0x00, 0x00, 0x0B, 0x02, 0x02, 0xAB, 0xCD];
        let nlm = decode(&bytes).unwrap();
        match &nlm {
            Nlm::InitializeRoutingTableAck { entries } => {
                assert_eq!(entries.len(), 2);
                assert_eq!(
                    entries[1],
                    RoutingTableEntry {
                        network: 11,
                        port_id: 2,
                        port_info: vec![0xAB, 0xCD],
                    }
                );
            }
            other => panic!("unexpected message {other:?}"),
        }
        assert_eq!(nlm.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn network_number_is_reserved_bits() {
        let bytes = [0x13, 0x00, 0x2A, 0x01];
        assert_eq!(
            decode(&bytes).unwrap(),
            Nlm::NetworkNumberIs {
                network: 42,
                configured: true
            }
        );

        let noisy = [0x13, 0x00, 0x2A, 0x81];
        assert!(decode(&noisy).is_ok());
        let mut strict = Reader::with_options(&noisy, DecodeOptions::strict());
        assert!(matches!(
            Nlm::decode(&mut strict, noisy.len()).unwrap_err(),
            DecodeError::ConstantFieldMismatch { .. }
        ));
    }

    #[test]
    fn proprietary_carries_vendor_id() {
        let bytes = [0x80, 0x01, 0x04, 0xDE, 0xAD];
        let nlm = decode(&bytes).unwrap();
        assert_eq!(nlm.message_type(), 0x80);
        assert_eq!(nlm.vendor_id(), Some(260));
        assert_eq!(nlm.to_bytes().unwrap(), bytes);

        let standard = Nlm::DisconnectConnectionToNetwork { network: 7 };
        assert_eq!(standard.vendor_id(), None);
        assert_eq!(standard.to_bytes().unwrap(), [0x09, 0x00, 0x07]);
    }

    #[test]
    fn unassigned_message_types_are_unknown() {
        for message_type in 0x0A..=0x11u8 {
            assert_eq!(
                decode(&[message_type]).unwrap_err(),
                DecodeError::UnknownVariant {
                    layer: Layer::Nlm,
                    value: message_type as u16
                }
            );
        }
    }

    #[test]
    fn fixed_message_rejects_trailing_octets() {
        assert_eq!(
            decode(&[0x09, 0x00, 0x07, 0x00]).unwrap_err(),
            DecodeError::InvalidLength
        );
    }
}
