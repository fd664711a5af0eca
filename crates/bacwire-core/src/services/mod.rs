/// Generates a closed service-choice enum with its dispatching decoder and
/// its encoder. Every payload type provides `decode(&mut Reader)` and
/// implements `Encode`.
macro_rules! service_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $layer:ident {
            $( $choice:literal => $variant:ident($ty:ty), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis enum $name {
            $( $variant($ty), )+
        }

        impl $name {
            /// The service choice octet selecting this variant.
            pub const fn service_choice(&self) -> u8 {
                match self {
                    $( Self::$variant(_) => $choice, )+
                }
            }

            /// Decodes the service choice and its parameters from exactly
            /// `len` octets.
            pub fn decode(
                r: &mut $crate::encoding::reader::Reader<'_>,
                len: usize,
            ) -> Result<Self, $crate::DecodeError> {
                let mut r = r.sub_reader(len)?;
                let choice = r.read_u8()?;
                let service = match choice {
                    $( $choice => Self::$variant(<$ty>::decode(&mut r)?), )+
                    other => {
                        return Err($crate::DecodeError::UnknownVariant {
                            layer: $crate::error::Layer::$layer,
                            value: other as u16,
                        })
                    }
                };
                if !r.is_empty() {
                    return Err($crate::DecodeError::InvalidLength);
                }
                Ok(service)
            }
        }

        impl $crate::encoding::encode::Encode for $name {
            fn encode(
                &self,
                w: &mut $crate::encoding::writer::Writer<'_>,
            ) -> Result<(), $crate::EncodeError> {
                w.write_u8(self.service_choice())?;
                match self {
                    $( Self::$variant(params) => $crate::encoding::encode::Encode::encode(params, w), )+
                }
            }

            fn bit_len(&self) -> usize {
                8 + match self {
                    $( Self::$variant(params) => $crate::encoding::encode::Encode::bit_len(params), )+
                }
            }
        }
    };
}

/// Complex-ACK service payloads.
pub mod ack;
/// Confirmed service requests.
pub mod confirmed;
pub mod i_am;
/// Generic tagged parameter lists for services without a typed record.
pub mod parameters;
pub mod read_property;
pub mod subscribe_cov;
pub mod time_synchronization;
/// Unconfirmed service requests.
pub mod unconfirmed;
pub mod who_has;
pub mod who_is;
pub mod write_property;

pub use ack::{ConfirmedServiceAck, ServiceAck};
pub use confirmed::ConfirmedServiceRequest;
pub use i_am::IAmRequest;
pub use parameters::ServiceParameters;
pub use read_property::{ReadPropertyAck, ReadPropertyRequest};
pub use subscribe_cov::SubscribeCovRequest;
pub use time_synchronization::TimeSynchronizationRequest;
pub use unconfirmed::UnconfirmedServiceRequest;
pub use who_has::{IHaveRequest, WhoHasObject, WhoHasRequest};
pub use who_is::WhoIsRequest;
pub use write_property::WritePropertyRequest;
