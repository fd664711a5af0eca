use crate::services::parameters::ServiceParameters;
use crate::services::read_property::ReadPropertyAck;

service_table! {
    /// Service payload of a Complex-ACK PDU. Only services that answer with
    /// data appear here.
    pub enum ServiceAck in ServiceAck {
        0x03 => GetAlarmSummary(ServiceParameters),
        0x04 => GetEnrollmentSummary(ServiceParameters),
        0x06 => AtomicReadFile(ServiceParameters),
        0x07 => AtomicWriteFile(ServiceParameters),
        0x0A => CreateObject(ServiceParameters),
        0x0C => ReadProperty(ReadPropertyAck),
        0x0D => ReadPropertyConditional(ServiceParameters),
        0x0E => ReadPropertyMultiple(ServiceParameters),
        0x12 => ConfirmedPrivateTransfer(ServiceParameters),
        0x15 => VtOpen(ServiceParameters),
        0x17 => VtData(ServiceParameters),
        0x18 => Authenticate(ServiceParameters),
        0x1A => ReadRange(ServiceParameters),
        0x1D => GetEventInformation(ServiceParameters),
    }
}

/// The acknowledgement table under its confirmed-service name.
pub type ConfirmedServiceAck = ServiceAck;

#[cfg(test)]
mod tests {
    use super::ServiceAck;
    use crate::encoding::{encode::Encode, reader::Reader};
    use crate::error::Layer;
    use crate::DecodeError;

    #[test]
    fn read_property_ack() {
        let bytes = [
            0x0C, 0x0C, 0x00, 0x00, 0x00, 0x01, 0x19, 0x55, 0x3E, 0x44, 0x42, 0x91, 0x00, 0x00,
            0x3F,
        ];
        let mut r = Reader::new(&bytes);
        let ack = ServiceAck::decode(&mut r, bytes.len()).unwrap();
        assert!(matches!(ack, ServiceAck::ReadProperty(_)));
        assert_eq!(ack.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn choices_without_ack_are_unknown() {
        for choice in [0x00u8, 0x05, 0x0F, 0x14] {
            let buf = [choice];
            let mut r = Reader::new(&buf);
            assert_eq!(
                ServiceAck::decode(&mut r, 1).unwrap_err(),
                DecodeError::UnknownVariant {
                    layer: Layer::ServiceAck,
                    value: choice as u16
                }
            );
        }
    }
}
