use crate::services::parameters::ServiceParameters;
use crate::services::read_property::ReadPropertyRequest;
use crate::services::subscribe_cov::SubscribeCovRequest;
use crate::services::write_property::WritePropertyRequest;

service_table! {
    /// Service payload of a Confirmed-Request PDU, selected by its service
    /// choice octet.
    pub enum ConfirmedServiceRequest in ConfirmedService {
        0x00 => AcknowledgeAlarm(ServiceParameters),
        0x01 => ConfirmedCovNotification(ServiceParameters),
        0x02 => ConfirmedEventNotification(ServiceParameters),
        0x03 => GetAlarmSummary(ServiceParameters),
        0x04 => GetEnrollmentSummary(ServiceParameters),
        0x05 => SubscribeCov(SubscribeCovRequest),
        0x06 => AtomicReadFile(ServiceParameters),
        0x07 => AtomicWriteFile(ServiceParameters),
        0x08 => AddListElement(ServiceParameters),
        0x09 => RemoveListElement(ServiceParameters),
        0x0A => CreateObject(ServiceParameters),
        0x0B => DeleteObject(ServiceParameters),
        0x0C => ReadProperty(ReadPropertyRequest),
        0x0D => ReadPropertyConditional(ServiceParameters),
        0x0E => ReadPropertyMultiple(ServiceParameters),
        0x0F => WriteProperty(WritePropertyRequest),
        0x10 => WritePropertyMultiple(ServiceParameters),
        0x11 => DeviceCommunicationControl(ServiceParameters),
        0x12 => ConfirmedPrivateTransfer(ServiceParameters),
        0x13 => ConfirmedTextMessage(ServiceParameters),
        0x14 => ReinitializeDevice(ServiceParameters),
        0x15 => VtOpen(ServiceParameters),
        0x16 => VtClose(ServiceParameters),
        0x17 => VtData(ServiceParameters),
        0x18 => Authenticate(ServiceParameters),
        0x19 => RequestKey(ServiceParameters),
        0x1A => ReadRange(ServiceParameters),
        0x1B => LifeSafetyOperation(ServiceParameters),
        0x1C => SubscribeCovProperty(ServiceParameters),
        0x1D => GetEventInformation(ServiceParameters),
        0x1E => SubscribeCovPropertyMultiple(ServiceParameters),
        0x1F => ConfirmedCovNotificationMultiple(ServiceParameters),
    }
}

#[cfg(test)]
mod tests {
    use super::ConfirmedServiceRequest;
    use crate::encoding::{encode::Encode, reader::Reader};
    use crate::error::Layer;
    use crate::DecodeError;

    #[test]
    fn dispatches_read_property() {
        let bytes = [0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D];
        let mut r = Reader::new(&bytes);
        let service = ConfirmedServiceRequest::decode(&mut r, bytes.len()).unwrap();
        assert!(matches!(service, ConfirmedServiceRequest::ReadProperty(_)));
        assert_eq!(service.service_choice(), 0x0C);
        assert_eq!(service.bit_len(), 64);
        assert_eq!(service.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn untyped_services_keep_their_parameters() {
        // Reinitialize-Device: warmstart, no password.
        let bytes = [0x14, 0x09, 0x01];
        let mut r = Reader::new(&bytes);
        let service = ConfirmedServiceRequest::decode(&mut r, 3).unwrap();
        match &service {
            ConfirmedServiceRequest::ReinitializeDevice(params) => {
                assert_eq!(params.elements.len(), 1)
            }
            other => panic!("unexpected service {other:?}"),
        }
        assert_eq!(service.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn every_choice_in_table_dispatches() {
        for choice in 0x00u8..=0x1F {
            let bytes = [choice];
            let mut r = Reader::new(&bytes);
            match ConfirmedServiceRequest::decode(&mut r, 1) {
                Ok(service) => assert_eq!(service.service_choice(), choice),
                Err(err) => assert!(
                    !matches!(err, DecodeError::UnknownVariant { .. }),
                    "choice 0x{choice:02x} failed with {err:?}"
                ),
            }
        }
    }

    #[test]
    fn unknown_choice_is_fatal() {
        let mut r = Reader::new(&[0x20]);
        assert_eq!(
            ConfirmedServiceRequest::decode(&mut r, 1).unwrap_err(),
            DecodeError::UnknownVariant {
                layer: Layer::ConfirmedService,
                value: 0x20
            }
        );
    }

    #[test]
    fn leftover_octets_in_budget_are_rejected() {
        let bytes = [0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D, 0x00];
        let mut r = Reader::new(&bytes);
        assert_eq!(
            ConfirmedServiceRequest::decode(&mut r, bytes.len()).unwrap_err(),
            DecodeError::InvalidLength
        );
    }
}
