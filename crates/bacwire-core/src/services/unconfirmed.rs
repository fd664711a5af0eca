use crate::services::i_am::IAmRequest;
use crate::services::parameters::ServiceParameters;
use crate::services::time_synchronization::TimeSynchronizationRequest;
use crate::services::who_has::{IHaveRequest, WhoHasRequest};
use crate::services::who_is::WhoIsRequest;

service_table! {
    /// Service payload of an Unconfirmed-Request PDU.
    pub enum UnconfirmedServiceRequest in UnconfirmedService {
        0x00 => IAm(IAmRequest),
        0x01 => IHave(IHaveRequest),
        0x02 => UnconfirmedCovNotification(ServiceParameters),
        0x03 => UnconfirmedEventNotification(ServiceParameters),
        0x04 => UnconfirmedPrivateTransfer(ServiceParameters),
        0x05 => UnconfirmedTextMessage(ServiceParameters),
        0x06 => TimeSynchronization(TimeSynchronizationRequest),
        0x07 => WhoHas(WhoHasRequest),
        0x08 => WhoIs(WhoIsRequest),
        0x09 => UtcTimeSynchronization(TimeSynchronizationRequest),
        0x0A => WriteGroup(ServiceParameters),
        0x0B => UnconfirmedCovNotificationMultiple(ServiceParameters),
    }
}
