/// BACnet Virtual Link Control framing (ASHRAE 135 Annex J).
pub mod bvlc;

pub use bvlc::{
    BroadcastDistributionEntry, Bvlc, BvlcFunction, BvlcResultCode, ForeignDeviceTableEntry,
    BACNET_IP_DEFAULT_PORT, BVLC_HEADER_LEN, BVLC_TYPE_BIP,
};
