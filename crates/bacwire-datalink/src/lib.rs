//! BACnet/IP virtual link layer framing for bacwire.
//!
//! Decodes a UDP datagram into a [`Bvlc`] frame whose NPDU, if it carries
//! one, is decoded by `bacwire-core` against the budget the BVLC length field
//! leaves. Sockets and BBMD state are left to the caller.

pub mod bip;

pub use bip::{
    BroadcastDistributionEntry, Bvlc, BvlcFunction, BvlcResultCode, ForeignDeviceTableEntry,
};
