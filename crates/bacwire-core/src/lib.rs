//! BACnet wire codec in pure Rust.
//!
//! `bacwire-core` decodes and encodes the BACnet network stack below the
//! data link: tag headers, application and context tags, constructed data,
//! service messages, APDUs, network layer messages and NPDUs. Every layer is
//! decoded against the length budget its parent hands down and reports the
//! exact number of bits it encodes to, so a decoded frame re-encodes to the
//! same bytes.
//!
//! # Feature flags
//!
//! - **`std`** (default): enables `std::error::Error` implementations.
//! - **`serde`**: derives `Serialize`/`Deserialize` on every frame type.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// APDU (Application Protocol Data Unit) types for confirmed/unconfirmed requests and responses.
pub mod apdu;
/// Bit-level reader/writer, tag headers, tags and constructed data.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// Network layer messages.
pub mod nlm;
/// NPDU (Network Protocol Data Unit) encoding and decoding.
pub mod npdu;
/// BACnet service request and response codecs.
pub mod services;
/// Core BACnet data types: object identifiers, property identifiers, dates and enumerations.
pub mod types;

pub use error::{DecodeError, EncodeError, Layer};
