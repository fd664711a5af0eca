use bacwire_core::apdu::{Apdu, UnconfirmedRequest};
use bacwire_core::encoding::{encode::Encode, options::DecodeOptions, reader::Reader};
use bacwire_core::npdu::{Npdu, RouteAddress};
use bacwire_core::services::{UnconfirmedServiceRequest, WhoIsRequest};
use bacwire_core::{DecodeError, EncodeError};
use bacwire_datalink::Bvlc;
use clap::ValueEnum;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("invalid hex token '{0}'")]
    Hex(String),
    #[error("hex input has an odd number of digits")]
    OddHexDigits,
    #[error("re-encoded frame differs from the input ({encoded} vs {input} octets)")]
    RoundTrip { encoded: usize, input: usize },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Layer at which the decoder starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayerArg {
    Bvlc,
    Npdu,
    Apdu,
}

/// A decoded frame at whichever layer decoding started.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Bvlc(Bvlc),
    Npdu(Npdu),
    Apdu(Apdu),
}

impl Frame {
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::Bvlc(frame) => frame.to_bytes(),
            Self::Npdu(frame) => frame.to_bytes(),
            Self::Apdu(frame) => frame.to_bytes(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Bvlc(frame) => serde_json::to_string_pretty(frame),
            Self::Npdu(frame) => serde_json::to_string_pretty(frame),
            Self::Apdu(frame) => serde_json::to_string_pretty(frame),
        }
    }
}

/// Parses hex octets. Whitespace, `:` separators, `0x` prefixes and
/// `#` comment lines are accepted.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, ToolError> {
    let mut digits = String::new();
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        for token in line.split(|c: char| c.is_whitespace() || c == ':' || c == ',') {
            let token = token.trim_start_matches("0x").trim_start_matches("0X");
            if !token.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ToolError::Hex(token.to_string()));
            }
            if token.len() % 2 != 0 {
                return Err(ToolError::OddHexDigits);
            }
            digits.push_str(token);
        }
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ToolError::Hex(digits[i..i + 2].to_string()))
        })
        .collect()
}

pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn decode_frame(bytes: &[u8], layer: LayerArg, options: DecodeOptions) -> Result<Frame, ToolError> {
    let mut r = Reader::with_options(bytes, options);
    let frame = match layer {
        LayerArg::Bvlc => Frame::Bvlc(Bvlc::decode(&mut r)?),
        LayerArg::Npdu => Frame::Npdu(Npdu::decode(&mut r, bytes.len())?),
        LayerArg::Apdu => Frame::Apdu(Apdu::decode(&mut r, bytes.len())?),
    };
    log::debug!("decoded {layer:?} frame from {} octets", bytes.len());
    Ok(frame)
}

/// Checks that `frame` encodes back to the octets it was decoded from.
///
/// A BVLC datagram may carry octets past its length field; those are not
/// part of the frame.
pub fn verify_round_trip(frame: &Frame, input: &[u8]) -> Result<(), ToolError> {
    let encoded = frame.to_bytes()?;
    if input.get(..encoded.len()) != Some(encoded.as_slice()) {
        return Err(ToolError::RoundTrip {
            encoded: encoded.len(),
            input: input.len(),
        });
    }
    if encoded.len() < input.len() {
        log::warn!(
            "{} octets after the frame were ignored",
            input.len() - encoded.len()
        );
    }
    Ok(())
}

/// Builds a Who-Is frame, broadcast on the local link unless `unicast`.
/// A `network` routes it to every device on that remote network.
pub fn build_who_is(range: Option<(u32, u32)>, network: Option<u16>, unicast: bool) -> Bvlc {
    let request = match range {
        Some((low, high)) => WhoIsRequest::range(low, high),
        None => WhoIsRequest::global(),
    };
    let apdu = Apdu::UnconfirmedRequest(UnconfirmedRequest::new(UnconfirmedServiceRequest::WhoIs(
        request,
    )));
    let mut npdu = Npdu::new(apdu);
    if let Some(network) = network {
        npdu = npdu.routed_to(RouteAddress::broadcast(network));
    }
    if unicast {
        Bvlc::OriginalUnicastNpdu { npdu }
    } else {
        Bvlc::OriginalBroadcastNpdu { npdu }
    }
}
