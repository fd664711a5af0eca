use core::fmt;

/// Protocol layer whose discriminator failed to match a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    ApplicationTag,
    ConfirmedService,
    ServiceAck,
    UnconfirmedService,
    Apdu,
    Nlm,
    Bvlc,
}

impl Layer {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ApplicationTag => "application tag",
            Self::ConfirmedService => "confirmed service",
            Self::ServiceAck => "service ack",
            Self::UnconfirmedService => "unconfirmed service",
            Self::Apdu => "APDU type",
            Self::Nlm => "network layer message",
            Self::Bvlc => "BVLC function",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    BufferTooSmall,
    ValueOutOfRange,
    InvalidLength,
    Unsupported,
    Message(&'static str),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("buffer too small"),
            Self::ValueOutOfRange => f.write_str("value out of range"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::Unsupported => f.write_str("operation unsupported"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended before the field being read.
    UnexpectedEof,
    InvalidTag,
    InvalidLength,
    InvalidValue,
    /// A multi-octet read started off an octet boundary.
    Unsupported,
    /// A discriminator value outside the closed table of `layer`.
    UnknownVariant { layer: Layer, value: u16 },
    /// A context tag carried a different tag number than the one expected here.
    TagMismatch { expected: u8, actual: u8 },
    /// A reserved or constant field held an unexpected value under strict decoding.
    ConstantFieldMismatch {
        field: &'static str,
        expected: u32,
        actual: u32,
    },
    /// An integer payload is wider than its target type.
    Overflow,
    /// Constructed data nested deeper than the reader's `max_nesting`.
    NestingTooDeep { limit: u16 },
    Message(&'static str),
}

impl DecodeError {
    /// Whether a speculative parse that hit this error may rewind and treat the
    /// field as absent.
    ///
    /// Everything else is structural and aborts the whole decode.
    pub const fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEof | Self::InvalidTag | Self::InvalidLength | Self::TagMismatch { .. }
        )
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::InvalidTag => f.write_str("invalid tag"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::InvalidValue => f.write_str("invalid value"),
            Self::Unsupported => f.write_str("operation unsupported"),
            Self::UnknownVariant { layer, value } => {
                write!(f, "unknown {} 0x{value:02x}", layer.name())
            }
            Self::TagMismatch { expected, actual } => {
                write!(f, "expected context tag {expected}, found {actual}")
            }
            Self::ConstantFieldMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {field} expected 0x{expected:x}, found 0x{actual:x}"
            ),
            Self::Overflow => f.write_str("integer overflow"),
            Self::NestingTooDeep { limit } => {
                write!(f, "constructed data nested deeper than {limit} levels")
            }
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::{DecodeError, Layer};

    #[test]
    fn soft_errors_are_the_rewindable_ones() {
        assert!(DecodeError::UnexpectedEof.is_soft());
        assert!(DecodeError::TagMismatch {
            expected: 0,
            actual: 1
        }
        .is_soft());
        assert!(!DecodeError::Overflow.is_soft());
        assert!(!DecodeError::NestingTooDeep { limit: 64 }.is_soft());
        assert!(!DecodeError::UnknownVariant {
            layer: Layer::Apdu,
            value: 9
        }
        .is_soft());
    }

    #[test]
    fn unknown_variant_names_layer() {
        let err = DecodeError::UnknownVariant {
            layer: Layer::Bvlc,
            value: 0x20,
        };
        assert_eq!(err.to_string(), "unknown BVLC function 0x20");
    }
}
