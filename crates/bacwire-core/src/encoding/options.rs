/// Opening/closing blocks a decode may nest before it gives up.
pub const DEFAULT_MAX_NESTING: u16 = 64;

/// How a decoder reacts to reserved or constant fields that hold unexpected values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strictness {
    /// Log the mismatch through `log::warn!` and keep decoding.
    #[default]
    Lenient,
    /// Fail with [`DecodeError::ConstantFieldMismatch`](crate::DecodeError::ConstantFieldMismatch).
    Strict,
}

/// Options carried by a [`Reader`](super::reader::Reader) through a whole decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    pub strictness: Strictness,
    /// Deepest constructed-data nesting accepted; deeper input fails with
    /// [`DecodeError::NestingTooDeep`](crate::DecodeError::NestingTooDeep).
    pub max_nesting: u16,
}

impl DecodeOptions {
    pub const fn lenient() -> Self {
        Self {
            strictness: Strictness::Lenient,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    pub const fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    pub const fn with_max_nesting(mut self, max_nesting: u16) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub const fn is_strict(&self) -> bool {
        matches!(self.strictness, Strictness::Strict)
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::lenient()
    }
}
