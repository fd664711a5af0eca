/// Opening/closing bracketed element lists.
pub mod constructed;
/// The [`Encode`](encode::Encode) trait shared by every wire entity.
pub mod encode;
/// The generic tag header with its tag number and length extensions.
pub mod header;
/// Decoder configuration.
pub mod options;
/// Fixed-width integer payload helpers.
pub mod primitives;
/// Bit-granular reader for decoding BACnet frames.
pub mod reader;
/// Application and context tags.
pub mod tag;
/// Tag payload values and the application data types.
pub mod value;
/// Bit-granular writer for encoding BACnet frames into a caller-owned buffer.
pub mod writer;

pub use constructed::{ConstructedData, Element};
pub use encode::Encode;
pub use header::TagHeader;
pub use options::{DecodeOptions, Strictness};
pub use reader::Reader;
pub use tag::{peek_is_closing_tag, ApplicationTag, ContextTag, ContextValue, Tag};
pub use value::{AppTag, TagValue};
pub use writer::Writer;
