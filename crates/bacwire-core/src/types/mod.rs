pub mod bit_string;
pub mod date_time;
pub mod enumerations;
pub mod object_id;
pub mod object_type;
pub mod property_id;

pub use bit_string::BitString;
pub use date_time::{Date, Time};
pub use enumerations::{
    AbortReason, ErrorClass, ErrorCode, MaxApdu, MaxSegments, RejectReason, Segmentation,
};
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;
