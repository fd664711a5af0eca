use crate::encoding::{
    encode::Encode, reader::Reader, tag::ApplicationTag, value::AppTag, writer::Writer,
};
use crate::types::{Date, Time};
use crate::{DecodeError, EncodeError};

/// Time-Synchronization and UTC-Time-Synchronization share this payload: an
/// application date followed by an application time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSynchronizationRequest {
    pub date: ApplicationTag,
    pub time: ApplicationTag,
}

impl TimeSynchronizationRequest {
    pub fn new(date: Date, time: Time) -> Self {
        Self {
            date: ApplicationTag::date(date),
            time: ApplicationTag::time(time),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            date: ApplicationTag::decode_expecting(r, AppTag::Date)?,
            time: ApplicationTag::decode_expecting(r, AppTag::Time)?,
        })
    }
}

impl Encode for TimeSynchronizationRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.date.encode(w)?;
        self.time.encode(w)
    }

    fn bit_len(&self) -> usize {
        self.date.bit_len() + self.time.bit_len()
    }
}

#[cfg(test)]
mod tests {
    use super::TimeSynchronizationRequest;
    use crate::encoding::{encode::Encode, reader::Reader};
    use crate::types::{Date, Time};

    #[test]
    fn date_then_time() {
        let req = TimeSynchronizationRequest::new(
            Date::from_octets([126, 10, 19, 1]),
            Time::from_octets([14, 30, 0, 0]),
        );
        let bytes = req.to_bytes().unwrap();
        assert_eq!(bytes, [0xA4, 126, 10, 19, 1, 0xB4, 14, 30, 0, 0]);
        let mut r = Reader::new(&bytes);
        assert_eq!(TimeSynchronizationRequest::decode(&mut r).unwrap(), req);
    }
}
