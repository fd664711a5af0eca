/// Wildcard octet meaning "any" in any date or time field.
pub const UNSPECIFIED: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    pub year_since_1900: u8,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

impl Date {
    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self {
            year_since_1900: octets[0],
            month: octets[1],
            day: octets[2],
            weekday: octets[3],
        }
    }

    pub const fn to_octets(self) -> [u8; 4] {
        [self.year_since_1900, self.month, self.day, self.weekday]
    }

    /// Calendar year, or `None` when the year is a wildcard.
    pub const fn year(self) -> Option<u16> {
        if self.year_since_1900 == UNSPECIFIED {
            None
        } else {
            Some(1900 + self.year_since_1900 as u16)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
}

impl Time {
    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self {
            hour: octets[0],
            minute: octets[1],
            second: octets[2],
            hundredths: octets[3],
        }
    }

    pub const fn to_octets(self) -> [u8; 4] {
        [self.hour, self.minute, self.second, self.hundredths]
    }
}
