use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Naive wall-clock time of day, stored as minutes since midnight.
///
/// There is no timezone attached; every schedule, blocked range and meeting
/// is interpreted in the same local wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            return None;
        }
        u16::try_from(minutes).ok().map(ClockTime)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Self::from_minutes(hour * 60 + minute)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Parses `"H:MM"` / `"HH:MM"`, tolerating a trailing `":SS"` as stored
    /// by SQL `time` columns.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let mut parts = trimmed.split(':');
        let hour = parts.next()?;
        let minute = parts.next()?;
        if let Some(seconds) = parts.next() {
            if seconds.len() != 2 || !all_digits(seconds) {
                return None;
            }
        }
        if parts.next().is_some() {
            return None;
        }

        if hour.is_empty() || hour.len() > 2 || !all_digits(hour) {
            return None;
        }
        if minute.len() != 2 || !all_digits(minute) {
            return None;
        }

        Self::from_hm(hour.parse().ok()?, minute.parse().ok()?)
    }
}

fn all_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ClockTime::parse(value).ok_or_else(|| format!("invalid clock time: {value}"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
