use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::clock_time::ClockTime;

pub const DEFAULT_MEETING_DURATION: i64 = 30;
pub const DEFAULT_BUFFER_TIME: i64 = 10;

/// The five bookable weekdays. Weekends are never modeled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl ScheduleDay {
    pub const ALL: [ScheduleDay; 5] = [
        ScheduleDay::Monday,
        ScheduleDay::Tuesday,
        ScheduleDay::Wednesday,
        ScheduleDay::Thursday,
        ScheduleDay::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleDay::Monday => "monday",
            ScheduleDay::Tuesday => "tuesday",
            ScheduleDay::Wednesday => "wednesday",
            ScheduleDay::Thursday => "thursday",
            ScheduleDay::Friday => "friday",
        }
    }

    /// `None` for Saturday and Sunday.
    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(ScheduleDay::Monday),
            Weekday::Tue => Some(ScheduleDay::Tuesday),
            Weekday::Wed => Some(ScheduleDay::Wednesday),
            Weekday::Thu => Some(ScheduleDay::Thursday),
            Weekday::Fri => Some(ScheduleDay::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }
}

impl fmt::Display for ScheduleDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ScheduleDay {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "monday" => Ok(ScheduleDay::Monday),
            "tuesday" => Ok(ScheduleDay::Tuesday),
            "wednesday" => Ok(ScheduleDay::Wednesday),
            "thursday" => Ok(ScheduleDay::Thursday),
            "friday" => Ok(ScheduleDay::Friday),
            other => Err(format!("unsupported schedule day: {other}")),
        }
    }
}

/// Half-open `[start, end)` window inside a day. `end > start` always holds
/// for values produced by the normalizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaySchedule {
    pub enabled: bool,
    pub start: ClockTime,
    pub end: ClockTime,
    #[serde(default)]
    pub breaks: Vec<BreakRange>,
}

impl DaySchedule {
    /// Mon-Thu 09:00-17:00 with a lunch break, Fri 09:00-15:00 without one.
    pub fn builtin(day: ScheduleDay) -> Self {
        let nine = ClockTime::from_minutes(9 * 60).unwrap_or(ClockTime::MIDNIGHT);
        match day {
            ScheduleDay::Friday => DaySchedule {
                enabled: true,
                start: nine,
                end: ClockTime::from_minutes(15 * 60).unwrap_or(ClockTime::MIDNIGHT),
                breaks: Vec::new(),
            },
            _ => DaySchedule {
                enabled: true,
                start: nine,
                end: ClockTime::from_minutes(17 * 60).unwrap_or(ClockTime::MIDNIGHT),
                breaks: vec![BreakRange {
                    start: ClockTime::from_minutes(12 * 60).unwrap_or(ClockTime::MIDNIGHT),
                    end: ClockTime::from_minutes(13 * 60).unwrap_or(ClockTime::MIDNIGHT),
                }],
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
}

impl WeeklySchedule {
    pub fn day(&self, day: ScheduleDay) -> &DaySchedule {
        match day {
            ScheduleDay::Monday => &self.monday,
            ScheduleDay::Tuesday => &self.tuesday,
            ScheduleDay::Wednesday => &self.wednesday,
            ScheduleDay::Thursday => &self.thursday,
            ScheduleDay::Friday => &self.friday,
        }
    }

    pub fn day_mut(&mut self, day: ScheduleDay) -> &mut DaySchedule {
        match day {
            ScheduleDay::Monday => &mut self.monday,
            ScheduleDay::Tuesday => &mut self.tuesday,
            ScheduleDay::Wednesday => &mut self.wednesday,
            ScheduleDay::Thursday => &mut self.thursday,
            ScheduleDay::Friday => &mut self.friday,
        }
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            monday: DaySchedule::builtin(ScheduleDay::Monday),
            tuesday: DaySchedule::builtin(ScheduleDay::Tuesday),
            wednesday: DaySchedule::builtin(ScheduleDay::Wednesday),
            thursday: DaySchedule::builtin(ScheduleDay::Thursday),
            friday: DaySchedule::builtin(ScheduleDay::Friday),
        }
    }
}

/// One-off unavailability on a specific date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockedSlot {
    pub date: String,
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CounselorAvailability {
    pub counselor_id: String,
    pub meeting_duration: i64,
    pub buffer_time: i64,
    pub weekly_schedule: WeeklySchedule,
    #[serde(default)]
    pub blocked_slots: Vec<BlockedSlot>,
}

impl CounselorAvailability {
    pub fn with_defaults(counselor_id: impl Into<String>) -> Self {
        Self {
            counselor_id: counselor_id.into(),
            meeting_duration: DEFAULT_MEETING_DURATION,
            buffer_time: DEFAULT_BUFFER_TIME,
            weekly_schedule: WeeklySchedule::default(),
            blocked_slots: Vec::new(),
        }
    }
}

/// Availability row as persisted. Every column is loosely typed; the
/// normalizer is the only consumer allowed to interpret it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AvailabilityRecord {
    pub counselor_id: String,
    #[serde(default)]
    pub meeting_duration: JsonValue,
    #[serde(default)]
    pub buffer_time: JsonValue,
    #[serde(default)]
    pub weekly_schedule: JsonValue,
    #[serde(default)]
    pub blocked_slots: JsonValue,
    #[serde(default)]
    pub updated_at: Option<String>,
}
