use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::clock_time::ClockTime;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Declined,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Pending => "pending",
            MeetingStatus::Confirmed => "confirmed",
            MeetingStatus::Cancelled => "cancelled",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Declined => "declined",
        }
    }

    /// Only pending and confirmed meetings occupy counselor time.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, MeetingStatus::Pending | MeetingStatus::Confirmed)
    }

    pub fn can_transition_to(&self, next: MeetingStatus) -> bool {
        match self {
            MeetingStatus::Pending => next != MeetingStatus::Pending,
            MeetingStatus::Confirmed => matches!(
                next,
                MeetingStatus::Cancelled | MeetingStatus::Completed
            ),
            MeetingStatus::Cancelled | MeetingStatus::Completed | MeetingStatus::Declined => false,
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MeetingStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(MeetingStatus::Pending),
            "confirmed" => Ok(MeetingStatus::Confirmed),
            "cancelled" => Ok(MeetingStatus::Cancelled),
            "completed" => Ok(MeetingStatus::Completed),
            "declined" => Ok(MeetingStatus::Declined),
            other => Err(format!("unsupported meeting status: {other}")),
        }
    }
}

/// A stored meeting. `date` and `time` are free text as written by older
/// clients; `start_minute`/`end_minute` are present on rows written by
/// [`crate::services::booking_service::BookingService`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    pub id: String,
    pub counselor_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub start_minute: Option<i64>,
    #[serde(default)]
    pub end_minute: Option<i64>,
    pub status: MeetingStatus,
    #[serde(default)]
    pub meeting_type: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInsert {
    pub counselor_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub start_minute: Option<i64>,
    #[serde(default)]
    pub end_minute: Option<i64>,
    pub status: MeetingStatus,
    #[serde(default)]
    pub meeting_type: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Time already consumed by a pending or confirmed meeting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusyInterval {
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub counselor_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub date_key: NaiveDate,
    pub start24: ClockTime,
    #[serde(default)]
    pub meeting_type: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}
