use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::clock_time::ClockTime;

/// A bookable window; `end24 - start24` equals the effective meeting duration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    pub start24: ClockTime,
    pub end24: ClockTime,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDay {
    pub date_key: NaiveDate,
    pub date_label: String,
    pub date_long: String,
    pub slots: Vec<AvailableSlot>,
}
