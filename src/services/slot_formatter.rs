//! Conversions between internal 24-hour clock values and the 12-hour labels
//! shown to students and persisted on meeting rows.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::clock_time::ClockTime;

static TWELVE_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d{1,2}):(\d{2}) ?(AM|PM)$").expect("valid 12-hour pattern"));

/// `09:05` → `9:05 AM`, `00:30` → `12:30 AM`, `12:00` → `12:00 PM`.
pub fn format_12h(time: ClockTime) -> String {
    let hour = time.hour();
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{}:{:02} {}", display_hour, time.minute(), suffix)
}

/// Same as [`format_12h`] for a raw `"HH:MM"` string.
pub fn label_from_24h(value: &str) -> Option<String> {
    ClockTime::parse(value).map(format_12h)
}

/// Strict `"H:MM AM|PM"` parse. Hours outside 1-12 are rejected.
pub fn parse_12h(value: &str) -> Option<ClockTime> {
    let captures = TWELVE_HOUR.captures(value.trim())?;
    let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minute: u32 = captures.get(2)?.as_str().parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let is_pm = captures.get(3)?.as_str().eq_ignore_ascii_case("PM");
    let hour24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    ClockTime::from_hm(hour24, minute)
}

pub fn parse_12h_minutes(value: &str) -> Option<u32> {
    parse_12h(value).map(ClockTime::minutes)
}

/// `"9:00 AM - 9:30 AM"`; the format stored in a meeting's `time` column.
pub fn format_range(start: ClockTime, end: ClockTime) -> String {
    format!("{} - {}", format_12h(start), format_12h(end))
}

/// Parses a stored range. Exactly two tokens around `-`, end strictly after
/// start; anything else is `None`.
pub fn parse_range(value: &str) -> Option<(ClockTime, ClockTime)> {
    let mut parts = value.split('-');
    let start = parse_12h(parts.next()?)?;
    let end = parse_12h(parts.next()?)?;
    if parts.next().is_some() || end <= start {
        return None;
    }
    Some((start, end))
}

/// `Monday, October 20`
pub fn date_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// `October 20, 2026`
pub fn date_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
