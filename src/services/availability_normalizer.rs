use std::cmp::Ordering;

use serde_json::{json, Map, Value as JsonValue};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::availability::{
    AvailabilityRecord, BlockedSlot, BreakRange, CounselorAvailability, DaySchedule, ScheduleDay,
    WeeklySchedule, DEFAULT_BUFFER_TIME, DEFAULT_MEETING_DURATION,
};
use crate::models::clock_time::{ClockTime, MINUTES_PER_DAY};
use crate::models::settings::DEFAULT_MIN_DURATION_MINUTES;

const MAX_SAVED_MINUTES: i64 = MINUTES_PER_DAY as i64;

/// Turns whatever is stored for a counselor into a fully populated
/// availability. Never fails: malformed pieces fall back to built-in values
/// or are dropped.
pub fn normalize_availability(
    counselor_id: &str,
    record: Option<&AvailabilityRecord>,
) -> CounselorAvailability {
    let Some(record) = record else {
        debug!(target: "app::slots", counselor_id, "no availability record, using defaults");
        return CounselorAvailability::with_defaults(counselor_id);
    };

    CounselorAvailability {
        counselor_id: counselor_id.to_string(),
        meeting_duration: number_or(&record.meeting_duration, DEFAULT_MEETING_DURATION),
        buffer_time: number_or(&record.buffer_time, DEFAULT_BUFFER_TIME),
        weekly_schedule: normalize_weekly_schedule(&record.weekly_schedule),
        blocked_slots: normalize_blocked_slots(&record.blocked_slots),
    }
}

pub fn normalize_weekly_schedule(raw: &JsonValue) -> WeeklySchedule {
    let decoded = decode_embedded_json(raw);
    let Some(days) = decoded.as_object() else {
        debug!(target: "app::slots", "weekly schedule is not an object, using defaults");
        return WeeklySchedule::default();
    };

    let mut schedule = WeeklySchedule::default();
    for day in ScheduleDay::ALL {
        if let Some(JsonValue::Object(fields)) = days.get(day.as_str()) {
            *schedule.day_mut(day) = normalize_day(day, fields);
        }
    }
    schedule
}

fn normalize_day(day: ScheduleDay, fields: &Map<String, JsonValue>) -> DaySchedule {
    let fallback = DaySchedule::builtin(day);
    DaySchedule {
        enabled: fields
            .get("enabled")
            .and_then(JsonValue::as_bool)
            .unwrap_or(fallback.enabled),
        start: clock_field(fields, "start").unwrap_or(fallback.start),
        end: clock_field(fields, "end").unwrap_or(fallback.end),
        breaks: normalize_breaks(fields.get("breaks").unwrap_or(&JsonValue::Null)),
    }
}

/// Keeps `{start, end}` string pairs with `end` strictly after `start`.
pub fn normalize_breaks(raw: &JsonValue) -> Vec<BreakRange> {
    let decoded = decode_embedded_json(raw);
    let Some(entries) = decoded.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(JsonValue::as_object)
        .filter_map(time_range)
        .map(|(start, end)| BreakRange { start, end })
        .collect()
}

/// Same shape rule as breaks plus a non-empty `date`, sorted by date then start.
pub fn normalize_blocked_slots(raw: &JsonValue) -> Vec<BlockedSlot> {
    let decoded = decode_embedded_json(raw);
    let Some(entries) = decoded.as_array() else {
        return Vec::new();
    };

    let mut slots: Vec<BlockedSlot> = entries
        .iter()
        .filter_map(JsonValue::as_object)
        .filter_map(|fields| {
            let date = fields.get("date")?.as_str()?.trim();
            if date.is_empty() {
                return None;
            }
            let (start, end) = time_range(fields)?;
            Some(BlockedSlot {
                date: date.to_string(),
                start,
                end,
            })
        })
        .collect();

    slots.sort_by(|a, b| match a.date.cmp(&b.date) {
        Ordering::Equal => a.start.cmp(&b.start),
        other => other,
    });
    slots
}

fn time_range(fields: &Map<String, JsonValue>) -> Option<(ClockTime, ClockTime)> {
    let start = clock_field(fields, "start")?;
    let end = clock_field(fields, "end")?;
    (end > start).then_some((start, end))
}

fn clock_field(fields: &Map<String, JsonValue>, key: &str) -> Option<ClockTime> {
    fields.get(key)?.as_str().and_then(ClockTime::parse)
}

fn number_or(raw: &JsonValue, default: i64) -> i64 {
    match raw {
        JsonValue::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            .unwrap_or(default),
        JsonValue::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| v.trunc() as i64)
                })
                .unwrap_or(default)
        }
        _ => default,
    }
}

/// Text columns may hold JSON documents; anything that does not decode stays
/// as the original value so the shape checks reject it.
fn decode_embedded_json(raw: &JsonValue) -> JsonValue {
    match raw {
        JsonValue::String(text) => {
            serde_json::from_str::<JsonValue>(text).unwrap_or_else(|_| raw.clone())
        }
        other => other.clone(),
    }
}

/// Strict check applied when a counselor saves their availability.
pub fn validate_availability(availability: &CounselorAvailability) -> AppResult<()> {
    if availability.counselor_id.trim().is_empty() {
        return Err(AppError::validation("counselor id must not be empty"));
    }
    if availability.meeting_duration < DEFAULT_MIN_DURATION_MINUTES {
        return Err(AppError::validation_with_details(
            "meeting duration is below the minimum",
            json!({
                "meetingDuration": availability.meeting_duration,
                "minimum": DEFAULT_MIN_DURATION_MINUTES,
            }),
        ));
    }
    if availability.meeting_duration > MAX_SAVED_MINUTES {
        return Err(AppError::validation_with_details(
            "meeting duration exceeds one day",
            json!({
                "meetingDuration": availability.meeting_duration,
                "maximum": MAX_SAVED_MINUTES,
            }),
        ));
    }
    if availability.buffer_time < 0 {
        return Err(AppError::validation_with_details(
            "buffer time must not be negative",
            json!({"bufferTime": availability.buffer_time}),
        ));
    }
    if availability.buffer_time > MAX_SAVED_MINUTES {
        return Err(AppError::validation_with_details(
            "buffer time exceeds one day",
            json!({"bufferTime": availability.buffer_time, "maximum": MAX_SAVED_MINUTES}),
        ));
    }

    for day in ScheduleDay::ALL {
        let schedule = availability.weekly_schedule.day(day);
        if schedule.enabled && schedule.end <= schedule.start {
            return Err(AppError::validation_with_details(
                "enabled day must end after it starts",
                json!({"day": day.as_str(), "start": schedule.start, "end": schedule.end}),
            ));
        }
        if let Some(bad) = schedule.breaks.iter().find(|b| b.end <= b.start) {
            return Err(AppError::validation_with_details(
                "break must end after it starts",
                json!({"day": day.as_str(), "start": bad.start, "end": bad.end}),
            ));
        }
    }

    if let Some(bad) = availability
        .blocked_slots
        .iter()
        .find(|slot| slot.end <= slot.start || slot.date.trim().is_empty())
    {
        return Err(AppError::validation_with_details(
            "blocked slot needs a date and must end after it starts",
            json!({"date": bad.date, "start": bad.start, "end": bad.end}),
        ));
    }

    Ok(())
}

/// Serializes an availability into the stored row shape.
pub fn to_record(availability: &CounselorAvailability) -> AppResult<AvailabilityRecord> {
    Ok(AvailabilityRecord {
        counselor_id: availability.counselor_id.clone(),
        meeting_duration: json!(availability.meeting_duration),
        buffer_time: json!(availability.buffer_time),
        weekly_schedule: serde_json::to_value(&availability.weekly_schedule)?,
        blocked_slots: serde_json::to_value(&availability.blocked_slots)?,
        updated_at: None,
    })
}
