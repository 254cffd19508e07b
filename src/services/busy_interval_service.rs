use std::collections::HashMap;

use tracing::debug;

use crate::models::clock_time::ClockTime;
use crate::models::meeting::{BusyInterval, MeetingRecord};
use crate::services::{schedule_utils, slot_formatter};

/// Groups the busy time of pending/confirmed meetings by counselor id.
///
/// Meetings whose date or time cannot be understood are left out rather than
/// failing the whole computation; the booking write path re-checks overlaps
/// before anything is inserted.
pub fn extract_busy_intervals(meetings: &[MeetingRecord]) -> HashMap<String, Vec<BusyInterval>> {
    let mut grouped: HashMap<String, Vec<BusyInterval>> = HashMap::new();
    for meeting in meetings {
        if let Some(interval) = busy_interval_for(meeting) {
            grouped
                .entry(meeting.counselor_id.clone())
                .or_default()
                .push(interval);
        }
    }
    grouped
}

pub fn busy_interval_for(meeting: &MeetingRecord) -> Option<BusyInterval> {
    if !meeting.status.blocks_availability() {
        return None;
    }

    let Some(date) = schedule_utils::parse_loose_date(&meeting.date) else {
        debug!(
            target: "app::slots",
            meeting_id = %meeting.id,
            date = %meeting.date,
            "skipping meeting with unparseable date"
        );
        return None;
    };

    let Some((start, end)) = structured_range(meeting).or_else(|| slot_formatter::parse_range(&meeting.time))
    else {
        debug!(
            target: "app::slots",
            meeting_id = %meeting.id,
            time = %meeting.time,
            "skipping meeting with unparseable time range"
        );
        return None;
    };

    Some(BusyInterval { date, start, end })
}

fn structured_range(meeting: &MeetingRecord) -> Option<(ClockTime, ClockTime)> {
    let start = ClockTime::from_minutes(u32::try_from(meeting.start_minute?).ok()?)?;
    let end = ClockTime::from_minutes(u32::try_from(meeting.end_minute?).ok()?)?;
    (end > start).then_some((start, end))
}
