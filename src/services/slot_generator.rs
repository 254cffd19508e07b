use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::models::availability::{CounselorAvailability, ScheduleDay};
use crate::models::clock_time::{ClockTime, MINUTES_PER_DAY};
use crate::models::meeting::BusyInterval;
use crate::models::settings::SlotGenerationConfig;
use crate::models::slot::{AvailableDay, AvailableSlot};
use crate::services::{schedule_utils, slot_formatter};

const DAY_MINUTES: i64 = MINUTES_PER_DAY as i64;

/// Walks a rolling window of days after `today` and proposes bookable slots.
///
/// Pure and deterministic: the same availability, busy set and `today`
/// always produce the same days in the same order.
#[derive(Debug, Clone, Default)]
pub struct SlotGenerator {
    config: SlotGenerationConfig,
}

impl SlotGenerator {
    pub fn new(config: SlotGenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SlotGenerationConfig {
        &self.config
    }

    /// `busy` must already be restricted to this counselor.
    pub fn generate(
        &self,
        availability: &CounselorAvailability,
        busy: &[BusyInterval],
        today: NaiveDate,
    ) -> Vec<AvailableDay> {
        let mut days = Vec::new();

        for offset in 1..=i64::from(self.config.horizon_days) {
            if days.len() >= self.config.max_days {
                break;
            }
            let Some(date) = today.checked_add_signed(Duration::days(offset)) else {
                break;
            };

            let slots = self.slots_for_date(availability, busy, date);
            if slots.is_empty() {
                continue;
            }

            days.push(AvailableDay {
                date_key: date,
                date_label: slot_formatter::date_label(date),
                date_long: slot_formatter::date_long(date),
                slots,
            });
        }

        debug!(
            target: "app::slots",
            counselor_id = %availability.counselor_id,
            %today,
            days = days.len(),
            "generated available days"
        );

        days
    }

    /// Slots for a single date; empty for weekends and disabled days.
    pub fn slots_for_date(
        &self,
        availability: &CounselorAvailability,
        busy: &[BusyInterval],
        date: NaiveDate,
    ) -> Vec<AvailableSlot> {
        let Some(day) = ScheduleDay::from_weekday(date.weekday()) else {
            return Vec::new();
        };
        let schedule = availability.weekly_schedule.day(day);
        if !schedule.enabled {
            return Vec::new();
        }

        let key = schedule_utils::date_key(date);
        let blocked: Vec<(ClockTime, ClockTime)> = availability
            .blocked_slots
            .iter()
            .filter(|slot| slot.date == key)
            .map(|slot| (slot.start, slot.end))
            .collect();
        let taken: Vec<(ClockTime, ClockTime)> = busy
            .iter()
            .filter(|interval| interval.date == date)
            .map(|interval| (interval.start, interval.end))
            .collect();

        let duration = self.effective_duration(availability.meeting_duration);
        let step = self.effective_step(availability.meeting_duration, availability.buffer_time);
        let day_end = i64::from(schedule.end.minutes());

        let mut slots = Vec::new();
        let mut cursor = i64::from(schedule.start.minutes());
        while cursor + duration <= day_end {
            if let Some((start, end)) = clock_pair(cursor, cursor + duration) {
                let rejected = schedule
                    .breaks
                    .iter()
                    .map(|range| (range.start, range.end))
                    .chain(blocked.iter().copied())
                    .chain(taken.iter().copied())
                    .any(|(other_start, other_end)| {
                        schedule_utils::overlaps_clock(start, end, other_start, other_end)
                    });

                if !rejected {
                    slots.push(AvailableSlot {
                        start24: start,
                        end24: end,
                        label: slot_formatter::format_range(start, end),
                    });
                }
            }
            cursor += step;
        }

        slots
    }

    /// Floored by config and capped at one day, so cursor math cannot overflow.
    pub fn effective_duration(&self, meeting_duration: i64) -> i64 {
        meeting_duration
            .max(self.config.min_duration_minutes)
            .clamp(1, DAY_MINUTES)
    }

    pub fn effective_step(&self, meeting_duration: i64, buffer_time: i64) -> i64 {
        let duration = self.effective_duration(meeting_duration);
        duration
            .saturating_add(buffer_time.clamp(0, DAY_MINUTES))
            .max(self.config.min_step_minutes)
            .clamp(1, DAY_MINUTES)
    }
}

/// Generates with the default horizon policy.
pub fn generate_available_days(
    availability: &CounselorAvailability,
    busy: &[BusyInterval],
    today: NaiveDate,
) -> Vec<AvailableDay> {
    SlotGenerator::default().generate(availability, busy, today)
}

fn clock_pair(start: i64, end: i64) -> Option<(ClockTime, ClockTime)> {
    let start = ClockTime::from_minutes(u32::try_from(start).ok()?)?;
    let end = ClockTime::from_minutes(u32::try_from(end).ok()?)?;
    Some((start, end))
}
