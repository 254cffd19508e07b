use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::json;
use tracing::{debug, info};

use crate::db::repositories::availability_repository::AvailabilityRepository;
use crate::db::repositories::meeting_repository::MeetingRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::availability::CounselorAvailability;
use crate::models::meeting::{BookingRequest, BusyInterval, MeetingInsert, MeetingRecord, MeetingStatus};
use crate::models::settings::BookingSettings;
use crate::models::slot::AvailableDay;
use crate::services::availability_normalizer;
use crate::services::busy_interval_service;
use crate::services::slot_generator::SlotGenerator;

/// Ties the stored availability and meetings to the slot generator and owns
/// the booking write path.
#[derive(Clone)]
pub struct BookingService {
    db: DbPool,
    generator: SlotGenerator,
}

impl BookingService {
    pub fn new(db: DbPool, settings: &BookingSettings) -> Self {
        Self {
            db,
            generator: SlotGenerator::new(settings.generation.clone()),
        }
    }

    pub fn load_availability(&self, counselor_id: &str) -> AppResult<CounselorAvailability> {
        let counselor_id = ensure_id(counselor_id, "counselor")?;
        self.db
            .with_connection(|conn| availability_for(conn, counselor_id))
    }

    /// Validates strictly, stores, and returns what the normalizer will read back.
    pub fn save_availability(
        &self,
        availability: &CounselorAvailability,
    ) -> AppResult<CounselorAvailability> {
        availability_normalizer::validate_availability(availability)?;
        let record = availability_normalizer::to_record(availability)?;

        self.db.with_connection(|conn| {
            AvailabilityRepository::upsert(conn, &record)?;
            availability_for(conn, &availability.counselor_id)
        })
        .inspect(|_| {
            info!(
                target: "app::booking",
                counselor_id = %availability.counselor_id,
                blocked = availability.blocked_slots.len(),
                "availability saved"
            );
        })
    }

    /// Drops the stored record so the counselor falls back to the built-in
    /// schedule. Returns whether a record existed.
    pub fn reset_availability(&self, counselor_id: &str) -> AppResult<bool> {
        let counselor_id = ensure_id(counselor_id, "counselor")?;
        let removed = self
            .db
            .with_connection(|conn| AvailabilityRepository::delete(conn, counselor_id))?;
        info!(target: "app::booking", counselor_id, removed, "availability reset");
        Ok(removed)
    }

    pub fn busy_intervals(&self, counselor_id: &str) -> AppResult<Vec<BusyInterval>> {
        let counselor_id = ensure_id(counselor_id, "counselor")?;
        self.db
            .with_connection(|conn| busy_for(conn, counselor_id))
    }

    /// Bookable days strictly after `today`. An empty list means the
    /// counselor has no open capacity in the horizon.
    pub fn available_days(&self, counselor_id: &str, today: NaiveDate) -> AppResult<Vec<AvailableDay>> {
        let counselor_id = ensure_id(counselor_id, "counselor")?;
        self.db.with_connection(|conn| {
            let availability = availability_for(conn, counselor_id)?;
            let busy = busy_for(conn, counselor_id)?;
            Ok(self.generator.generate(&availability, &busy, today))
        })
    }

    /// Books a slot that is still offered. Availability is recomputed inside
    /// an immediate transaction, so a concurrent booking of the same slot
    /// makes this call fail with a conflict instead of double-booking.
    pub fn book(&self, request: &BookingRequest, today: NaiveDate) -> AppResult<MeetingRecord> {
        let counselor_id = ensure_id(&request.counselor_id, "counselor")?;

        let meeting = self.db.with_immediate_transaction(|tx| {
            let availability = availability_for(tx, counselor_id)?;
            let busy = busy_for(tx, counselor_id)?;
            let days = self.generator.generate(&availability, &busy, today);

            let offered = days
                .iter()
                .find(|day| day.date_key == request.date_key)
                .and_then(|day| {
                    day.slots
                        .iter()
                        .find(|slot| slot.start24 == request.start24)
                        .map(|slot| (day, slot))
                });

            let Some((day, slot)) = offered else {
                debug!(
                    target: "app::booking",
                    counselor_id,
                    date = %request.date_key,
                    start = %request.start24,
                    "requested slot is not offered"
                );
                return Err(AppError::conflict(format!(
                    "slot {} {} is no longer available",
                    request.date_key, request.start24
                )));
            };

            MeetingRepository::insert(
                tx,
                &MeetingInsert {
                    counselor_id: counselor_id.to_string(),
                    student_id: request.student_id.clone(),
                    date: day.date_long.clone(),
                    time: slot.label.clone(),
                    start_minute: Some(i64::from(slot.start24.minutes())),
                    end_minute: Some(i64::from(slot.end24.minutes())),
                    status: MeetingStatus::Pending,
                    meeting_type: request.meeting_type.clone(),
                    topic: request.topic.clone(),
                },
            )
        })?;

        info!(
            target: "app::booking",
            meeting_id = %meeting.id,
            counselor_id = %meeting.counselor_id,
            date = %meeting.date,
            time = %meeting.time,
            "meeting booked"
        );

        Ok(meeting)
    }

    pub fn update_status(&self, meeting_id: &str, status: MeetingStatus) -> AppResult<MeetingRecord> {
        let meeting_id = ensure_id(meeting_id, "meeting")?;

        let updated = self.db.with_immediate_transaction(|tx| {
            let current = MeetingRepository::find_by_id(tx, meeting_id)?;
            if !current.status.can_transition_to(status) {
                return Err(AppError::validation_with_details(
                    "meeting status transition not allowed",
                    json!({"from": current.status.as_str(), "to": status.as_str()}),
                ));
            }
            MeetingRepository::update_status(tx, meeting_id, status)?;
            MeetingRepository::find_by_id(tx, meeting_id)
        })?;

        info!(target: "app::booking", meeting_id, status = %status, "meeting status updated");
        Ok(updated)
    }

    pub fn cancel(&self, meeting_id: &str) -> AppResult<MeetingRecord> {
        self.update_status(meeting_id, MeetingStatus::Cancelled)
    }

    pub fn meetings_for_student(&self, student_id: &str) -> AppResult<Vec<MeetingRecord>> {
        let student_id = ensure_id(student_id, "student")?;
        self.db
            .with_connection(|conn| MeetingRepository::list_for_student(conn, student_id))
    }
}

fn availability_for(conn: &Connection, counselor_id: &str) -> AppResult<CounselorAvailability> {
    let record = AvailabilityRepository::find_by_counselor(conn, counselor_id)?;
    Ok(availability_normalizer::normalize_availability(
        counselor_id,
        record.as_ref(),
    ))
}

fn busy_for(conn: &Connection, counselor_id: &str) -> AppResult<Vec<BusyInterval>> {
    let meetings = MeetingRepository::list_active_for_counselor(conn, counselor_id)?;
    let mut grouped = busy_interval_service::extract_busy_intervals(&meetings);
    Ok(grouped.remove(counselor_id).unwrap_or_default())
}

fn ensure_id<'a>(value: &'a str, kind: &str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{kind} id must not be empty")));
    }
    Ok(trimmed)
}
