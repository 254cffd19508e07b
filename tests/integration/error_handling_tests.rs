//! Error surfaces of the booking boundary: preconditions, unavailable
//! slots, invalid saves and illegal status transitions.

use chrono::NaiveDate;
use counsel_booking_lib::db::DbPool;
use counsel_booking_lib::error::AppError;
use counsel_booking_lib::models::availability::CounselorAvailability;
use counsel_booking_lib::models::clock_time::ClockTime;
use counsel_booking_lib::models::meeting::{BookingRequest, MeetingStatus};
use counsel_booking_lib::models::settings::BookingSettings;
use counsel_booking_lib::services::booking_service::BookingService;
use tempfile::{tempdir, TempDir};

fn setup_service() -> (BookingService, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db = DbPool::new(temp_dir.path().join("errors.db")).expect("Failed to create test database");
    (BookingService::new(db, &BookingSettings::default()), temp_dir)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(hour: u32, minute: u32) -> ClockTime {
    ClockTime::from_hm(hour, minute).unwrap()
}

fn request(date: NaiveDate, start: ClockTime) -> BookingRequest {
    BookingRequest {
        counselor_id: "counselor-1".to_string(),
        student_id: Some("student-1".to_string()),
        date_key: date,
        start24: start,
        meeting_type: None,
        topic: None,
    }
}

#[test]
fn blank_ids_are_rejected_before_touching_storage() {
    let (service, _dir) = setup_service();
    let today = ymd(2026, 10, 19);

    assert!(matches!(
        service.available_days("   ", today),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        service.meetings_for_student(""),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        service.cancel(""),
        Err(AppError::Validation { .. })
    ));
}

#[test]
fn slots_that_are_never_offered_cannot_be_booked() {
    let (service, _dir) = setup_service();
    let today = ymd(2026, 10, 19);

    let cases = [
        (today, at(9, 0)),               // today itself
        (ymd(2026, 10, 24), at(9, 0)),   // saturday
        (ymd(2026, 10, 20), at(9, 10)),  // off the step grid
        (ymd(2026, 10, 20), at(12, 20)), // lunch break
        (ymd(2026, 12, 1), at(9, 0)),    // beyond the horizon
    ];

    for (date, start) in cases {
        let result = service.book(&request(date, start), today);
        assert!(
            matches!(result, Err(AppError::Conflict { .. })),
            "{date} {start} should not be bookable: {result:?}"
        );
    }
}

#[test]
fn invalid_availability_is_not_saved() {
    let (service, _dir) = setup_service();

    let mut availability = CounselorAvailability::with_defaults("counselor-1");
    availability.buffer_time = -5;
    let err = service.save_availability(&availability).unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
    assert_eq!(err.validation_details().unwrap()["bufferTime"], -5);

    let loaded = service.load_availability("counselor-1").unwrap();
    assert_eq!(loaded.buffer_time, 10, "defaults are still in effect");
}

#[test]
fn closed_meetings_cannot_be_reopened() {
    let (service, _dir) = setup_service();
    let today = ymd(2026, 10, 19);

    let meeting = service.book(&request(ymd(2026, 10, 21), at(10, 20)), today).unwrap();
    service.update_status(&meeting.id, MeetingStatus::Confirmed).unwrap();
    service.update_status(&meeting.id, MeetingStatus::Completed).unwrap();

    let err = service
        .update_status(&meeting.id, MeetingStatus::Pending)
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    assert!(matches!(
        service.update_status("no-such-meeting", MeetingStatus::Cancelled),
        Err(AppError::NotFound)
    ));
}

#[test]
fn oversized_duration_is_rejected_and_days_stay_bookable() {
    let (service, _dir) = setup_service();
    let today = ymd(2026, 10, 19);

    let mut availability = CounselorAvailability::with_defaults("counselor-1");
    availability.meeting_duration = i64::MAX;
    let err = service.save_availability(&availability).unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
    assert_eq!(err.validation_details().unwrap()["maximum"], 1440);

    availability.meeting_duration = 30;
    availability.buffer_time = 100_000;
    assert!(matches!(
        service.save_availability(&availability),
        Err(AppError::Validation { .. })
    ));

    let days = service.available_days("counselor-1", today).unwrap();
    assert_eq!(days.len(), 8);
}
