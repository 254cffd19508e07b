//! End-to-end booking flow against an on-disk SQLite database:
//! stored availability -> offered days -> booking -> regenerated days.

use chrono::NaiveDate;
use counsel_booking_lib::db::repositories::availability_repository::AvailabilityRepository;
use counsel_booking_lib::db::repositories::meeting_repository::MeetingRepository;
use counsel_booking_lib::db::DbPool;
use counsel_booking_lib::models::availability::{
    AvailabilityRecord, BlockedSlot, CounselorAvailability, DaySchedule, ScheduleDay,
};
use counsel_booking_lib::models::clock_time::ClockTime;
use counsel_booking_lib::models::meeting::{BookingRequest, MeetingInsert, MeetingStatus};
use counsel_booking_lib::models::settings::BookingSettings;
use counsel_booking_lib::services::booking_service::BookingService;
use serde_json::json;
use tempfile::{tempdir, TempDir};

fn setup_test_env() -> (DbPool, BookingService, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db = DbPool::new(temp_dir.path().join("booking.db")).expect("Failed to create test database");
    let service = BookingService::new(db.clone(), &BookingSettings::default());
    (db, service, temp_dir)
}

fn at(hour: u32, minute: u32) -> ClockTime {
    ClockTime::from_hm(hour, minute).expect("valid clock time")
}

// 2026-10-19 is a Monday.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
}

fn request(counselor_id: &str, date: NaiveDate, start: ClockTime) -> BookingRequest {
    BookingRequest {
        counselor_id: counselor_id.to_string(),
        student_id: Some("student-7".to_string()),
        date_key: date,
        start24: start,
        meeting_type: Some("virtual".to_string()),
        topic: Some("college applications".to_string()),
    }
}

#[test]
fn counselor_without_record_gets_default_days() {
    let (_db, service, _dir) = setup_test_env();

    let days = service.available_days("counselor-1", today()).unwrap();
    assert_eq!(days.len(), 8);
    assert_eq!(days[0].date_key, tuesday());
    assert_eq!(days[0].slots[0].start24, at(9, 0));
}

#[test]
fn booking_removes_the_slot_and_persists_display_strings() {
    let (db, service, _dir) = setup_test_env();

    let meeting = service
        .book(&request("counselor-1", tuesday(), at(9, 40)), today())
        .expect("slot is bookable");

    assert_eq!(meeting.status, MeetingStatus::Pending);
    assert_eq!(meeting.date, "October 20, 2026");
    assert_eq!(meeting.time, "9:40 AM - 10:10 AM");
    assert_eq!(meeting.start_minute, Some(580));
    assert_eq!(meeting.end_minute, Some(610));

    let days = service.available_days("counselor-1", today()).unwrap();
    let starts: Vec<ClockTime> = days[0].slots.iter().map(|slot| slot.start24).collect();
    assert!(!starts.contains(&at(9, 40)));
    assert!(starts.contains(&at(9, 0)));
    assert!(starts.contains(&at(10, 20)));

    let stored = db
        .with_connection(|conn| MeetingRepository::find_by_id(conn, &meeting.id))
        .unwrap();
    assert_eq!(stored, meeting);
}

#[test]
fn double_booking_the_same_slot_is_a_conflict() {
    let (_db, service, _dir) = setup_test_env();

    service
        .book(&request("counselor-1", tuesday(), at(9, 0)), today())
        .unwrap();
    let second = service.book(&request("counselor-1", tuesday(), at(9, 0)), today());
    assert!(second.unwrap_err().is_conflict());
}

#[test]
fn cancelling_frees_the_slot_again() {
    let (_db, service, _dir) = setup_test_env();

    let meeting = service
        .book(&request("counselor-1", tuesday(), at(11, 0)), today())
        .unwrap();
    let cancelled = service.cancel(&meeting.id).unwrap();
    assert_eq!(cancelled.status, MeetingStatus::Cancelled);

    service
        .book(&request("counselor-1", tuesday(), at(11, 0)), today())
        .expect("slot is free after cancellation");

    let history = service.meetings_for_student("student-7").unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn legacy_meeting_rows_block_by_their_text_range() {
    let (db, service, _dir) = setup_test_env();

    db.with_connection(|conn| {
        MeetingRepository::insert(
            conn,
            &MeetingInsert {
                counselor_id: "counselor-1".to_string(),
                student_id: None,
                date: "Tuesday, October 20, 2026".to_string(),
                time: "9:15 AM - 9:45 AM".to_string(),
                start_minute: None,
                end_minute: None,
                status: MeetingStatus::Confirmed,
                meeting_type: None,
                topic: None,
            },
        )?;
        MeetingRepository::insert(
            conn,
            &MeetingInsert {
                counselor_id: "counselor-1".to_string(),
                student_id: None,
                date: "sometime".to_string(),
                time: "10:20 AM - 10:50 AM".to_string(),
                start_minute: None,
                end_minute: None,
                status: MeetingStatus::Confirmed,
                meeting_type: None,
                topic: None,
            },
        )?;
        Ok(())
    })
    .unwrap();

    let busy = service.busy_intervals("counselor-1").unwrap();
    assert_eq!(busy.len(), 1, "unparseable date is skipped");

    let days = service.available_days("counselor-1", today()).unwrap();
    let starts: Vec<ClockTime> = days[0].slots.iter().map(|slot| slot.start24).collect();
    assert!(!starts.contains(&at(9, 0)));
    assert!(!starts.contains(&at(9, 40)));
    assert!(starts.contains(&at(10, 20)));
}

#[test]
fn saved_availability_drives_generation() {
    let (_db, service, _dir) = setup_test_env();

    let mut availability = CounselorAvailability::with_defaults("counselor-2");
    availability.meeting_duration = 60;
    availability.buffer_time = 0;
    for day in ScheduleDay::ALL {
        availability.weekly_schedule.day_mut(day).enabled = false;
    }
    *availability.weekly_schedule.day_mut(ScheduleDay::Tuesday) = DaySchedule {
        enabled: true,
        start: at(13, 0),
        end: at(16, 0),
        breaks: Vec::new(),
    };
    availability.blocked_slots.push(BlockedSlot {
        date: "2026-10-27".to_string(),
        start: at(13, 0),
        end: at(16, 0),
    });

    let saved = service.save_availability(&availability).unwrap();
    assert_eq!(saved, availability);

    let days = service.available_days("counselor-2", today()).unwrap();
    let keys: Vec<NaiveDate> = days.iter().map(|day| day.date_key).collect();
    assert_eq!(
        keys,
        vec![tuesday(), NaiveDate::from_ymd_opt(2026, 11, 3).unwrap()],
        "blocked tuesday is dropped entirely"
    );
    assert_eq!(days[0].slots.len(), 3);
}

#[test]
fn malformed_stored_record_still_produces_slots() {
    let (db, service, _dir) = setup_test_env();

    db.with_connection(|conn| {
        AvailabilityRepository::upsert(
            conn,
            &AvailabilityRecord {
                counselor_id: "counselor-3".to_string(),
                meeting_duration: json!("abc"),
                buffer_time: json!(null),
                weekly_schedule: json!("not-json-shaped"),
                blocked_slots: json!("[{\"date\": \"\", \"start\": \"09:00\", \"end\": \"10:00\"}]"),
                updated_at: None,
            },
        )
    })
    .unwrap();

    let availability = service.load_availability("counselor-3").unwrap();
    assert_eq!(availability, CounselorAvailability::with_defaults("counselor-3"));
    assert_eq!(service.available_days("counselor-3", today()).unwrap().len(), 8);
}

#[test]
fn oversized_stored_numbers_do_not_break_generation() {
    let (db, service, _dir) = setup_test_env();

    db.with_connection(|conn| {
        AvailabilityRepository::upsert(
            conn,
            &AvailabilityRecord {
                counselor_id: "counselor-4".to_string(),
                meeting_duration: json!(1e30),
                buffer_time: json!(30),
                weekly_schedule: json!({}),
                blocked_slots: json!([]),
                updated_at: None,
            },
        )
    })
    .unwrap();
    assert!(service.available_days("counselor-4", today()).unwrap().is_empty());

    db.with_connection(|conn| {
        AvailabilityRepository::upsert(
            conn,
            &AvailabilityRecord {
                counselor_id: "counselor-4".to_string(),
                meeting_duration: json!(30),
                buffer_time: json!(i64::MAX),
                weekly_schedule: json!({}),
                blocked_slots: json!([]),
                updated_at: None,
            },
        )
    })
    .unwrap();
    let days = service.available_days("counselor-4", today()).unwrap();
    assert_eq!(days.len(), 8);
    assert!(days.iter().all(|day| day.slots.len() == 1));
}

#[test]
fn reset_availability_restores_builtin_schedule() {
    let (db, service, _dir) = setup_test_env();

    let mut availability = CounselorAvailability::with_defaults("counselor-5");
    availability.meeting_duration = 45;
    service.save_availability(&availability).unwrap();
    assert_eq!(service.load_availability("counselor-5").unwrap().meeting_duration, 45);

    assert!(service.reset_availability("counselor-5").unwrap());
    assert!(!service.reset_availability("counselor-5").unwrap());
    assert_eq!(
        service.load_availability("counselor-5").unwrap(),
        CounselorAvailability::with_defaults("counselor-5")
    );

    let history = db.migration_history().unwrap();
    assert_eq!(history.iter().map(|info| info.version).collect::<Vec<_>>(), vec![1]);
}
