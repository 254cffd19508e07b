pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, AppResult};
pub use models::availability::{CounselorAvailability, ScheduleDay, WeeklySchedule};
pub use models::clock_time::ClockTime;
pub use models::slot::{AvailableDay, AvailableSlot};
pub use services::availability_normalizer::normalize_availability;
pub use services::busy_interval_service::extract_busy_intervals;
pub use services::slot_generator::{generate_available_days, SlotGenerator};
