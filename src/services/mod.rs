pub mod availability_normalizer;
pub mod booking_service;
pub mod busy_interval_service;
pub mod schedule_utils;
pub mod settings_service;
pub mod slot_formatter;
pub mod slot_generator;
