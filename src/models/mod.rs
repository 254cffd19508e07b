pub mod availability;
pub mod clock_time;
pub mod meeting;
pub mod settings;
pub mod slot;
