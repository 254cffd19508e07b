use serde::{Deserialize, Serialize};

pub const DEFAULT_HORIZON_DAYS: u32 = 21;
pub const DEFAULT_MAX_DAYS: usize = 8;
pub const DEFAULT_MIN_DURATION_MINUTES: i64 = 15;
pub const DEFAULT_MIN_STEP_MINUTES: i64 = 15;
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,app::booking=debug,app::slots=info,app::db=info";
pub const DEFAULT_LOG_FILE_PREFIX: &str = "counsel-booking.log";

/// Policy knobs for the rolling slot horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotGenerationConfig {
    /// Days after today that are scanned (today itself is never offered).
    pub horizon_days: u32,
    /// Scanning stops once this many days with slots were collected.
    pub max_days: usize,
    pub min_duration_minutes: i64,
    pub min_step_minutes: i64,
}

impl Default for SlotGenerationConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_days: DEFAULT_MAX_DAYS,
            min_duration_minutes: DEFAULT_MIN_DURATION_MINUTES,
            min_step_minutes: DEFAULT_MIN_STEP_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingSettings {
    pub generation: SlotGenerationConfig,
    pub log_directives: String,
    pub log_file_prefix: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            generation: SlotGenerationConfig::default(),
            log_directives: DEFAULT_LOG_DIRECTIVES.to_string(),
            log_file_prefix: DEFAULT_LOG_FILE_PREFIX.to_string(),
        }
    }
}
