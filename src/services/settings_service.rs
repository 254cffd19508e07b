use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::json;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::settings::BookingSettings;

/// Loads booking settings from a YAML file and caches them.
///
/// A missing file is not an error; every field has a built-in default.
pub struct SettingsService {
    path: PathBuf,
    cache: RwLock<Option<BookingSettings>>,
}

impl SettingsService {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> AppResult<BookingSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }
        self.reload()
    }

    pub fn reload(&self) -> AppResult<BookingSettings> {
        let settings = load_settings(&self.path)?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }
}

pub fn load_settings(path: &Path) -> AppResult<BookingSettings> {
    if !path.exists() {
        debug!(target: "app::settings", path = %path.display(), "settings file missing, using defaults");
        return Ok(BookingSettings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings = parse_settings(&raw)?;
    info!(target: "app::settings", path = %path.display(), "settings loaded");
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> AppResult<BookingSettings> {
    if raw.trim().is_empty() {
        return Ok(BookingSettings::default());
    }
    let settings: BookingSettings = serde_yaml::from_str(raw)?;
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn validate_settings(settings: &BookingSettings) -> AppResult<()> {
    let generation = &settings.generation;
    if generation.horizon_days == 0 || generation.max_days == 0 {
        return Err(AppError::validation_with_details(
            "slot horizon must cover at least one day",
            json!({"horizonDays": generation.horizon_days, "maxDays": generation.max_days}),
        ));
    }
    if generation.min_duration_minutes < 1 || generation.min_step_minutes < 1 {
        return Err(AppError::validation_with_details(
            "minimum duration and step must be positive",
            json!({
                "minDurationMinutes": generation.min_duration_minutes,
                "minStepMinutes": generation.min_step_minutes,
            }),
        ));
    }
    if settings.log_file_prefix.trim().is_empty() {
        return Err(AppError::validation("log file prefix must not be empty"));
    }
    Ok(())
}
