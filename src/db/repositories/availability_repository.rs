use std::convert::TryFrom;

use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{named_params, Connection, OptionalExtension, Row};
use serde_json::{json, Value as JsonValue};

use crate::error::AppResult;
use crate::models::availability::AvailabilityRecord;

#[derive(Debug, Clone)]
pub struct AvailabilityRow {
    pub counselor_id: String,
    pub meeting_duration: SqlValue,
    pub buffer_time: SqlValue,
    pub weekly_schedule: SqlValue,
    pub blocked_slots: SqlValue,
    pub updated_at: Option<String>,
}

impl AvailabilityRow {
    /// Columns are handed to the normalizer untouched: text stays text, so a
    /// JSON document stored as text is decoded there, not here.
    pub fn into_record(self) -> AvailabilityRecord {
        AvailabilityRecord {
            counselor_id: self.counselor_id,
            meeting_duration: sql_to_json(self.meeting_duration),
            buffer_time: sql_to_json(self.buffer_time),
            weekly_schedule: sql_to_json(self.weekly_schedule),
            blocked_slots: sql_to_json(self.blocked_slots),
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for AvailabilityRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            counselor_id: row.get("counselor_id")?,
            meeting_duration: row.get("meeting_duration")?,
            buffer_time: row.get("buffer_time")?,
            weekly_schedule: row.get("weekly_schedule")?,
            blocked_slots: row.get("blocked_slots")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct AvailabilityRepository;

impl AvailabilityRepository {
    pub fn find_by_counselor(
        conn: &Connection,
        counselor_id: &str,
    ) -> AppResult<Option<AvailabilityRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    counselor_id,
                    meeting_duration,
                    buffer_time,
                    weekly_schedule,
                    blocked_slots,
                    updated_at
                FROM counselor_availability
                WHERE counselor_id = :counselor_id
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":counselor_id": counselor_id}, |row| {
                AvailabilityRow::try_from(row)
            })
            .optional()?;

        Ok(row.map(AvailabilityRow::into_record))
    }

    pub fn upsert(conn: &Connection, record: &AvailabilityRecord) -> AppResult<()> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
                INSERT INTO counselor_availability (
                    counselor_id,
                    meeting_duration,
                    buffer_time,
                    weekly_schedule,
                    blocked_slots,
                    updated_at
                ) VALUES (
                    :counselor_id,
                    :meeting_duration,
                    :buffer_time,
                    :weekly_schedule,
                    :blocked_slots,
                    :updated_at
                )
                ON CONFLICT(counselor_id) DO UPDATE SET
                    meeting_duration = excluded.meeting_duration,
                    buffer_time = excluded.buffer_time,
                    weekly_schedule = excluded.weekly_schedule,
                    blocked_slots = excluded.blocked_slots,
                    updated_at = excluded.updated_at
            "#,
            named_params! {
                ":counselor_id": &record.counselor_id,
                ":meeting_duration": scalar_to_sql(&record.meeting_duration),
                ":buffer_time": scalar_to_sql(&record.buffer_time),
                ":weekly_schedule": document_to_sql(&record.weekly_schedule)?,
                ":blocked_slots": document_to_sql(&record.blocked_slots)?,
                ":updated_at": &now,
            },
        )?;

        Ok(())
    }

    pub fn delete(conn: &Connection, counselor_id: &str) -> AppResult<bool> {
        let affected = conn.execute(
            "DELETE FROM counselor_availability WHERE counselor_id = :counselor_id",
            named_params! {":counselor_id": counselor_id},
        )?;
        Ok(affected > 0)
    }
}

fn sql_to_json(value: SqlValue) -> JsonValue {
    match value {
        SqlValue::Null | SqlValue::Blob(_) => JsonValue::Null,
        SqlValue::Integer(number) => json!(number),
        SqlValue::Real(number) => json!(number),
        SqlValue::Text(text) => JsonValue::String(text),
    }
}

fn scalar_to_sql(value: &JsonValue) -> SqlValue {
    match value {
        JsonValue::Number(number) => number
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| number.as_f64().map(SqlValue::Real))
            .unwrap_or(SqlValue::Null),
        JsonValue::String(text) => SqlValue::Text(text.clone()),
        JsonValue::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => SqlValue::Null,
    }
}

fn document_to_sql(value: &JsonValue) -> AppResult<SqlValue> {
    Ok(match value {
        JsonValue::Null => SqlValue::Null,
        JsonValue::String(text) => SqlValue::Text(text.clone()),
        other => SqlValue::Text(serde_json::to_string(other)?),
    })
}
