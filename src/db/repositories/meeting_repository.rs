use std::convert::TryFrom;

use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::meeting::{MeetingInsert, MeetingRecord, MeetingStatus};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        counselor_id,
        student_id,
        date,
        time,
        start_minute,
        end_minute,
        status,
        meeting_type,
        topic,
        created_at,
        updated_at
    FROM meetings
"#;

#[derive(Debug, Clone)]
pub struct MeetingRow {
    pub id: String,
    pub counselor_id: String,
    pub student_id: Option<String>,
    pub date: String,
    pub time: String,
    pub start_minute: Option<i64>,
    pub end_minute: Option<i64>,
    pub status: String,
    pub meeting_type: Option<String>,
    pub topic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MeetingRow {
    pub fn into_record(self) -> AppResult<MeetingRecord> {
        let status = MeetingStatus::try_from(self.status.as_str()).map_err(AppError::validation)?;

        Ok(MeetingRecord {
            id: self.id,
            counselor_id: self.counselor_id,
            student_id: self.student_id,
            date: self.date,
            time: self.time,
            start_minute: self.start_minute,
            end_minute: self.end_minute,
            status,
            meeting_type: self.meeting_type,
            topic: self.topic,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TryFrom<&Row<'_>> for MeetingRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            counselor_id: row.get("counselor_id")?,
            student_id: row.get("student_id")?,
            date: row.get("date")?,
            time: row.get("time")?,
            start_minute: row.get("start_minute")?,
            end_minute: row.get("end_minute")?,
            status: row.get("status")?,
            meeting_type: row.get("meeting_type")?,
            topic: row.get("topic")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct MeetingRepository;

impl MeetingRepository {
    pub fn insert(conn: &Connection, insert: &MeetingInsert) -> AppResult<MeetingRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO meetings (
                    id,
                    counselor_id,
                    student_id,
                    date,
                    time,
                    start_minute,
                    end_minute,
                    status,
                    meeting_type,
                    topic,
                    created_at,
                    updated_at
                ) VALUES (
                    :id,
                    :counselor_id,
                    :student_id,
                    :date,
                    :time,
                    :start_minute,
                    :end_minute,
                    :status,
                    :meeting_type,
                    :topic,
                    :created_at,
                    :updated_at
                )
            "#,
            named_params! {
                ":id": &id,
                ":counselor_id": &insert.counselor_id,
                ":student_id": &insert.student_id,
                ":date": &insert.date,
                ":time": &insert.time,
                ":start_minute": &insert.start_minute,
                ":end_minute": &insert.end_minute,
                ":status": insert.status.as_str(),
                ":meeting_type": &insert.meeting_type,
                ":topic": &insert.topic,
                ":created_at": &now,
                ":updated_at": &now,
            },
        )?;

        Self::find_by_id(conn, &id)
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<MeetingRecord> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = :id");
        let mut stmt = conn.prepare(&sql)?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| MeetingRow::try_from(row))
            .optional()?;

        match row {
            Some(row) => row.into_record(),
            None => Err(AppError::not_found()),
        }
    }

    /// Pending and confirmed meetings for one counselor, oldest first.
    pub fn list_active_for_counselor(
        conn: &Connection,
        counselor_id: &str,
    ) -> AppResult<Vec<MeetingRecord>> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE counselor_id = :counselor_id \
             AND status IN ('pending', 'confirmed') ORDER BY created_at ASC, id ASC"
        );
        Self::query_records(conn, &sql, named_params! {":counselor_id": counselor_id})
    }

    pub fn list_for_student(conn: &Connection, student_id: &str) -> AppResult<Vec<MeetingRecord>> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE student_id = :student_id ORDER BY created_at DESC, id ASC"
        );
        Self::query_records(conn, &sql, named_params! {":student_id": student_id})
    }

    pub fn update_status(conn: &Connection, id: &str, status: MeetingStatus) -> AppResult<()> {
        let affected = conn.execute(
            r#"
                UPDATE meetings SET
                    status = :status,
                    updated_at = :updated_at
                WHERE id = :id
            "#,
            named_params! {
                ":id": id,
                ":status": status.as_str(),
                ":updated_at": Utc::now().to_rfc3339(),
            },
        )?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }

    fn query_records(
        conn: &Connection,
        sql: &str,
        params: &[(&str, &dyn rusqlite::ToSql)],
    ) -> AppResult<Vec<MeetingRecord>> {
        let mut stmt = conn.prepare(sql)?;
        let records = stmt
            .query_map(params, |row| MeetingRow::try_from(row))?
            .map(|row| row.map_err(AppError::from).and_then(MeetingRow::into_record))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(records)
    }
}
