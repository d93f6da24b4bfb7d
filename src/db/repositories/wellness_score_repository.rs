use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::wellness::{WellnessGrade, WellnessResult, WellnessScoreRecord, WellnessStatus};

#[derive(Debug, Clone)]
pub struct WellnessScoreRow {
    pub id: i64,
    pub user_id: String,
    pub calculated_at: String,
    pub total_score: i64,
    pub status: String,
    pub grade: String,
    pub payload: String,
}

impl WellnessScoreRow {
    pub fn from_result(user_id: &str, result: &WellnessResult) -> AppResult<Self> {
        Ok(Self {
            id: 0,
            user_id: user_id.to_string(),
            calculated_at: result.timestamp.clone(),
            total_score: i64::from(result.total_score),
            status: result.status.as_str().to_string(),
            grade: result.grade.as_str().to_string(),
            payload: serde_json::to_string(result)?,
        })
    }

    pub fn into_record(self) -> AppResult<WellnessScoreRecord> {
        let status = WellnessStatus::try_from(self.status.as_str()).map_err(AppError::validation)?;
        let grade = WellnessGrade::try_from(self.grade.as_str()).map_err(AppError::validation)?;
        let total_score = u8::try_from(self.total_score)
            .map_err(|_| AppError::validation(format!("stored score out of range: {}", self.total_score)))?;
        let result: WellnessResult = serde_json::from_str(&self.payload)?;

        Ok(WellnessScoreRecord {
            id: self.id,
            user_id: self.user_id,
            calculated_at: self.calculated_at,
            total_score,
            status,
            grade,
            result,
        })
    }
}

impl TryFrom<&Row<'_>> for WellnessScoreRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            calculated_at: row.get("calculated_at")?,
            total_score: row.get("total_score")?,
            status: row.get("status")?,
            grade: row.get("grade")?,
            payload: row.get("payload")?,
        })
    }
}

pub struct WellnessScoreRepository;

impl WellnessScoreRepository {
    pub fn insert(conn: &Connection, user_id: &str, result: &WellnessResult) -> AppResult<i64> {
        let row = WellnessScoreRow::from_result(user_id, result)?;

        conn.execute(
            r#"
                INSERT INTO wellness_scores (
                    user_id,
                    calculated_at,
                    total_score,
                    status,
                    grade,
                    payload
                ) VALUES (
                    :user_id,
                    :calculated_at,
                    :total_score,
                    :status,
                    :grade,
                    :payload
                )
            "#,
            named_params! {
                ":user_id": &row.user_id,
                ":calculated_at": &row.calculated_at,
                ":total_score": &row.total_score,
                ":status": &row.status,
                ":grade": &row.grade,
                ":payload": &row.payload,
            },
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn find_latest(conn: &Connection, user_id: &str) -> AppResult<Option<WellnessScoreRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, user_id, calculated_at, total_score, status, grade, payload
                FROM wellness_scores
                WHERE user_id = :user_id
                ORDER BY calculated_at DESC, id DESC
                LIMIT 1
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":user_id": user_id}, |row| {
                WellnessScoreRow::try_from(row)
            })
            .optional()?;

        row.map(|row| row.into_record()).transpose()
    }

    /// Newest first.
    pub fn list_recent(
        conn: &Connection,
        user_id: &str,
        limit: usize,
    ) -> AppResult<Vec<WellnessScoreRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, user_id, calculated_at, total_score, status, grade, payload
                FROM wellness_scores
                WHERE user_id = :user_id
                ORDER BY calculated_at DESC, id DESC
                LIMIT :limit
            "#,
        )?;

        let records = stmt
            .query_map(
                named_params! {":user_id": user_id, ":limit": limit as i64},
                |row| WellnessScoreRow::try_from(row),
            )?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(records)
    }

    pub fn delete_for_user(conn: &Connection, user_id: &str) -> AppResult<usize> {
        let deleted = conn.execute(
            "DELETE FROM wellness_scores WHERE user_id = :user_id",
            named_params! {":user_id": user_id},
        )?;

        Ok(deleted)
    }

    /// `cutoff` is an RFC 3339 timestamp; rows calculated strictly before it are removed.
    pub fn delete_before(conn: &Connection, cutoff: &str) -> AppResult<usize> {
        let deleted = conn.execute(
            "DELETE FROM wellness_scores WHERE calculated_at < :cutoff",
            named_params! {":cutoff": cutoff},
        )?;

        Ok(deleted)
    }
}
