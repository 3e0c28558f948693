//! src/services/detection_log_service.rs
//!
//! DetectionLogService — the member's photo history. Every resolved
//! detection appends an entry; unlike favorites, duplicates are normal and
//! the listing is always newest first.

use crate::errors::ApiError;
use crate::models::detection_log::{DetectionLog, DetectionLogPageRes, DetectionLogRes};
use crate::services::medicine_service::{MedicineError, MedicineService};
use crate::services::{PAGE_SIZE, page_out_of_range, total_pages};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectionLogError {
    #[error("detection log does not exist")]
    NotExist,
    #[error("no permission for this detection log")]
    NoPermission,
    #[error("page is out of range")]
    PageOutOfRange,
    #[error(transparent)]
    Medicine(#[from] MedicineError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DetectionLogResult<T> = Result<T, DetectionLogError>;

impl From<DetectionLogError> for ApiError {
    fn from(err: DetectionLogError) -> Self {
        let message = err.to_string();
        match err {
            DetectionLogError::NotExist => {
                ApiError::new("DETECTION_LOG_NOT_EXIST", StatusCode::NOT_FOUND, message)
            }
            DetectionLogError::NoPermission => {
                ApiError::new("DETECTION_LOG_NO_PERMISSION", StatusCode::FORBIDDEN, message)
            }
            DetectionLogError::PageOutOfRange => {
                ApiError::new("PAGE_OUT_OF_RANGE", StatusCode::BAD_REQUEST, message)
            }
            DetectionLogError::Medicine(inner) => ApiError::from(inner),
            DetectionLogError::Sqlx(_) => ApiError::internal(message),
        }
    }
}

/// Detection log joined with its medicine for the history listing.
#[derive(FromRow)]
struct DetectionLogRow {
    id: i64,
    medicine_id: i64,
    medicine_name: String,
    medicine_company: String,
    medicine_image: String,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DetectionLogService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,

    /// Medicine lookups for existence checks on save.
    medicines: MedicineService,
}

impl DetectionLogService {
    pub fn new(db: Arc<SqlitePool>, medicines: MedicineService) -> Self {
        Self { db, medicines }
    }

    /// Append a history entry for this medicine.
    pub async fn save(&self, member_id: i64, medicine_id: i64) -> DetectionLogResult<()> {
        let medicine = self.medicines.get_by_id(medicine_id).await?;

        let now = Utc::now();
        sqlx::query(
            "INSERT INTO detection_logs (member_id, medicine_id, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(member_id)
        .bind(medicine.id)
        .bind(now)
        .bind(now)
        .execute(&*self.db)
        .await?;
        Ok(())
    }

    /// Fetch a detection log by row id.
    pub async fn get_by_id(&self, id: i64) -> DetectionLogResult<DetectionLog> {
        sqlx::query_as::<_, DetectionLog>(
            "SELECT id, member_id, medicine_id, created_at, updated_at
             FROM detection_logs WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => DetectionLogError::NotExist,
            other => DetectionLogError::Sqlx(other),
        })
    }

    /// Delete one history entry owned by the member.
    pub async fn delete(&self, member_id: i64, detection_log_id: i64) -> DetectionLogResult<()> {
        let log = self.get_by_id(detection_log_id).await?;

        if log.member_id != member_id {
            return Err(DetectionLogError::NoPermission);
        }

        sqlx::query("DELETE FROM detection_logs WHERE id = ?")
            .bind(log.id)
            .execute(&*self.db)
            .await?;
        Ok(())
    }

    /// Delete the member's whole history. NotExist when it was empty.
    pub async fn delete_all(&self, member_id: i64) -> DetectionLogResult<()> {
        let result = sqlx::query("DELETE FROM detection_logs WHERE member_id = ?")
            .bind(member_id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DetectionLogError::NotExist);
        }
        Ok(())
    }

    /// One page of the member's history, newest first.
    ///
    /// NotExist when the history is empty; PageOutOfRange outside
    /// 1..=totalPage.
    pub async fn page(&self, member_id: i64, page: i64) -> DetectionLogResult<DetectionLogPageRes> {
        let total = self.count(member_id).await?;
        if total == 0 {
            return Err(DetectionLogError::NotExist);
        }
        let total_page = total_pages(total);
        if page_out_of_range(page, total_page) {
            return Err(DetectionLogError::PageOutOfRange);
        }

        let rows = sqlx::query_as::<_, DetectionLogRow>(
            "SELECT d.id, d.medicine_id, m.name AS medicine_name,
                    m.company AS medicine_company, m.image AS medicine_image, d.created_at
             FROM detection_logs d
             JOIN medicines m ON m.id = d.medicine_id
             WHERE d.member_id = ?
             ORDER BY d.created_at DESC, d.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(member_id)
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(&*self.db)
        .await?;

        let detection_logs = rows
            .into_iter()
            .map(|row| DetectionLogRes {
                id: row.id,
                medicine_id: row.medicine_id,
                medicine_name: row.medicine_name,
                medicine_company: row.medicine_company,
                medicine_image: row.medicine_image,
                created_at: row.created_at.naive_utc(),
            })
            .collect();

        Ok(DetectionLogPageRes {
            member_id,
            total,
            page,
            last_page: page == total_page,
            detection_logs,
        })
    }

    /// Number of history entries the member has.
    pub async fn count(&self, member_id: i64) -> DetectionLogResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM detection_logs WHERE member_id = ?")
                .bind(member_id)
                .fetch_one(&*self.db)
                .await?;
        Ok(count)
    }
}
