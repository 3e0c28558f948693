//! src/services/favorite_service.rs
//!
//! FavoriteService — the member's saved-medicines drawer. One favorite per
//! (member, medicine) pair; listings join the medicine row and page six at
//! a time, sorted by creation time in either direction.

use crate::errors::ApiError;
use crate::models::favorite::{Favorite, FavoriteDto, FavoritePageRes, FavoriteRes, SortDirection};
use crate::services::medicine_service::{MedicineError, MedicineService};
use crate::services::{PAGE_SIZE, page_out_of_range, total_pages};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("favorite already exists")]
    AlreadyExists,
    #[error("favorite does not exist")]
    NotExist,
    #[error("no permission for this favorite")]
    NoPermission,
    #[error("page is out of range")]
    PageOutOfRange,
    #[error(transparent)]
    Medicine(#[from] MedicineError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type FavoriteResult<T> = Result<T, FavoriteError>;

impl From<FavoriteError> for ApiError {
    fn from(err: FavoriteError) -> Self {
        let message = err.to_string();
        match err {
            FavoriteError::AlreadyExists => {
                ApiError::new("FAVORITE_ALREADY_EXIST", StatusCode::CONFLICT, message)
            }
            FavoriteError::NotExist => {
                ApiError::new("FAVORITE_NOT_EXIST", StatusCode::NOT_FOUND, message)
            }
            FavoriteError::NoPermission => {
                ApiError::new("FAVORITE_NO_PERMISSION", StatusCode::FORBIDDEN, message)
            }
            FavoriteError::PageOutOfRange => {
                ApiError::new("PAGE_OUT_OF_RANGE", StatusCode::BAD_REQUEST, message)
            }
            FavoriteError::Medicine(inner) => ApiError::from(inner),
            FavoriteError::Sqlx(_) => ApiError::internal(message),
        }
    }
}

/// Favorite joined with its medicine for the drawer listing.
#[derive(FromRow)]
struct FavoriteRow {
    id: i64,
    medicine_id: i64,
    medicine_name: String,
    medicine_company: String,
    medicine_image: String,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct FavoriteService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,

    /// Medicine lookups for existence checks on save.
    medicines: MedicineService,
}

impl FavoriteService {
    pub fn new(db: Arc<SqlitePool>, medicines: MedicineService) -> Self {
        Self { db, medicines }
    }

    /// Add a medicine to the member's favorites.
    ///
    /// The medicine must exist; a second save of the same medicine returns
    /// AlreadyExists (the unique index catches races the same way).
    pub async fn save(&self, member_id: i64, medicine_id: i64) -> FavoriteResult<()> {
        let medicine = self.medicines.get_by_id(medicine_id).await?;

        if self.exists(member_id, medicine.id).await? {
            return Err(FavoriteError::AlreadyExists);
        }

        let now = Utc::now();
        match sqlx::query(
            "INSERT INTO favorites (member_id, medicine_id, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(member_id)
        .bind(medicine.id)
        .bind(now)
        .bind(now)
        .execute(&*self.db)
        .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(FavoriteError::AlreadyExists),
            Err(err) => Err(FavoriteError::Sqlx(err)),
        }
    }

    /// Whether the member already favorited this medicine.
    pub async fn exists(&self, member_id: i64, medicine_id: i64) -> FavoriteResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE member_id = ? AND medicine_id = ?)",
        )
        .bind(member_id)
        .bind(medicine_id)
        .fetch_one(&*self.db)
        .await?;
        Ok(exists)
    }

    /// Fetch the raw identifiers of a favorite by row id.
    pub async fn get_dto(&self, id: i64) -> FavoriteResult<FavoriteDto> {
        sqlx::query_as::<_, FavoriteDto>(
            "SELECT id, member_id, medicine_id FROM favorites WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => FavoriteError::NotExist,
            other => FavoriteError::Sqlx(other),
        })
    }

    /// One page of the member's favorites joined with their medicines.
    ///
    /// NotExist when the member has no favorites at all; PageOutOfRange
    /// outside 1..=totalPage.
    pub async fn page(
        &self,
        member_id: i64,
        page: i64,
        sort: SortDirection,
    ) -> FavoriteResult<FavoritePageRes> {
        let total = self.count(member_id).await?;
        if total == 0 {
            return Err(FavoriteError::NotExist);
        }
        let total_page = total_pages(total);
        if page_out_of_range(page, total_page) {
            return Err(FavoriteError::PageOutOfRange);
        }

        let order = sort.order_sql();
        let sql = format!(
            "SELECT f.id, f.medicine_id, m.name AS medicine_name,
                    m.company AS medicine_company, m.image AS medicine_image, f.created_at
             FROM favorites f
             JOIN medicines m ON m.id = f.medicine_id
             WHERE f.member_id = ?
             ORDER BY f.created_at {order}, f.id {order}
             LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, FavoriteRow>(&sql)
            .bind(member_id)
            .bind(PAGE_SIZE)
            .bind((page - 1) * PAGE_SIZE)
            .fetch_all(&*self.db)
            .await?;

        let favorites = rows
            .into_iter()
            .map(|row| FavoriteRes {
                id: row.id,
                medicine_id: row.medicine_id,
                medicine_name: row.medicine_name,
                medicine_company: row.medicine_company,
                medicine_image: row.medicine_image,
                created_at: row.created_at.naive_utc(),
                is_favorite: true,
            })
            .collect();

        Ok(FavoritePageRes {
            member_id,
            total,
            total_page,
            page,
            last_page: page == total_page,
            favorites,
        })
    }

    /// Delete one favorite owned by the member.
    ///
    /// NotExist when the row is missing; NoPermission when it belongs to
    /// someone else.
    pub async fn delete(&self, member_id: i64, favorite_id: i64) -> FavoriteResult<()> {
        let favorite = sqlx::query_as::<_, Favorite>(
            "SELECT id, member_id, medicine_id, created_at, updated_at
             FROM favorites WHERE id = ?",
        )
        .bind(favorite_id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => FavoriteError::NotExist,
            other => FavoriteError::Sqlx(other),
        })?;

        if favorite.member_id != member_id {
            return Err(FavoriteError::NoPermission);
        }

        sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(favorite.id)
            .execute(&*self.db)
            .await?;
        Ok(())
    }

    /// Delete every favorite of the member. NotExist when there were none.
    pub async fn delete_all(&self, member_id: i64) -> FavoriteResult<()> {
        let result = sqlx::query("DELETE FROM favorites WHERE member_id = ?")
            .bind(member_id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(FavoriteError::NotExist);
        }
        Ok(())
    }

    /// Number of favorites the member has.
    pub async fn count(&self, member_id: i64) -> FavoriteResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM favorites WHERE member_id = ?")
                .bind(member_id)
                .fetch_one(&*self.db)
                .await?;
        Ok(count)
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}
