//! src/services/search_service.rs
//!
//! SearchService — medicine name search with 1-based paging, related-name
//! suggestions, and the per-member recent-search log. The log is a capped
//! list: ten entries per member, newest first, oldest evicted.

use crate::errors::ApiError;
use crate::models::medicine::{MedicineSearchPageRes, MedicineSearchRes};
use crate::models::search_log::{SearchLog, SearchLogRes};
use crate::services::{PAGE_SIZE, page_out_of_range, total_pages};
use axum::http::StatusCode;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Maximum related-name suggestions per query.
const KEYWORD_SIZE: i64 = 10;

/// Recent-search entries kept per member.
const RECENT_KEYWORD_SIZE: i64 = 10;

/// Stored (and echoed) timestamp format of a search log entry.
const SEARCH_LOG_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search keyword is empty")]
    EmptyKeyword,
    #[error("no medicine matched the keyword")]
    NoResult,
    #[error("page is out of range")]
    PageOutOfRange,
    #[error("search log does not exist")]
    LogNotExist,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type SearchResult<T> = Result<T, SearchError>;

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        let message = err.to_string();
        match err {
            SearchError::EmptyKeyword => {
                ApiError::new("KEYWORD_NOT_EXIST", StatusCode::BAD_REQUEST, message)
            }
            SearchError::NoResult => {
                ApiError::new("SEARCH_RESULT_NOT_EXIST", StatusCode::NOT_FOUND, message)
            }
            SearchError::PageOutOfRange => {
                ApiError::new("PAGE_OUT_OF_RANGE", StatusCode::BAD_REQUEST, message)
            }
            SearchError::LogNotExist => {
                ApiError::new("SEARCH_LOG_NOT_EXIST", StatusCode::NOT_FOUND, message)
            }
            SearchError::Sqlx(_) => ApiError::internal(message),
        }
    }
}

#[derive(Clone)]
pub struct SearchService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl SearchService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// One page of medicines whose name contains `keyword`, ordered by name.
    ///
    /// Each row carries `is_favorite` for the requesting member. A
    /// successful search is recorded in the member's recent-search log.
    pub async fn search_page(
        &self,
        member_id: i64,
        keyword: &str,
        page: i64,
    ) -> SearchResult<MedicineSearchPageRes> {
        if keyword.is_empty() {
            return Err(SearchError::EmptyKeyword);
        }

        let pattern = format!("%{}%", escape_like(keyword));
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM medicines WHERE name LIKE ? ESCAPE '\\'",
        )
        .bind(&pattern)
        .fetch_one(&*self.db)
        .await?;

        if total == 0 {
            return Err(SearchError::NoResult);
        }
        let total_page = total_pages(total);
        if page_out_of_range(page, total_page) {
            return Err(SearchError::PageOutOfRange);
        }

        let rows = sqlx::query_as::<_, MedicineSearchRes>(
            "SELECT m.id, m.name, m.company, m.image,
                    EXISTS(SELECT 1 FROM favorites f
                           WHERE f.member_id = ? AND f.medicine_id = m.id) AS is_favorite
             FROM medicines m
             WHERE m.name LIKE ? ESCAPE '\\'
             ORDER BY m.name ASC, m.id ASC
             LIMIT ? OFFSET ?",
        )
        .bind(member_id)
        .bind(&pattern)
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(&*self.db)
        .await?;

        self.record_log(member_id, keyword).await?;

        Ok(MedicineSearchPageRes {
            total,
            total_page,
            page,
            last_page: page == total_page,
            medicine_search_list: rows,
        })
    }

    /// Up to ten medicine names matching `keyword`, for the search box
    /// suggestion scroller.
    pub async fn related_names(&self, keyword: &str) -> SearchResult<Vec<String>> {
        if keyword.is_empty() {
            return Err(SearchError::EmptyKeyword);
        }

        let pattern = format!("%{}%", escape_like(keyword));
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM medicines WHERE name LIKE ? ESCAPE '\\'
             ORDER BY name ASC LIMIT ?",
        )
        .bind(&pattern)
        .bind(KEYWORD_SIZE)
        .fetch_all(&*self.db)
        .await?;

        Ok(names)
    }

    /// The member's recent searches, newest first.
    pub async fn recent_logs(&self, member_id: i64) -> SearchResult<Vec<SearchLogRes>> {
        let logs = sqlx::query_as::<_, SearchLogRes>(
            "SELECT name, created_at FROM search_logs
             WHERE member_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(member_id)
        .bind(RECENT_KEYWORD_SIZE)
        .fetch_all(&*self.db)
        .await?;

        Ok(logs)
    }

    /// Delete the single entry matching (name, created_at) as echoed by the
    /// client. Returns LogNotExist when nothing matched.
    pub async fn delete_log(
        &self,
        member_id: i64,
        name: &str,
        created_at: &str,
    ) -> SearchResult<()> {
        let log = sqlx::query_as::<_, SearchLog>(
            "SELECT id, member_id, name, created_at FROM search_logs
             WHERE member_id = ? AND name = ? AND created_at = ?
             LIMIT 1",
        )
        .bind(member_id)
        .bind(name)
        .bind(created_at)
        .fetch_optional(&*self.db)
        .await?
        .ok_or(SearchError::LogNotExist)?;

        sqlx::query("DELETE FROM search_logs WHERE id = ?")
            .bind(log.id)
            .execute(&*self.db)
            .await?;

        Ok(())
    }

    /// Delete the member's whole recent-search list. Returns LogNotExist
    /// when it was already empty.
    pub async fn delete_all_logs(&self, member_id: i64) -> SearchResult<()> {
        let result = sqlx::query("DELETE FROM search_logs WHERE member_id = ?")
            .bind(member_id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SearchError::LogNotExist);
        }
        Ok(())
    }

    /// Append a keyword to the recent-search list, evicting the oldest
    /// entries once the cap is reached.
    async fn record_log(&self, member_id: i64, name: &str) -> SearchResult<()> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM search_logs WHERE member_id = ?")
                .bind(member_id)
                .fetch_one(&*self.db)
                .await?;

        if count >= RECENT_KEYWORD_SIZE {
            let excess = count - RECENT_KEYWORD_SIZE + 1;
            sqlx::query(
                "DELETE FROM search_logs WHERE id IN (
                     SELECT id FROM search_logs WHERE member_id = ?
                     ORDER BY id ASC LIMIT ?
                 )",
            )
            .bind(member_id)
            .bind(excess)
            .execute(&*self.db)
            .await?;
            debug!("evicted {} search log entries for member {}", excess, member_id);
        }

        let created_at = Utc::now().format(SEARCH_LOG_TIME_FORMAT).to_string();
        sqlx::query("INSERT INTO search_logs (member_id, name, created_at) VALUES (?, ?, ?)")
            .bind(member_id)
            .bind(name)
            .bind(created_at)
            .execute(&*self.db)
            .await?;

        Ok(())
    }
}

/// Escape LIKE wildcards so a keyword matches literally.
fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
