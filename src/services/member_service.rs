//! src/services/member_service.rs
//!
//! MemberService — account rows behind OAuth2 sign-in. Sign-up happens
//! implicitly during the login callback; account removal is a soft delete
//! that also invalidates every session of the member.

use crate::errors::ApiError;
use crate::models::member::{Member, UserProfile};
use axum::http::StatusCode;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MemberError {
    #[error("member does not exist")]
    NotExist,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type MemberResult<T> = Result<T, MemberError>;

impl From<MemberError> for ApiError {
    fn from(err: MemberError) -> Self {
        let message = err.to_string();
        match err {
            MemberError::NotExist => {
                ApiError::new("MEMBER_NOT_EXIST", StatusCode::NOT_FOUND, message)
            }
            MemberError::Sqlx(_) => ApiError::internal(message),
        }
    }
}

/// Account lookups keyed on (email, deleted = false) so a deleted account
/// frees its email for a fresh sign-up.
#[derive(Clone)]
pub struct MemberService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl MemberService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Insert a member row for this profile unless an active member with the
    /// same email already exists. Called from the OAuth2 callback.
    pub async fn sign_up_if_absent(&self, profile: &UserProfile) -> MemberResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM members WHERE email = ? AND deleted = 0)",
        )
        .bind(&profile.email)
        .fetch_one(&*self.db)
        .await?;

        if exists {
            return Ok(());
        }

        let now = Utc::now();
        sqlx::query(
            "INSERT INTO members (name, email, picture, deleted, created_at, updated_at)
             VALUES (?, ?, ?, 0, ?, ?)",
        )
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.picture)
        .bind(now)
        .bind(now)
        .execute(&*self.db)
        .await?;

        info!("signed up new member {}", profile.email);
        Ok(())
    }

    /// Fetch the active member with this email.
    ///
    /// Returns NotExist when the email is unknown or the account is deleted.
    pub async fn find_active_by_email(&self, email: &str) -> MemberResult<Member> {
        sqlx::query_as::<_, Member>(
            "SELECT id, name, email, picture, deleted, created_at, updated_at
             FROM members WHERE email = ? AND deleted = 0",
        )
        .bind(email)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => MemberError::NotExist,
            other => MemberError::Sqlx(other),
        })
    }

    /// Fetch the active member with this id.
    pub async fn get_active(&self, id: i64) -> MemberResult<Member> {
        sqlx::query_as::<_, Member>(
            "SELECT id, name, email, picture, deleted, created_at, updated_at
             FROM members WHERE id = ? AND deleted = 0",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => MemberError::NotExist,
            other => MemberError::Sqlx(other),
        })
    }

    /// Soft-delete a member and drop all of their sessions.
    pub async fn delete(&self, member_id: i64) -> MemberResult<()> {
        let result =
            sqlx::query("UPDATE members SET deleted = 1, updated_at = ? WHERE id = ? AND deleted = 0")
                .bind(Utc::now())
                .bind(member_id)
                .execute(&*self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(MemberError::NotExist);
        }

        sqlx::query("DELETE FROM sessions WHERE member_id = ?")
            .bind(member_id)
            .execute(&*self.db)
            .await?;

        info!("soft-deleted member {}", member_id);
        Ok(())
    }
}
