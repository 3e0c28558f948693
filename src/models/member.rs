//! Represents a registered member and the my-page projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A member account created through OAuth2 sign-in.
///
/// Accounts are soft-deleted: `deleted` flips to true and the row stays.
/// A member who deleted their account can register again with the same
/// email, so lookups always filter on `deleted = 0`.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Member {
    /// Row id.
    pub id: i64,

    /// Display name from the OAuth2 userinfo response.
    pub name: String,

    /// Login email. Unique among non-deleted members only.
    pub email: String,

    /// Profile picture URL (empty when the provider sends none).
    pub picture: String,

    /// Soft-delete flag.
    pub deleted: bool,

    /// When this account was created.
    pub created_at: DateTime<Utc>,

    /// Last modification time (bumped on soft delete).
    pub updated_at: DateTime<Utc>,
}

/// Userinfo attributes pulled from the OAuth2 provider during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub picture: String,
}

/// Data for the my-page screen: member name plus per-member counters.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MyPageRes {
    pub member_name: String,
    pub detection_log_count: i64,
    pub favorite_count: i64,
}
