//! Represents a server-side login session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A login session created after a successful OAuth2 callback.
///
/// The id is an unguessable UUIDv4 string handed to the client in the
/// `yacsa_session` cookie. Sessions are removed on logout and when the
/// member deletes their account.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Session {
    /// Session id (UUIDv4 string).
    pub id: String,

    /// Logged-in member.
    pub member_id: i64,

    /// When the session was created.
    pub created_at: DateTime<Utc>,
}
