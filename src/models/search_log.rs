//! Represents a member's recent search keywords.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recent-search entry. Each member keeps at most ten; recording an
/// eleventh evicts the oldest.
///
/// `created_at` is stored as the exact second-precision text shown to the
/// client (`2023-04-02T17:25:44`), because deleting a single entry matches
/// on the echoed (name, createdAt) pair.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct SearchLog {
    /// Row id. Insertion order doubles as recency order.
    pub id: i64,

    /// Owning member.
    pub member_id: i64,

    /// The search keyword.
    pub name: String,

    /// Second-precision creation timestamp text.
    pub created_at: String,
}

/// One recent-search entry as served to clients.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogRes {
    pub name: String,
    pub created_at: String,
}
