//! Represents a member's favorited medicine.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// A favorite row linking a member to a medicine.
///
/// At most one favorite may exist per (member, medicine) pair; the table
/// enforces it with a unique index.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Favorite {
    /// Row id.
    pub id: i64,

    /// Owning member.
    pub member_id: i64,

    /// Favorited medicine.
    pub medicine_id: i64,

    /// When the favorite was added.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Raw favorite identifiers, served by `GET /favorites/id/{id}`.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDto {
    pub id: i64,
    pub member_id: i64,
    pub medicine_id: i64,
}

/// One favorite joined with its medicine, as listed on the favorites page.
///
/// `is_favorite` is always true here; clients reuse the same card component
/// for search results where the flag varies.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRes {
    pub id: i64,
    pub medicine_id: i64,
    pub medicine_name: String,
    pub medicine_company: String,
    pub medicine_image: String,
    pub created_at: NaiveDateTime,
    pub is_favorite: bool,
}

/// A page of favorites with 1-based paging metadata.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePageRes {
    pub member_id: i64,
    pub total: i64,
    pub total_page: i64,
    pub page: i64,
    pub last_page: bool,
    pub favorites: Vec<FavoriteRes>,
}

/// Ordering of the favorites page by creation time.
///
/// The wire values are the `?sort=` query forms `asc` / `desc`; newest
/// first is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// SQL keyword for an ORDER BY clause.
    pub fn order_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            _ => Err(()),
        }
    }
}
