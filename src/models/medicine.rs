//! Represents a medicine product and its client-facing projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A medicine row as stored in SQLite.
///
/// `ingredient` keeps the raw `|`-separated string from the drug registry;
/// it is split into a list only when building a [`MedicineRes`]. The
/// `effect` / `usages` / `precautions` columns hold the last known leaflet
/// text and serve as a fallback when the leaflet host cannot be reached.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Medicine {
    /// Row id.
    pub id: i64,

    /// Registry product code. Unique.
    pub code: String,

    /// Product name.
    pub name: String,

    /// Manufacturing company.
    pub company: String,

    /// `|`-separated ingredient names.
    pub ingredient: String,

    /// Product image URL.
    pub image: String,

    /// Stored effect text (leaflet fallback).
    pub effect: String,

    /// Stored usage text (leaflet fallback).
    pub usages: String,

    /// Stored precaution text (leaflet fallback).
    pub precautions: String,

    /// When this row was imported.
    pub created_at: DateTime<Utc>,

    /// Last import/update time.
    pub updated_at: DateTime<Utc>,
}

/// Full medicine detail served to clients.
///
/// `effect` / `usages` / `precautions` carry leaflet HTML fetched live from
/// the registry host; `is_favorite` reflects the requesting member.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRes {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub company: String,
    pub ingredient: Vec<String>,
    pub image: String,
    pub effect: String,
    pub usages: String,
    pub precautions: String,
    pub is_favorite: bool,
}

/// One row of a medicine search result page.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicineSearchRes {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub image: String,
    pub is_favorite: bool,
}

/// A page of search results with 1-based paging metadata.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicineSearchPageRes {
    pub total: i64,
    pub total_page: i64,
    pub page: i64,
    pub last_page: bool,
    pub medicine_search_list: Vec<MedicineSearchRes>,
}
