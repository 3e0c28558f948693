//! Represents one entry in a member's photo detection history.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A detection log row: the member photographed a pill and this medicine
/// came back. Unlike favorites, duplicates are expected.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct DetectionLog {
    /// Row id.
    pub id: i64,

    /// Member whose camera produced the hit.
    pub member_id: i64,

    /// Detected medicine.
    pub medicine_id: i64,

    /// When the detection happened.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// One detection log joined with its medicine, as listed on the history page.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionLogRes {
    pub id: i64,
    pub medicine_id: i64,
    pub medicine_name: String,
    pub medicine_company: String,
    pub medicine_image: String,
    pub created_at: NaiveDateTime,
}

/// A page of detection logs, newest first.
///
/// Carries no `totalPage` field; the history screen only needs `lastPage`
/// to know when to stop loading.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionLogPageRes {
    pub member_id: i64,
    pub total: i64,
    pub page: i64,
    pub last_page: bool,
    pub detection_logs: Vec<DetectionLogRes>,
}
