//! HTTP handlers for the member's photo detection history.

use crate::{
    errors::{ApiError, CommonResponse},
    handlers::auth_handlers::CurrentMember,
    models::detection_log::DetectionLogPageRes,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

/// Query params of the save endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDetectionLogQuery {
    pub medicine_id: Option<i64>,
}

/// Query params of the single delete.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDetectionLogQuery {
    pub detection_log_id: Option<i64>,
}

/// POST `/detection-logs?medicineId=` — append a history entry by hand.
pub async fn save_detection_log(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Query(query): Query<SaveDetectionLogQuery>,
) -> Result<CommonResponse, ApiError> {
    let medicine_id = query
        .medicine_id
        .ok_or_else(|| ApiError::validation("medicineId query parameter is required"))?;

    state.detection_logs.save(member.id, medicine_id).await?;
    Ok(CommonResponse::created("SAVE_DETECTION_LOG_SUCCESS", "detection log saved"))
}

/// DELETE `/detection-logs?detectionLogId=` — delete one history entry.
pub async fn delete_detection_log(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Query(query): Query<DeleteDetectionLogQuery>,
) -> Result<CommonResponse, ApiError> {
    let detection_log_id = query
        .detection_log_id
        .ok_or_else(|| ApiError::validation("detectionLogId query parameter is required"))?;

    state.detection_logs.delete(member.id, detection_log_id).await?;
    Ok(CommonResponse::ok("DELETE_DETECTION_LOG_SUCCESS", "detection log deleted"))
}

/// DELETE `/detection-logs/all` — clear the member's whole history.
pub async fn delete_detection_logs(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
) -> Result<CommonResponse, ApiError> {
    state.detection_logs.delete_all(member.id).await?;
    Ok(CommonResponse::ok("DELETE_DETECTION_LOGS_SUCCESS", "detection logs deleted"))
}

/// GET `/detection-logs/page/{page}` — one page of the history, newest
/// first.
pub async fn detection_log_page(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(page): Path<i64>,
) -> Result<Json<DetectionLogPageRes>, ApiError> {
    let res = state.detection_logs.page(member.id, page).await?;
    Ok(Json(res))
}
