//! HTTP handlers for the member's recent-search log.

use crate::{
    errors::{ApiError, CommonResponse},
    handlers::auth_handlers::CurrentMember,
    models::search_log::SearchLogRes,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

/// Query params identifying one log entry, as echoed by the listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSearchLogQuery {
    pub name: Option<String>,
    pub created_at: Option<String>,
}

/// GET `/search-logs` — the member's recent searches, newest first.
pub async fn recent_search_logs(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
) -> Result<Json<Vec<SearchLogRes>>, ApiError> {
    let logs = state.search.recent_logs(member.id).await?;
    Ok(Json(logs))
}

/// DELETE `/search-logs?name=&createdAt=` — delete one log entry.
pub async fn delete_search_log(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Query(query): Query<DeleteSearchLogQuery>,
) -> Result<CommonResponse, ApiError> {
    let name = query
        .name
        .ok_or_else(|| ApiError::validation("name query parameter is required"))?;
    let created_at = query
        .created_at
        .ok_or_else(|| ApiError::validation("createdAt query parameter is required"))?;

    state.search.delete_log(member.id, &name, &created_at).await?;
    Ok(CommonResponse::ok("DELETE_SEARCH_LOG_SUCCESS", "search log deleted"))
}

/// DELETE `/search-logs/all` — clear the member's recent-search list.
pub async fn delete_search_logs(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
) -> Result<CommonResponse, ApiError> {
    state.search.delete_all_logs(member.id).await?;
    Ok(CommonResponse::ok("DELETE_SEARCH_LOGS_SUCCESS", "search logs deleted"))
}
