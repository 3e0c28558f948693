//! HTTP handlers for the member account and the my-page summary.

use crate::{
    errors::{ApiError, CommonResponse},
    handlers::auth_handlers::CurrentMember,
    models::member::MyPageRes,
    state::AppState,
};
use axum::{Json, extract::State};

/// DELETE `/members` — soft-delete the logged-in member.
pub async fn delete_member(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
) -> Result<CommonResponse, ApiError> {
    state.members.delete(member.id).await?;
    Ok(CommonResponse::ok("DELETE_SUCCESS", "member deleted"))
}

/// GET `/my-page/info` — name plus history and favorite counts.
pub async fn my_page(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
) -> Result<Json<MyPageRes>, ApiError> {
    let detection_log_count = state.detection_logs.count(member.id).await?;
    let favorite_count = state.favorites.count(member.id).await?;

    Ok(Json(MyPageRes {
        member_name: member.name,
        detection_log_count,
        favorite_count,
    }))
}
