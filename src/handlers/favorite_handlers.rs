//! HTTP handlers for the member's favorite medicines.

use crate::{
    errors::{ApiError, CommonResponse},
    handlers::auth_handlers::CurrentMember,
    models::favorite::{FavoriteDto, FavoritePageRes, SortDirection},
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
pub struct SaveFavoriteQuery {
    pub medicine_id: Option<i64>,
}

/// Query params of the page listing.
#[derive(Debug, Deserialize)]
pub struct FavoritePageQuery {
    pub sort: Option<String>,
}

/// Query params of the single delete.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFavoriteQuery {
    pub favorite_id: Option<i64>,
}

/// POST `/favorites?medicineId=` — add a medicine to the favorites.
pub async fn save_favorite(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Query(query): Query<SaveFavoriteQuery>,
) -> Result<CommonResponse, ApiError> {
    let medicine_id = query
        .medicine_id
        .ok_or_else(|| ApiError::validation("medicineId query parameter is required"))?;

    state.favorites.save(member.id, medicine_id).await?;
    Ok(CommonResponse::created("SAVE_FAVORITE_SUCCESS", "favorite saved"))
}

/// GET `/favorites/id/{id}` — raw identifiers of one favorite row.
pub async fn favorite_by_id(
    State(state): State<AppState>,
    CurrentMember(_): CurrentMember,
    Path(id): Path<i64>,
) -> Result<Json<FavoriteDto>, ApiError> {
    let dto = state.favorites.get_dto(id).await?;
    Ok(Json(dto))
}

/// GET `/favorites/page/{page}?sort=asc|desc` — one page of the drawer,
/// newest first unless asked otherwise.
pub async fn favorite_page(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(page): Path<i64>,
    Query(query): Query<FavoritePageQuery>,
) -> Result<Json<FavoritePageRes>, ApiError> {
    let sort = match query.sort.as_deref() {
        None => SortDirection::default(),
        Some(raw) => raw
            .parse::<SortDirection>()
            .map_err(|_| ApiError::validation(format!("unknown sort direction `{}`", raw)))?,
    };

    let res = state.favorites.page(member.id, page, sort).await?;
    Ok(Json(res))
}

/// DELETE `/favorites?favoriteId=` — delete one favorite.
pub async fn delete_favorite(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Query(query): Query<DeleteFavoriteQuery>,
) -> Result<CommonResponse, ApiError> {
    let favorite_id = query
        .favorite_id
        .ok_or_else(|| ApiError::validation("favoriteId query parameter is required"))?;

    state.favorites.delete(member.id, favorite_id).await?;
    Ok(CommonResponse::ok("DELETE_FAVORITE_SUCCESS", "favorite deleted"))
}

/// DELETE `/favorites/all` — empty the member's favorites drawer.
pub async fn delete_favorites(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
) -> Result<CommonResponse, ApiError> {
    state.favorites.delete_all(member.id).await?;
    Ok(CommonResponse::ok("DELETE_FAVORITES_SUCCESS", "favorites deleted"))
}
