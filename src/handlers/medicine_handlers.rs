//! HTTP handlers for medicine lookups and name search.

use crate::{
    errors::ApiError,
    handlers::auth_handlers::CurrentMember,
    models::medicine::{MedicineRes, MedicineSearchPageRes},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

/// Query params of the paged name search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub page: Option<i64>,
}

/// Query params of the related-name suggestions.
#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    pub name: Option<String>,
}

/// GET `/medicines/id/{id}` — full detail by row id.
pub async fn medicine_by_id(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<i64>,
) -> Result<Json<MedicineRes>, ApiError> {
    let medicine = state.medicines.get_by_id(id).await?;
    let res = state.medicines.medicine_res(member.id, medicine).await?;
    Ok(Json(res))
}

/// GET `/medicines/code/{code}` — full detail by registry product code.
pub async fn medicine_by_code(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(code): Path<String>,
) -> Result<Json<MedicineRes>, ApiError> {
    let medicine = state.medicines.get_by_code(&code).await?;
    let res = state.medicines.medicine_res(member.id, medicine).await?;
    Ok(Json(res))
}

/// GET `/medicines/search?keyword=&page=` — one page of name matches.
/// A missing page means the first one.
pub async fn search_medicines(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Query(query): Query<SearchQuery>,
) -> Result<Json<MedicineSearchPageRes>, ApiError> {
    let keyword = query.keyword.unwrap_or_default();
    let page = query.page.unwrap_or(1);

    let res = state.search.search_page(member.id, &keyword, page).await?;
    Ok(Json(res))
}

/// GET `/medicines/search/related?name=` — up to ten matching names for
/// the search box suggestions.
pub async fn related_medicine_names(
    State(state): State<AppState>,
    CurrentMember(_): CurrentMember,
    Query(query): Query<RelatedQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let name = query.name.unwrap_or_default();
    let names = state.search.related_names(&name).await?;
    Ok(Json(names))
}
