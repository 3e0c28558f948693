//! HTTP handler for pill photo detection.
//! Takes a multipart image, asks the detector for a medicine, appends the
//! member's history entry, and answers with the full medicine detail.

use crate::{
    errors::ApiError, handlers::auth_handlers::CurrentMember, models::medicine::MedicineRes,
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, State},
};
use bytes::Bytes;
use tracing::info;

/// POST `/detection` — multipart field `image` holds the photo.
pub async fn detect(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    mut multipart: Multipart,
) -> Result<Json<MedicineRes>, ApiError> {
    let mut image: Option<(Bytes, Option<String>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::validation(format!("invalid multipart body: {}", err)))?
    {
        if field.name() == Some("image") {
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|err| ApiError::validation(format!("could not read image part: {}", err)))?;
            image = Some((data, content_type));
            break;
        }
    }

    let (data, content_type) = image
        .ok_or_else(|| ApiError::validation("multipart field `image` is required"))?;

    let hit = state.detector.detect(data, content_type).await?;
    info!("detected medicine {} ({}) for member {}", hit.id, hit.name, member.id);

    let medicine = state.medicines.get_by_id(hit.id).await?;
    state.detection_logs.save(member.id, medicine.id).await?;

    let res = state.medicines.medicine_res(member.id, medicine).await?;
    Ok(Json(res))
}
