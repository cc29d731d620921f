//! HTTP handlers for crop reference data

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{parse_crop, CropDetailRecord, FetchOutcome};

use crate::error::AppResult;
use crate::services::CropService;
use crate::AppState;

/// Get the optimal growing conditions of a crop
pub async fn get_crop_detail(
    State(state): State<AppState>,
    Path(crop): Path<String>,
) -> AppResult<Json<FetchOutcome<Option<CropDetailRecord>>>> {
    let crop = parse_crop(&crop)?;

    let service = CropService::new(state.db);
    Ok(Json(service.fetch_crop_detail(crop).await))
}
