//! HTTP handlers for historical and forecast observation series

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use shared::{parse_date_range, parse_feature, parse_source};

use super::{csv_response, ExportFormat};
use crate::error::AppResult;
use crate::services::{ExportService, ObservationService};
use crate::AppState;

/// Query parameters for an observation series
#[derive(Debug, Deserialize)]
pub struct ObservationQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

/// Get one feature series from the historical or forecast table
pub async fn get_observations(
    State(state): State<AppState>,
    Path((source, feature)): Path<(String, String)>,
    Query(query): Query<ObservationQuery>,
) -> AppResult<Response> {
    // Resolve everything against the allow-lists before touching the database
    let source = parse_source(&source)?;
    let feature = parse_feature(&feature)?;
    let range = parse_date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let format = ExportFormat::parse(query.format.as_deref())?;

    let service = ObservationService::new(state.db);
    let outcome = service.fetch_observations(source, feature, range).await;

    match format {
        ExportFormat::Csv => {
            let csv = ExportService::observations_to_csv(feature, &outcome.data)?;
            csv_response(&format!("{}_{}.csv", source, feature.slug()), csv, &outcome.notices)
        }
        ExportFormat::Json => Ok(Json(outcome).into_response()),
    }
}
