//! HTTP handlers for irrigation needs and alerts

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{parse_crop, resolve_window};
use validator::Validate;

use super::{csv_response, resolve_today, ExportFormat};
use crate::error::AppResult;
use crate::services::irrigation::AlertReport;
use crate::services::{ExportService, IrrigationService};
use crate::AppState;

/// Query parameters for the irrigation needs table
#[derive(Debug, Deserialize)]
pub struct NeedsQuery {
    pub format: Option<String>,
}

/// Get the irrigation needs of a crop
pub async fn get_irrigation_needs(
    State(state): State<AppState>,
    Path(crop): Path<String>,
    Query(query): Query<NeedsQuery>,
) -> AppResult<Response> {
    let crop = parse_crop(&crop)?;
    let format = ExportFormat::parse(query.format.as_deref())?;

    let service = IrrigationService::new(state.db);
    let outcome = service.fetch_irrigation_need(crop).await;

    match format {
        ExportFormat::Csv => {
            let csv = ExportService::irrigation_needs_to_csv(&outcome.data)?;
            csv_response(&format!("{}.csv", crop.irrigation_table()), csv, &outcome.notices)
        }
        ExportFormat::Json => Ok(Json(outcome).into_response()),
    }
}

/// Query parameters for irrigation alerts
#[derive(Debug, Deserialize, Validate)]
pub struct AlertQuery {
    /// Overrides the server's local date
    pub today: Option<NaiveDate>,
    #[validate(range(max = 366))]
    pub lookahead_days: Option<u32>,
}

/// Get irrigation alerts for today and the following days
pub async fn get_irrigation_alerts(
    State(state): State<AppState>,
    Path(crop): Path<String>,
    Query(query): Query<AlertQuery>,
) -> AppResult<Json<AlertReport>> {
    query.validate()?;
    let crop = parse_crop(&crop)?;
    let window = resolve_window(
        query.lookahead_days,
        state.config.alerts.lookahead_days,
        state.config.alerts.max_lookahead_days,
    )?;
    let today = resolve_today(query.today);

    let service = IrrigationService::new(state.db);
    Ok(Json(service.alert_report(crop, today, window).await))
}
