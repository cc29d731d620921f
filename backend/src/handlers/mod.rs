//! HTTP handlers for the Smart Irrigation Dashboard API

pub mod catalog;
pub mod crops;
pub mod dashboard;
pub mod health;
pub mod irrigation;
pub mod observations;

pub use catalog::get_catalog;
pub use crops::get_crop_detail;
pub use dashboard::render_dashboard;
pub use health::health_check;
pub use irrigation::{get_irrigation_alerts, get_irrigation_needs};
pub use observations::get_observations;

use axum::{
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use shared::Notice;

use crate::error::{AppError, AppResult};

/// Date the alert window starts on: the request override or the server's local date
pub(crate) fn resolve_today(requested: Option<NaiveDate>) -> NaiveDate {
    requested.unwrap_or_else(|| shared::reference_date(&Local::now()))
}

/// Response format requested through `?format=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub(crate) fn parse(format: Option<&str>) -> AppResult<Self> {
        match format.map(str::trim) {
            None | Some("") | Some("json") => Ok(ExportFormat::Json),
            Some("csv") => Ok(ExportFormat::Csv),
            Some(other) => Err(AppError::Validation {
                field: "format".to_string(),
                message: format!("Unsupported format '{}'. Use json or csv.", other),
            }),
        }
    }
}

/// Response header carrying fetch notices as a JSON array on CSV downloads
pub(crate) const NOTICES_HEADER: HeaderName = HeaderName::from_static("x-notices");

/// CSV attachment with the fetch notices in `X-Notices`
pub(crate) fn csv_response(filename: &str, csv: String, notices: &[Notice]) -> AppResult<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| AppError::Internal(format!("Invalid download name: {}", e)))?;

    let mut response = (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response();

    if !notices.is_empty() {
        let json = serde_json::to_string(notices)
            .map_err(|e| AppError::Internal(format!("Notice serialization error: {}", e)))?;
        let value = HeaderValue::from_str(&ascii_json(&json))
            .map_err(|e| AppError::Internal(format!("Invalid notice header: {}", e)))?;
        response.headers_mut().insert(NOTICES_HEADER, value);
    }

    Ok(response)
}

/// Escape everything outside printable ASCII so JSON fits in a header value
fn ascii_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && !c.is_ascii_control() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
