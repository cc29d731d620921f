//! WebAssembly module for the Smart Irrigation Dashboard
//!
//! Provides client-side computation for:
//! - Crop and feature option lists
//! - Irrigation alert evaluation over fetched rows
//! - Dashboard page navigation

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Alerts computed in the browser, plus the rows that could not be read
#[derive(Debug, Serialize)]
pub struct AlertEvaluation {
    pub today: NaiveDate,
    pub window_end: NaiveDate,
    pub alerts: Vec<Alert>,
    pub summary: AlertSummary,
    pub skipped: Vec<SkippedRecord>,
}

fn to_js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js_error(format!("Serialization failed: {}", e)))
}

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}

/// Crop names accepted by the API, in display order
#[wasm_bindgen]
pub fn crop_options() -> Result<String, JsValue> {
    to_json(&Catalog::new().crops)
}

/// Feature select-box entries with column names and units
#[wasm_bindgen]
pub fn feature_options() -> Result<String, JsValue> {
    to_json(&Catalog::new().features)
}

/// Evaluate alerts for rows shaped like the irrigation-need table
///
/// `today` is `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn evaluate_irrigation_alerts(
    records_json: &str,
    today: &str,
    lookahead_days: u32,
) -> Result<String, JsValue> {
    let today = parse_date(today).map_err(to_js_error)?;
    let evaluation = evaluate(records_json, today, AlertWindow::new(lookahead_days))?;

    for skipped in &evaluation.skipped {
        warn(&format!("Skipped irrigation row {}: {}", skipped.index, skipped.reason));
    }

    to_json(&evaluation)
}

/// Same as `evaluate_irrigation_alerts`, with today taken from the browser clock
#[wasm_bindgen]
pub fn evaluate_irrigation_alerts_today(
    records_json: &str,
    lookahead_days: u32,
) -> Result<String, JsValue> {
    let now = js_sys::Date::new_0();
    let today = NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .ok_or_else(|| to_js_error("Browser clock returned an invalid date"))?;

    evaluate_irrigation_alerts(records_json, &today.to_string(), lookahead_days)
}

/// Apply "next" or "back" to a session and return the new session
#[wasm_bindgen]
pub fn navigate_session(session_json: &str, action: &str) -> Result<String, JsValue> {
    let session = navigate(session_json, action).map_err(to_js_error)?;
    to_json(&session)
}

fn evaluate(records_json: &str, today: NaiveDate, window: AlertWindow) -> Result<AlertEvaluation, JsValue> {
    let rows: Vec<Value> = serde_json::from_str(records_json)
        .map_err(|e| to_js_error(format!("Invalid records JSON: {}", e)))?;

    let normalized = normalize_rows(rows);
    let alerts = evaluate_alerts(&normalized.records, today, window);

    Ok(AlertEvaluation {
        today,
        window_end: window.end(today),
        summary: AlertSummary::from_alerts(&alerts),
        alerts,
        skipped: normalized.skipped,
    })
}

fn navigate(session_json: &str, action: &str) -> Result<DashboardSession, String> {
    let session: DashboardSession = if session_json.trim().is_empty() {
        DashboardSession::default()
    } else {
        serde_json::from_str(session_json).map_err(|e| format!("Invalid session JSON: {}", e))?
    };
    let action: NavAction = action.parse().map_err(|e: shared::DomainError| e.to_string())?;

    Ok(session.navigate(action))
}
