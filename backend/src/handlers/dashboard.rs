//! HTTP handler for the composed dashboard pages

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{parse_crop, parse_feature, resolve_window, DashboardPage, DashboardSession, NavAction};
use validator::Validate;

use super::resolve_today;
use crate::error::AppResult;
use crate::services::dashboard::DashboardView;
use crate::services::DashboardService;
use crate::AppState;

/// Session state and navigation sent by the dashboard client
#[derive(Debug, Deserialize, Validate)]
pub struct DashboardQuery {
    pub page: Option<String>,
    pub feature: Option<String>,
    pub crop: Option<String>,
    /// "next" or "back", applied before rendering
    pub action: Option<String>,
    pub today: Option<NaiveDate>,
    #[validate(range(max = 366))]
    pub lookahead_days: Option<u32>,
}

impl DashboardQuery {
    fn session(&self) -> AppResult<DashboardSession> {
        let mut session = DashboardSession::default();

        if let Some(page) = self.page.as_deref() {
            session.page = page.parse::<DashboardPage>()?;
        }
        if let Some(feature) = self.feature.as_deref() {
            session = session.with_feature(parse_feature(feature)?);
        }
        if let Some(crop) = self.crop.as_deref() {
            session = session.with_crop(parse_crop(crop)?);
        }
        if let Some(action) = self.action.as_deref() {
            session = session.navigate(action.parse::<NavAction>()?);
        }

        Ok(session)
    }
}

/// Render the dashboard page for the given session
pub async fn render_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardView>> {
    query.validate()?;
    let session = query.session()?;
    let window = resolve_window(
        query.lookahead_days,
        state.config.alerts.lookahead_days,
        state.config.alerts.max_lookahead_days,
    )?;
    let today = resolve_today(query.today);

    let service = DashboardService::new(state.db);
    Ok(Json(service.render(session, today, window).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Crop, Feature};

    fn query(page: Option<&str>, action: Option<&str>) -> DashboardQuery {
        DashboardQuery {
            page: page.map(str::to_string),
            feature: Some("soil_moisture_28_to_100cm_m3m3".to_string()),
            crop: Some("rice".to_string()),
            action: action.map(str::to_string),
            today: None,
            lookahead_days: None,
        }
    }

    #[test]
    fn test_session_from_query() {
        let session = query(Some("conditions"), Some("next")).session().unwrap();
        assert_eq!(session.page, DashboardPage::Irrigation);
        assert_eq!(session.feature, Feature::SoilMoisture);
        assert_eq!(session.crop, Crop::Rice);
    }

    #[test]
    fn test_session_defaults_to_landing() {
        let session = query(None, Some("back")).session().unwrap();
        assert_eq!(session.page, DashboardPage::Landing);
    }

    #[test]
    fn test_session_rejects_unknown_values() {
        assert!(query(Some("settings"), None).session().is_err());
        assert!(query(None, Some("jump")).session().is_err());

        let mut bad_crop = query(None, None);
        bad_crop.crop = Some("Coffee".to_string());
        assert!(bad_crop.session().is_err());
    }
}
