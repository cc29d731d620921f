//! Dashboard service composing the three dashboard pages

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    AlertWindow, Catalog, CropDetailRecord, DashboardPage, DashboardSession, FeatureOption,
    FetchOutcome, IrrigationNeedRecord, ObservationRecord, ObservationSource,
};
use sqlx::PgPool;

use super::irrigation::AlertReport;
use super::{CropService, IrrigationService, ObservationService};

/// Dashboard service rendering one page per call
#[derive(Clone)]
pub struct DashboardService {
    observations: ObservationService,
    irrigation: IrrigationService,
    crops: CropService,
}

/// Page content for the current session
#[derive(Debug, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Landing {
        catalog: Catalog,
    },
    Conditions {
        feature: FeatureOption,
        historical: FetchOutcome<Vec<ObservationRecord>>,
        forecast: FetchOutcome<Vec<ObservationRecord>>,
    },
    Irrigation {
        details: FetchOutcome<Option<CropDetailRecord>>,
        needs: FetchOutcome<Vec<IrrigationNeedRecord>>,
        alerts: AlertReport,
    },
}

/// Rendered page plus the session the client should send back next time
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub session: DashboardSession,
    pub view: PageView,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            observations: ObservationService::new(db.clone()),
            irrigation: IrrigationService::new(db.clone()),
            crops: CropService::new(db),
        }
    }

    /// Render the page the session points at
    ///
    /// Queries run one after another on the request's connection budget.
    pub async fn render(
        &self,
        session: DashboardSession,
        today: NaiveDate,
        window: AlertWindow,
    ) -> DashboardView {
        tracing::debug!(page = session.page.index(), feature = %session.feature, crop = %session.crop, "Rendering dashboard");

        let view = match session.page {
            DashboardPage::Landing => PageView::Landing {
                catalog: Catalog::new(),
            },
            DashboardPage::Conditions => {
                let historical = self
                    .observations
                    .fetch_observations(ObservationSource::Historical, session.feature, None)
                    .await;
                let forecast = self
                    .observations
                    .fetch_observations(ObservationSource::Forecast, session.feature, None)
                    .await;

                PageView::Conditions {
                    feature: session.feature.option(),
                    historical,
                    forecast,
                }
            }
            DashboardPage::Irrigation => {
                let details = self.crops.fetch_crop_detail(session.crop).await;
                let needs = self.irrigation.fetch_irrigation_need(session.crop).await;
                let alerts = IrrigationService::build_alert_report(session.crop, &needs, today, window);

                PageView::Irrigation {
                    details,
                    needs,
                    alerts,
                }
            }
        };

        DashboardView { session, view }
    }
}
