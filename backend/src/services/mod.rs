//! Data access and irrigation services for the Smart Irrigation Dashboard

pub mod crop;
pub mod dashboard;
pub mod export;
pub mod irrigation;
pub mod observation;

pub use crop::CropService;
pub use dashboard::DashboardService;
pub use export::ExportService;
pub use irrigation::IrrigationService;
pub use observation::ObservationService;

use shared::{FetchOutcome, FetchPayload};

use crate::error::AppResult;

/// Turn a fetch result into an outcome, logging what the user will be told
///
/// This is the only place a data-access failure is caught.
pub(crate) fn settle<T: FetchPayload>(result: AppResult<T>, subject: &str, key: &str) -> FetchOutcome<T> {
    match &result {
        Err(e) => tracing::error!(subject, key, error = %e, "Fetch failed"),
        Ok(data) if FetchPayload::is_empty(data) => {
            tracing::warn!(subject, key, "Fetch returned no rows")
        }
        Ok(_) => {}
    }

    FetchOutcome::from_result(result, subject, key)
}

/// Comma-separated list of dates for notices
pub(crate) fn join_dates(dates: &[chrono::NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
