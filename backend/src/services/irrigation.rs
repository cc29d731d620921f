//! Irrigation service for crop water requirements and alerts

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    dedupe_by_date, evaluate_alerts, normalize_rows, Alert, AlertSummary, AlertWindow, Crop,
    FetchOutcome, IrrigationNeedRecord, Notice,
};
use sqlx::PgPool;

use super::{join_dates, settle};
use crate::error::AppResult;

const SUBJECT: &str = "irrigation needs data";

/// Irrigation service for reading per-crop irrigation needs
#[derive(Clone)]
pub struct IrrigationService {
    db: PgPool,
}

/// Alerts for a crop over one window
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    pub crop: Crop,
    pub today: NaiveDate,
    pub window_end: NaiveDate,
    pub alerts: Vec<Alert>,
    pub summary: AlertSummary,
    pub notices: Vec<Notice>,
}

/// Every column of every row, one JSON object per row
pub(crate) fn irrigation_need_query(crop: Crop) -> String {
    format!(
        r#"SELECT row_to_json(t) AS record FROM {table} t ORDER BY t."date""#,
        table = crop.irrigation_table(),
    )
}

impl IrrigationService {
    /// Create a new IrrigationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fetch the normalized, date-unique irrigation needs of a crop
    pub async fn fetch_irrigation_need(&self, crop: Crop) -> FetchOutcome<Vec<IrrigationNeedRecord>> {
        match self.query_rows(crop).await {
            Ok(rows) => Self::settle_rows(crop, rows),
            Err(e) => settle(Err(e), SUBJECT, &format!("crop: {}", crop)),
        }
    }

    /// Normalize fetched rows into date-ordered needs with their notices
    ///
    /// Rows with unparsable dates or amounts are skipped; when a date repeats
    /// the first row wins. Both are reported as warnings.
    pub fn settle_rows(crop: Crop, rows: Vec<serde_json::Value>) -> FetchOutcome<Vec<IrrigationNeedRecord>> {
        let key = format!("crop: {}", crop);
        let fetched = rows.len();
        let normalized = normalize_rows(rows);
        for skipped in &normalized.skipped {
            tracing::debug!(crop = %crop, index = skipped.index, reason = %skipped.reason, "Skipping row");
        }

        let (mut records, duplicates) = dedupe_by_date(normalized.records);
        records.sort_by_key(|r| r.date);

        let mut outcome = settle(Ok(records), SUBJECT, &key);

        if !normalized.skipped.is_empty() {
            tracing::warn!(
                crop = %crop,
                skipped = normalized.skipped.len(),
                fetched,
                "Skipped malformed irrigation rows"
            );
            outcome = outcome.with_notice(Notice::warning(format!(
                "Skipped {} of {} irrigation rows for {} with an unreadable date or amount",
                normalized.skipped.len(),
                fetched,
                crop
            )));
        }

        if !duplicates.is_empty() {
            outcome = outcome.with_notice(Notice::warning(format!(
                "Duplicate dates found in irrigation needs for {}; kept the first row for: {}",
                crop,
                join_dates(&duplicates)
            )));
        }

        outcome
    }

    /// Fetch needs and evaluate alerts for the window starting at `today`
    pub async fn alert_report(&self, crop: Crop, today: NaiveDate, window: AlertWindow) -> AlertReport {
        let needs = self.fetch_irrigation_need(crop).await;
        Self::build_alert_report(crop, &needs, today, window)
    }

    /// Evaluate alerts over needs that were already fetched
    pub fn build_alert_report(
        crop: Crop,
        needs: &FetchOutcome<Vec<IrrigationNeedRecord>>,
        today: NaiveDate,
        window: AlertWindow,
    ) -> AlertReport {
        let alerts = evaluate_alerts(&needs.data, today, window);
        let summary = AlertSummary::from_alerts(&alerts);

        tracing::info!(
            crop = %crop,
            %today,
            alerts = alerts.len(),
            needing = summary.days_needing_irrigation,
            "Evaluated irrigation alerts"
        );

        AlertReport {
            crop,
            today,
            window_end: window.end(today),
            alerts,
            summary,
            notices: needs.notices.clone(),
        }
    }

    async fn query_rows(&self, crop: Crop) -> AppResult<Vec<serde_json::Value>> {
        let sql = irrigation_need_query(crop);
        tracing::debug!(crop = %crop, table = crop.irrigation_table(), "Querying irrigation needs");

        let rows = sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use shared::{AlertLevel, NoticeLevel};
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_query_reads_crop_table() {
        assert_eq!(
            irrigation_need_query(Crop::Sugarcane),
            r#"SELECT row_to_json(t) AS record FROM sugarcane_irrigation_need t ORDER BY t."date""#
        );
    }

    #[test]
    fn test_build_alert_report_from_fetched_needs() {
        let today = date(2024, 6, 10);
        let needs = FetchOutcome::new(vec![
            IrrigationNeedRecord::new(today, Decimal::new(52, 1)),
            IrrigationNeedRecord::new(date(2024, 6, 11), Decimal::ZERO),
            IrrigationNeedRecord::new(date(2024, 6, 15), Decimal::from(3)),
        ]);

        let report = IrrigationService::build_alert_report(Crop::Rice, &needs, today, AlertWindow::default());

        assert_eq!(report.window_end, date(2024, 6, 11));
        assert_eq!(report.alerts.len(), 2);
        assert_eq!(report.alerts[0].level, AlertLevel::NeedsIrrigation);
        assert_eq!(report.alerts[1].level, AlertLevel::NoIrrigationNeeded);
        assert_eq!(report.summary.total_required_mm, Decimal::new(52, 1));
        assert!(report.notices.is_empty());
    }

    #[test]
    fn test_build_alert_report_carries_fetch_notices() {
        let needs: FetchOutcome<Vec<IrrigationNeedRecord>> =
            FetchOutcome::from_result(Ok::<_, String>(vec![]), SUBJECT, "crop: Maize");

        let report =
            IrrigationService::build_alert_report(Crop::Maize, &needs, date(2024, 6, 10), AlertWindow::default());

        assert!(report.alerts.is_empty());
        assert_eq!(report.notices[0].level, NoticeLevel::Warning);
        assert_eq!(report.notices[0].message, "No irrigation needs data found for crop: Maize");
    }

    #[tokio::test]
    async fn test_unreachable_database_yields_empty_alerts() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(300))
            .connect_lazy("postgres://irrigation@127.0.0.1:1/irrigation")
            .unwrap();
        let service = IrrigationService::new(pool);

        let report = service
            .alert_report(Crop::Wheat, date(2024, 6, 10), AlertWindow::default())
            .await;

        assert!(report.alerts.is_empty());
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_settle_rows_skips_dedupes_and_sorts() {
        let rows = vec![
            json!({"date": "2024-06-12", "irrigation_amount_mm": 1.0}),
            json!({"date": "2024-06-10", "irrigation_amount_mm": 5.2}),
            json!({"date": "someday", "irrigation_amount_mm": 2.0}),
            json!({"date": "2024-06-10T06:00:00", "irrigation_amount_mm": 9.9}),
            json!({"date": "2024-06-11", "irrigation_amount_mm": null}),
        ];

        let outcome = IrrigationService::settle_rows(Crop::Cotton, rows);

        let dates: Vec<_> = outcome.data.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 6, 10), date(2024, 6, 12)]);
        assert_eq!(outcome.data[0].irrigation_amount_mm, Decimal::new(52, 1));

        assert_eq!(outcome.notices.len(), 2);
        assert!(outcome.notices.iter().all(|n| n.level == NoticeLevel::Warning));
        assert_eq!(
            outcome.notices[0].message,
            "Skipped 2 of 5 irrigation rows for Cotton with an unreadable date or amount"
        );
        assert_eq!(
            outcome.notices[1].message,
            "Duplicate dates found in irrigation needs for Cotton; kept the first row for: 2024-06-10"
        );
    }

    #[test]
    fn test_settle_rows_all_malformed_is_empty_with_warnings() {
        let rows = vec![json!("not an object"), json!({"irrigation_amount_mm": 3})];

        let outcome = IrrigationService::settle_rows(Crop::Pulses, rows);

        assert!(outcome.data.is_empty());
        assert!(!outcome.has_errors());
        let messages: Vec<_> = outcome.notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "No irrigation needs data found for crop: Pulses",
                "Skipped 2 of 2 irrigation rows for Pulses with an unreadable date or amount",
            ]
        );
    }

    #[test]
    fn test_settle_rows_clean_batch_has_no_notices() {
        let rows = vec![
            json!({"date": "2024-06-10", "irrigation_amount_mm": "0"}),
            json!({"date": "2024-06-11", "irrigation_amount_mm": 4}),
        ];

        let outcome = IrrigationService::settle_rows(Crop::Wheat, rows);
        assert_eq!(outcome.data.len(), 2);
        assert!(outcome.notices.is_empty());
    }
}
