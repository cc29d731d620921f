//! Irrigation alert evaluation
//!
//! Alerts are derived on every request from the irrigation-need table of a
//! crop. Nothing here touches storage or the clock: "today" is always passed
//! in by the caller.

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::irrigation::IrrigationNeedRecord;

/// Classification of a single day's irrigation requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    NeedsIrrigation,
    NoIrrigationNeeded,
}

impl AlertLevel {
    /// Any positive depth of water means the field has to be irrigated
    pub fn classify(amount_mm: Decimal) -> Self {
        if amount_mm > Decimal::ZERO {
            AlertLevel::NeedsIrrigation
        } else {
            AlertLevel::NoIrrigationNeeded
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::NeedsIrrigation => write!(f, "Needs irrigation"),
            AlertLevel::NoIrrigationNeeded => write!(f, "No irrigation needed"),
        }
    }
}

/// Irrigation alert for one date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub date: NaiveDate,
    pub level: AlertLevel,
    pub amount_mm: Decimal,
    pub message: String,
}

impl Alert {
    pub fn for_record(record: &IrrigationNeedRecord) -> Self {
        let level = AlertLevel::classify(record.irrigation_amount_mm);
        let message = match level {
            AlertLevel::NeedsIrrigation => format!(
                "Irrigation needed on {}: {} mm of water required",
                record.date, record.irrigation_amount_mm
            ),
            AlertLevel::NoIrrigationNeeded => format!("No irrigation needed on {}", record.date),
        };

        Self {
            date: record.date,
            level,
            amount_mm: record.irrigation_amount_mm,
            message,
        }
    }
}

/// How many days past "today" alerts are raised for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertWindow {
    pub lookahead_days: u32,
}

impl Default for AlertWindow {
    /// Today and tomorrow
    fn default() -> Self {
        Self { lookahead_days: 1 }
    }
}

impl AlertWindow {
    pub fn new(lookahead_days: u32) -> Self {
        Self { lookahead_days }
    }

    /// Last date inside the window, saturating at the calendar maximum
    pub fn end(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.lookahead_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive on both ends
    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        date >= today && date <= self.end(today)
    }
}

/// Calendar date of an instant in its own timezone
pub fn reference_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

/// Raise one alert per record dated inside the window
///
/// The output is sorted by date; records sharing a date keep their input
/// order. Duplicate dates are not collapsed here.
pub fn evaluate_alerts(
    records: &[IrrigationNeedRecord],
    today: NaiveDate,
    window: AlertWindow,
) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = records
        .iter()
        .filter(|record| window.contains(today, record.date))
        .map(Alert::for_record)
        .collect();

    alerts.sort_by_key(|alert| alert.date);
    alerts
}

/// Totals shown above the alert list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AlertSummary {
    pub days_needing_irrigation: usize,
    pub days_without_irrigation: usize,
    pub total_required_mm: Decimal,
}

impl AlertSummary {
    /// The total saturates at `Decimal::MAX` instead of overflowing
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        alerts.iter().fold(Self::default(), |mut summary, alert| {
            match alert.level {
                AlertLevel::NeedsIrrigation => {
                    summary.days_needing_irrigation += 1;
                    summary.total_required_mm = summary.total_required_mm.saturating_add(alert.amount_mm);
                }
                AlertLevel::NoIrrigationNeeded => summary.days_without_irrigation += 1,
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn need(date: NaiveDate, tenths: i64) -> IrrigationNeedRecord {
        IrrigationNeedRecord::new(date, Decimal::new(tenths, 1))
    }

    #[test]
    fn test_classify_boundary() {
        assert_eq!(AlertLevel::classify(Decimal::new(1, 2)), AlertLevel::NeedsIrrigation);
        assert_eq!(AlertLevel::classify(Decimal::ZERO), AlertLevel::NoIrrigationNeeded);
        assert_eq!(AlertLevel::classify(Decimal::new(-5, 1)), AlertLevel::NoIrrigationNeeded);
    }

    #[test]
    fn test_evaluate_default_window() {
        let today = date(2024, 6, 10);
        let records = vec![
            need(today, 52),
            need(date(2024, 6, 11), 0),
            need(date(2024, 6, 15), 30),
        ];

        let alerts = evaluate_alerts(&records, today, AlertWindow::default());

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].date, today);
        assert_eq!(alerts[0].level, AlertLevel::NeedsIrrigation);
        assert_eq!(alerts[0].amount_mm, Decimal::new(52, 1));
        assert_eq!(alerts[0].message, "Irrigation needed on 2024-06-10: 5.2 mm of water required");
        assert_eq!(alerts[1].date, date(2024, 6, 11));
        assert_eq!(alerts[1].level, AlertLevel::NoIrrigationNeeded);
        assert_eq!(alerts[1].message, "No irrigation needed on 2024-06-11");
    }

    #[test]
    fn test_evaluate_excludes_past_dates() {
        let today = date(2024, 6, 10);
        let records = vec![need(date(2024, 6, 9), 10), need(today, 10)];

        let alerts = evaluate_alerts(&records, today, AlertWindow::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].date, today);
    }

    #[test]
    fn test_evaluate_empty_input() {
        let alerts = evaluate_alerts(&[], date(2024, 6, 10), AlertWindow::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_evaluate_sorts_stably_by_date() {
        let today = date(2024, 6, 10);
        let tomorrow = date(2024, 6, 11);
        let records = vec![need(tomorrow, 10), need(today, 20), need(tomorrow, 30)];

        let alerts = evaluate_alerts(&records, today, AlertWindow::default());
        let amounts: Vec<_> = alerts.iter().map(|a| a.amount_mm).collect();
        assert_eq!(amounts, vec![Decimal::new(20, 1), Decimal::new(10, 1), Decimal::new(30, 1)]);
    }

    #[test]
    fn test_zero_lookahead_is_today_only() {
        let today = date(2024, 6, 10);
        let records = vec![need(today, 10), need(date(2024, 6, 11), 10)];

        let alerts = evaluate_alerts(&records, today, AlertWindow::new(0));
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_window_end_saturates() {
        let window = AlertWindow::new(u32::MAX);
        assert_eq!(window.end(NaiveDate::MAX), NaiveDate::MAX);
        assert!(window.contains(date(2024, 1, 1), date(9000, 1, 1)));
    }

    #[test]
    fn test_reference_date_uses_instant_timezone() {
        let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let instant = offset.with_ymd_and_hms(2024, 6, 10, 23, 30, 0).unwrap();
        assert_eq!(reference_date(&instant), date(2024, 6, 10));
        assert_eq!(reference_date(&instant.with_timezone(&Utc)), date(2024, 6, 10));

        let early = offset.with_ymd_and_hms(2024, 6, 11, 2, 0, 0).unwrap();
        assert_eq!(reference_date(&early), date(2024, 6, 11));
        assert_eq!(reference_date(&early.with_timezone(&Utc)), date(2024, 6, 10));
    }

    #[test]
    fn test_summary_totals() {
        let today = date(2024, 6, 10);
        let records = vec![need(today, 52), need(date(2024, 6, 11), 0)];
        let alerts = evaluate_alerts(&records, today, AlertWindow::default());

        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.days_needing_irrigation, 1);
        assert_eq!(summary.days_without_irrigation, 1);
        assert_eq!(summary.total_required_mm, Decimal::new(52, 1));
    }

    #[test]
    fn test_summary_total_saturates_on_huge_amounts() {
        let today = date(2024, 6, 10);
        let rows = vec![
            serde_json::json!({"date": "2024-06-10", "irrigation_amount_mm": "79228162514264337593543950335"}),
            serde_json::json!({"date": "2024-06-11", "irrigation_amount_mm": "79228162514264337593543950335"}),
        ];
        let records = crate::models::irrigation::normalize_rows(rows).records;
        let alerts = evaluate_alerts(&records, today, AlertWindow::default());

        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.days_needing_irrigation, 2);
        assert_eq!(summary.total_required_mm, Decimal::MAX);
    }
}
