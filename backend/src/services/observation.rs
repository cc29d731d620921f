//! Observation service for historical and forecast weather series

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{
    duplicate_dates, DateRange, FetchOutcome, Feature, Notice, ObservationRecord, ObservationSource,
};
use sqlx::{FromRow, PgPool};

use super::{join_dates, settle};
use crate::error::AppResult;

/// Observation service for reading weather feature series
#[derive(Clone)]
pub struct ObservationService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ObservationRow {
    date: NaiveDate,
    feature_value: Decimal,
}

impl From<ObservationRow> for ObservationRecord {
    fn from(row: ObservationRow) -> Self {
        ObservationRecord::new(row.date, row.feature_value)
    }
}

/// SQL for one feature of one source
///
/// Identifiers come from the allow-list enums only; the date bounds are bind
/// parameters and either may be NULL.
pub(crate) fn observation_query(source: ObservationSource, feature: Feature) -> String {
    format!(
        r#"
        SELECT "date"::date AS date, "{column}"::numeric AS feature_value
        FROM {table}
        WHERE "{column}" IS NOT NULL
          AND "{column}"::float8 <> 'NaN'::float8
          AND ($1::date IS NULL OR "date"::date >= $1)
          AND ($2::date IS NULL OR "date"::date <= $2)
        ORDER BY 1
        "#,
        column = feature.column(),
        table = source.table(),
    )
}

impl ObservationService {
    /// Create a new ObservationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fetch a feature series, settling failures and empty results into notices
    pub async fn fetch_observations(
        &self,
        source: ObservationSource,
        feature: Feature,
        range: Option<DateRange>,
    ) -> FetchOutcome<Vec<ObservationRecord>> {
        let key = format!("feature: {}", feature.column());

        let result = self.query_observations(source, feature, range).await;
        Self::flag_duplicates(source, feature, settle(result, source.subject(), &key))
    }

    /// Add a warning when the series repeats a date; the rows are kept for charting
    pub fn flag_duplicates(
        source: ObservationSource,
        feature: Feature,
        outcome: FetchOutcome<Vec<ObservationRecord>>,
    ) -> FetchOutcome<Vec<ObservationRecord>> {
        let duplicates = duplicate_dates(outcome.data.iter().map(|r| r.date));
        if duplicates.is_empty() {
            return outcome;
        }

        tracing::warn!(
            source = %source,
            feature = feature.column(),
            count = duplicates.len(),
            "Duplicate dates in observation series"
        );
        outcome.with_notice(Notice::warning(format!(
            "Duplicate dates found in {}: {}",
            source.subject(),
            join_dates(&duplicates)
        )))
    }

    async fn query_observations(
        &self,
        source: ObservationSource,
        feature: Feature,
        range: Option<DateRange>,
    ) -> AppResult<Vec<ObservationRecord>> {
        let sql = observation_query(source, feature);
        tracing::debug!(source = %source, feature = feature.column(), "Querying observations");

        let rows = sqlx::query_as::<_, ObservationRow>(&sql)
            .bind(range.and_then(|r| r.start_bound()))
            .bind(range.and_then(|r| r.end_bound()))
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ObservationRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::NoticeLevel;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    #[test]
    fn test_query_uses_allow_listed_identifiers() {
        let sql = observation_query(ObservationSource::Historical, Feature::Temperature);
        assert!(sql.contains(r#""temperature_2m_c"::numeric AS feature_value"#));
        assert!(sql.contains("FROM historical_data"));
        assert!(sql.contains("$1::date"));
        assert!(sql.contains("$2::date"));
    }

    #[test]
    fn test_query_quotes_unicode_column() {
        let sql = observation_query(ObservationSource::Forecast, Feature::Evapotranspiration);
        assert!(sql.contains(r#""et₀_mm""#));
        assert!(sql.contains("FROM present_with_forecast"));
    }

    #[test]
    fn test_every_feature_builds_for_both_sources() {
        for source in [ObservationSource::Historical, ObservationSource::Forecast] {
            for feature in Feature::ALL {
                let sql = observation_query(source, feature);
                assert!(sql.contains(source.table()));
                assert!(sql.contains(feature.column()));
                assert!(!sql.contains(';'));
            }
        }
    }

    #[test]
    fn test_flag_duplicates_keeps_rows_and_warns() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let outcome = FetchOutcome::new(vec![
            ObservationRecord::new(day(1), Decimal::new(301, 1)),
            ObservationRecord::new(day(2), Decimal::new(305, 1)),
            ObservationRecord::new(day(2), Decimal::new(307, 1)),
            ObservationRecord::new(day(3), Decimal::new(310, 1)),
            ObservationRecord::new(day(3), Decimal::new(312, 1)),
        ]);

        let flagged =
            ObservationService::flag_duplicates(ObservationSource::Historical, Feature::Temperature, outcome);

        assert_eq!(flagged.data.len(), 5);
        assert_eq!(flagged.notices.len(), 1);
        assert_eq!(flagged.notices[0].level, NoticeLevel::Warning);
        assert_eq!(
            flagged.notices[0].message,
            "Duplicate dates found in historical data: 2024-06-02, 2024-06-03"
        );
    }

    #[test]
    fn test_flag_duplicates_leaves_unique_series_alone() {
        let outcome = FetchOutcome::new(vec![ObservationRecord::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            Decimal::ONE,
        )]);

        let flagged =
            ObservationService::flag_duplicates(ObservationSource::Forecast, Feature::Humidity, outcome);
        assert!(flagged.notices.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_database_degrades_to_error_notice() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(300))
            .connect_lazy("postgres://irrigation@127.0.0.1:1/irrigation")
            .unwrap();
        let service = ObservationService::new(pool);

        let outcome = service
            .fetch_observations(ObservationSource::Historical, Feature::Precipitation, None)
            .await;

        assert!(outcome.data.is_empty());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
        assert!(outcome.notices[0]
            .message
            .starts_with("Error fetching historical data:"));
    }
}
