//! Validation of user-selected values
//!
//! Every crop, feature and source a request names is resolved here against the
//! fixed allow-lists. Only the resolved enums ever reach query construction.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::DomainError;
use crate::models::{AlertWindow, Crop, Feature, ObservationSource};
use crate::types::DateRange;

pub fn parse_crop(value: &str) -> Result<Crop, DomainError> {
    value.parse()
}

pub fn parse_feature(value: &str) -> Result<Feature, DomainError> {
    value.parse()
}

pub fn parse_source(value: &str) -> Result<ObservationSource, DomainError> {
    value.parse()
}

/// Parse a `YYYY-MM-DD` request parameter
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDate(value.to_string()))
}

/// Build an optional range from optional bounds
///
/// A missing start or end leaves that side open, which is expressed by
/// clamping to the calendar limits.
pub fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<DateRange>, DomainError> {
    let start = start.filter(|s| !s.trim().is_empty()).map(parse_date).transpose()?;
    let end = end.filter(|s| !s.trim().is_empty()).map(parse_date).transpose()?;

    match (start, end) {
        (None, None) => Ok(None),
        (start, end) => DateRange::new(
            start.unwrap_or(NaiveDate::MIN),
            end.unwrap_or(NaiveDate::MAX),
        )
        .map(Some),
    }
}

/// Resolve the alert window for a request, falling back to the configured default
pub fn resolve_window(
    requested: Option<u32>,
    default_days: u32,
    max_days: u32,
) -> Result<AlertWindow, DomainError> {
    let days = requested.unwrap_or(default_days);
    if days > max_days {
        return Err(DomainError::LookaheadTooLong {
            requested: days,
            max: max_days,
        });
    }
    Ok(AlertWindow::new(days))
}

/// Dates that occur more than once, in ascending order
pub fn duplicate_dates<I>(dates: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for date in dates {
        *counts.entry(date).or_default() += 1;
    }

    let mut duplicates: Vec<NaiveDate> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(date, _)| date)
        .collect();
    duplicates.sort();
    duplicates
}
