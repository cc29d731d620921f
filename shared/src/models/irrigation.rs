//! Irrigation requirement records and their normalization

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DATE_COLUMN: &str = "date";
pub const AMOUNT_COLUMN: &str = "irrigation_amount_mm";

/// Water required for a crop on one calendar date
///
/// Crop tables may carry additional columns (crop coefficients, effective
/// rainfall, ...); those are preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationNeedRecord {
    pub date: NaiveDate,
    pub irrigation_amount_mm: Decimal,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Why a row could not be turned into an [`IrrigationNeedRecord`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("row is not an object")]
    NotAnObject,

    #[error("missing date")]
    MissingDate,

    #[error("unparsable date: {0}")]
    UnparsableDate(String),

    #[error("missing irrigation amount")]
    MissingAmount,

    #[error("invalid irrigation amount: {0}")]
    InvalidAmount(String),
}

impl IrrigationNeedRecord {
    pub fn new(date: NaiveDate, irrigation_amount_mm: Decimal) -> Self {
        Self {
            date,
            irrigation_amount_mm,
            extra: BTreeMap::new(),
        }
    }

    /// Normalize one table row, encoded as a JSON object, into a record
    pub fn from_row(row: Value) -> Result<Self, MalformedRecord> {
        let Value::Object(mut columns) = row else {
            return Err(MalformedRecord::NotAnObject);
        };

        let date = match columns.remove(DATE_COLUMN) {
            None | Some(Value::Null) => return Err(MalformedRecord::MissingDate),
            Some(Value::String(raw)) => {
                parse_calendar_date(&raw).ok_or(MalformedRecord::UnparsableDate(raw))?
            }
            Some(other) => return Err(MalformedRecord::UnparsableDate(other.to_string())),
        };

        let irrigation_amount_mm = match columns.remove(AMOUNT_COLUMN) {
            None | Some(Value::Null) => return Err(MalformedRecord::MissingAmount),
            Some(value) => parse_amount(&value)?,
        };

        Ok(Self {
            date,
            irrigation_amount_mm,
            extra: columns.into_iter().collect(),
        })
    }
}

/// Coerce a date or timestamp string to its calendar date, dropping time-of-day
///
/// Timestamps with an offset keep the calendar date local to that offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.date());
        }
    }
    // Postgres renders timestamptz offsets as "+00" or "+05:30"
    if let Ok(timestamp) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%#z") {
        return Some(timestamp.date_naive());
    }

    None
}

fn parse_amount(value: &Value) -> Result<Decimal, MalformedRecord> {
    decimal_cell(value).ok_or_else(|| {
        MalformedRecord::InvalidAmount(match value {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
    })
}

/// Read a numeric cell that Postgres rendered as a JSON number or string
pub(crate) fn decimal_cell(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// A row that was dropped during normalization
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the row in the fetched batch
    pub index: usize,
    pub reason: String,
}

/// Result of normalizing a batch of rows
#[derive(Debug, Clone, Default)]
pub struct NormalizedNeeds {
    pub records: Vec<IrrigationNeedRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize every row, skipping malformed ones without aborting the batch
pub fn normalize_rows<I>(rows: I) -> NormalizedNeeds
where
    I: IntoIterator<Item = Value>,
{
    let mut normalized = NormalizedNeeds::default();

    for (index, row) in rows.into_iter().enumerate() {
        match IrrigationNeedRecord::from_row(row) {
            Ok(record) => normalized.records.push(record),
            Err(reason) => normalized.skipped.push(SkippedRecord {
                index,
                reason: reason.to_string(),
            }),
        }
    }

    normalized
}

/// Keep the first record for every date, returning the dates that were repeated
pub fn dedupe_by_date(records: Vec<IrrigationNeedRecord>) -> (Vec<IrrigationNeedRecord>, Vec<NaiveDate>) {
    let mut seen = HashSet::new();
    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(record.date) {
            kept.push(record);
        } else {
            removed.push(record.date);
        }
    }

    removed.sort();
    removed.dedup();
    (kept, removed)
}
