//! Weather observation models

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Where an observation series comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObservationSource {
    /// Multi-year observed weather
    Historical,
    /// Recent observations followed by the short-horizon forecast
    Forecast,
}

impl ObservationSource {
    pub fn table(&self) -> &'static str {
        match self {
            ObservationSource::Historical => "historical_data",
            ObservationSource::Forecast => "present_with_forecast",
        }
    }

    /// Noun used in user-facing notices
    pub fn subject(&self) -> &'static str {
        match self {
            ObservationSource::Historical => "historical data",
            ObservationSource::Forecast => "future data",
        }
    }
}

impl std::fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationSource::Historical => write!(f, "historical"),
            ObservationSource::Forecast => write!(f, "forecast"),
        }
    }
}

impl FromStr for ObservationSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "historical" => Ok(ObservationSource::Historical),
            "forecast" => Ok(ObservationSource::Forecast),
            other => Err(DomainError::UnknownSource(other.to_string())),
        }
    }
}

/// One value of one feature on one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservationRecord {
    pub date: NaiveDate,
    pub feature_value: Decimal,
}

impl ObservationRecord {
    pub fn new(date: NaiveDate, feature_value: Decimal) -> Self {
        Self {
            date,
            feature_value,
        }
    }
}
