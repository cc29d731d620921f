//! Common types used across the dashboard

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::models::{Crop, Feature, FeatureOption};

/// Inclusive date range for queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Lower bound, or `None` when the range is open at the start
    pub fn start_bound(&self) -> Option<NaiveDate> {
        (self.start != NaiveDate::MIN).then_some(self.start)
    }

    /// Upper bound, or `None` when the range is open at the end
    pub fn end_bound(&self) -> Option<NaiveDate> {
        (self.end != NaiveDate::MAX).then_some(self.end)
    }
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Message shown next to a widget whose data is empty, partial or unavailable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Payloads a fetch can produce
pub trait FetchPayload: Default {
    fn is_empty(&self) -> bool;
}

impl<T> FetchPayload for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<T> FetchPayload for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

/// Data for one widget plus any notices raised while fetching it
///
/// A failed fetch never escapes as an error: it becomes an empty payload with
/// an error notice so the rest of the page still renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchOutcome<T> {
    pub data: T,
    pub notices: Vec<Notice>,
}

impl<T: FetchPayload> FetchOutcome<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            notices: Vec::new(),
        }
    }

    /// Settle a fetch result
    ///
    /// `subject` names what was fetched ("historical data") and `key` what it
    /// was fetched for ("feature: temperature_2m_c").
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>, subject: &str, key: &str) -> Self {
        match result {
            Ok(data) if data.is_empty() => Self {
                data,
                notices: vec![Notice::warning(format!("No {} found for {}", subject, key))],
            },
            Ok(data) => Self::new(data),
            Err(e) => Self {
                data: T::default(),
                notices: vec![Notice::error(format!("Error fetching {}: {}", subject, e))],
            },
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.level == NoticeLevel::Error)
    }

    pub fn map<U, F>(self, f: F) -> FetchOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        FetchOutcome {
            data: f(self.data),
            notices: self.notices,
        }
    }
}

/// Select-box options for the dashboard
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Catalog {
    pub crops: Vec<&'static str>,
    pub features: Vec<FeatureOption>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            crops: Crop::ALL.iter().map(|c| c.name()).collect(),
            features: Feature::ALL.iter().map(|f| f.option()).collect(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
