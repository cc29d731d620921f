//! Domain errors raised before any query is built

use thiserror::Error;

/// Errors for values that fall outside the fixed allow-lists or bounds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Unknown observation source: {0}")]
    UnknownSource(String),

    #[error("Unknown dashboard page: {0}")]
    UnknownPage(String),

    #[error("Unknown navigation action: {0}")]
    UnknownAction(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Lookahead of {requested} days exceeds the maximum of {max}")]
    LookaheadTooLong { requested: u32, max: u32 },
}

impl DomainError {
    /// Name of the request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            DomainError::UnknownCrop(_) => "crop",
            DomainError::UnknownFeature(_) => "feature",
            DomainError::UnknownSource(_) => "source",
            DomainError::UnknownPage(_) => "page",
            DomainError::UnknownAction(_) => "action",
            DomainError::InvalidDateRange { .. } => "start_date",
            DomainError::InvalidDate(_) => "date",
            DomainError::LookaheadTooLong { .. } => "lookahead_days",
        }
    }
}
