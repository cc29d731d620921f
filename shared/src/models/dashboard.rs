//! Dashboard session state
//!
//! The dashboard is a three-page flow. Instead of keeping the current page and
//! selections in framework globals, the whole state travels with each request.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::crop::Crop;
use super::feature::Feature;
use crate::error::DomainError;

/// Pages of the dashboard, in navigation order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPage {
    /// Introduction and option lists
    #[default]
    Landing,
    /// Historical and forecast charts for the selected feature
    Conditions,
    /// Crop details, irrigation needs and alerts for the selected crop
    Irrigation,
}

impl DashboardPage {
    pub fn index(&self) -> usize {
        match self {
            DashboardPage::Landing => 0,
            DashboardPage::Conditions => 1,
            DashboardPage::Irrigation => 2,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DashboardPage::Landing => DashboardPage::Conditions,
            DashboardPage::Conditions | DashboardPage::Irrigation => DashboardPage::Irrigation,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            DashboardPage::Landing | DashboardPage::Conditions => DashboardPage::Landing,
            DashboardPage::Irrigation => DashboardPage::Conditions,
        }
    }
}

impl FromStr for DashboardPage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "landing" | "0" => Ok(DashboardPage::Landing),
            "conditions" | "1" => Ok(DashboardPage::Conditions),
            "irrigation" | "2" => Ok(DashboardPage::Irrigation),
            other => Err(DomainError::UnknownPage(other.to_string())),
        }
    }
}

/// Navigation requested alongside a render
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NavAction {
    Next,
    Back,
}

impl FromStr for NavAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "next" => Ok(NavAction::Next),
            "back" => Ok(NavAction::Back),
            other => Err(DomainError::UnknownAction(other.to_string())),
        }
    }
}

/// Everything the dashboard remembers between interactions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DashboardSession {
    #[serde(default)]
    pub page: DashboardPage,
    #[serde(default)]
    pub feature: Feature,
    #[serde(default)]
    pub crop: Crop,
}

impl DashboardSession {
    pub fn navigate(self, action: NavAction) -> Self {
        let page = match action {
            NavAction::Next => self.page.next(),
            NavAction::Back => self.page.previous(),
        };
        Self { page, ..self }
    }

    pub fn with_feature(self, feature: Feature) -> Self {
        Self { feature, ..self }
    }

    pub fn with_crop(self, crop: Crop) -> Self {
        Self { crop, ..self }
    }
}
