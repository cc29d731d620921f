//! Weather and soil feature allow-list

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Observation columns shared by the historical and forecast tables
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    #[default]
    Temperature,
    Humidity,
    Precipitation,
    Evapotranspiration,
    WindSpeed,
    SoilTemperature,
    SoilMoisture,
    ShortwaveRadiation,
    /// Soil moisture shifted by one day
    SoilMoistureLag1,
}

impl Feature {
    pub const ALL: [Feature; 9] = [
        Feature::Temperature,
        Feature::Humidity,
        Feature::Precipitation,
        Feature::Evapotranspiration,
        Feature::WindSpeed,
        Feature::SoilTemperature,
        Feature::SoilMoisture,
        Feature::ShortwaveRadiation,
        Feature::SoilMoistureLag1,
    ];

    /// URL-safe identifier
    pub fn slug(&self) -> &'static str {
        match self {
            Feature::Temperature => "temperature",
            Feature::Humidity => "humidity",
            Feature::Precipitation => "precipitation",
            Feature::Evapotranspiration => "evapotranspiration",
            Feature::WindSpeed => "wind_speed",
            Feature::SoilTemperature => "soil_temperature",
            Feature::SoilMoisture => "soil_moisture",
            Feature::ShortwaveRadiation => "shortwave_radiation",
            Feature::SoilMoistureLag1 => "soil_moisture_lag1",
        }
    }

    /// Column name in `historical_data` and `present_with_forecast`
    pub fn column(&self) -> &'static str {
        match self {
            Feature::Temperature => "temperature_2m_c",
            Feature::Humidity => "relative_humidity_2m",
            Feature::Precipitation => "precipitation_mm",
            Feature::Evapotranspiration => "et₀_mm",
            Feature::WindSpeed => "wind_speed_10m_kmh",
            Feature::SoilTemperature => "soil_temperature_28_to_100cm_c",
            Feature::SoilMoisture => "soil_moisture_28_to_100cm_m3m3",
            Feature::ShortwaveRadiation => "shortwave_radiation_instant_wm2",
            Feature::SoilMoistureLag1 => "soil_moisture_lag1",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feature::Temperature => "Temperature (2 m)",
            Feature::Humidity => "Relative humidity (2 m)",
            Feature::Precipitation => "Precipitation",
            Feature::Evapotranspiration => "Reference evapotranspiration (ET₀)",
            Feature::WindSpeed => "Wind speed (10 m)",
            Feature::SoilTemperature => "Soil temperature (28-100 cm)",
            Feature::SoilMoisture => "Soil moisture (28-100 cm)",
            Feature::ShortwaveRadiation => "Shortwave radiation",
            Feature::SoilMoistureLag1 => "Soil moisture, previous day",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Feature::Temperature | Feature::SoilTemperature => "°C",
            Feature::Humidity => "%",
            Feature::Precipitation | Feature::Evapotranspiration => "mm",
            Feature::WindSpeed => "km/h",
            Feature::SoilMoisture | Feature::SoilMoistureLag1 => "m³/m³",
            Feature::ShortwaveRadiation => "W/m²",
        }
    }

    pub fn option(&self) -> FeatureOption {
        FeatureOption {
            slug: self.slug(),
            column: self.column(),
            label: self.label(),
            unit: self.unit(),
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    /// Accepts either the slug or the database column name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Feature::ALL
            .into_iter()
            .find(|feature| feature.slug() == wanted || feature.column() == wanted)
            .ok_or_else(|| DomainError::UnknownFeature(s.to_string()))
    }
}

/// Select-box entry for a feature
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeatureOption {
    pub slug: &'static str,
    pub column: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
}
