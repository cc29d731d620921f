//! Crop allow-list and crop reference data

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::irrigation::decimal_cell;
use crate::error::DomainError;

/// Crops with irrigation-need and metadata tables in the database
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(try_from = "String")]
pub enum Crop {
    #[default]
    Wheat,
    Rice,
    Maize,
    Sugarcane,
    Cotton,
    Barley,
    Potatoes,
    Pulses,
}

impl Crop {
    /// Every crop, in select-box order
    pub const ALL: [Crop; 8] = [
        Crop::Wheat,
        Crop::Rice,
        Crop::Maize,
        Crop::Sugarcane,
        Crop::Cotton,
        Crop::Barley,
        Crop::Potatoes,
        Crop::Pulses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Crop::Wheat => "Wheat",
            Crop::Rice => "Rice",
            Crop::Maize => "Maize",
            Crop::Sugarcane => "Sugarcane",
            Crop::Cotton => "Cotton",
            Crop::Barley => "Barley",
            Crop::Potatoes => "Potatoes",
            Crop::Pulses => "Pulses",
        }
    }

    /// Table holding the per-date irrigation requirement for this crop
    pub fn irrigation_table(&self) -> &'static str {
        match self {
            Crop::Wheat => "wheat_irrigation_need",
            Crop::Rice => "rice_irrigation_need",
            Crop::Maize => "maize_irrigation_need",
            Crop::Sugarcane => "sugarcane_irrigation_need",
            Crop::Cotton => "cotton_irrigation_need",
            Crop::Barley => "barley_irrigation_need",
            Crop::Potatoes => "potatoes_irrigation_need",
            Crop::Pulses => "pulses_irrigation_need",
        }
    }

    /// Table holding the static growing conditions for this crop
    pub fn detail_table(&self) -> &'static str {
        match self {
            Crop::Wheat => "wheat_data",
            Crop::Rice => "rice_data",
            Crop::Maize => "maize_data",
            Crop::Sugarcane => "sugarcane_data",
            Crop::Cotton => "cotton_data",
            Crop::Barley => "barley_data",
            Crop::Potatoes => "potatoes_data",
            Crop::Pulses => "pulses_data",
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Crop {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Crop::ALL
            .into_iter()
            .find(|crop| crop.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownCrop(s.to_string()))
    }
}

impl TryFrom<String> for Crop {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Optimal growing conditions for a crop
///
/// Columns beyond the well-known ranges are kept in `extra` exactly as the
/// database returned them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropDetailRecord {
    pub crop: Crop,
    pub optimal_temperature_min: Option<Decimal>,
    pub optimal_temperature_max: Option<Decimal>,
    pub optimal_humidity_min: Option<Decimal>,
    pub optimal_humidity_max: Option<Decimal>,
    pub optimal_soil_moisture_min: Option<Decimal>,
    pub optimal_soil_moisture_max: Option<Decimal>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

const RANGE_COLUMNS: [&str; 6] = [
    "optimal_temperature_min",
    "optimal_temperature_max",
    "optimal_humidity_min",
    "optimal_humidity_max",
    "optimal_soil_moisture_min",
    "optimal_soil_moisture_max",
];

impl CropDetailRecord {
    /// Build a detail record from one row of `<crop>_data` encoded as a JSON object
    ///
    /// A range cell that is not numeric stays in `extra` as-is and the bound
    /// is treated as unknown.
    pub fn from_row(crop: Crop, row: serde_json::Value) -> Result<Self, serde_json::Error> {
        let serde_json::Value::Object(mut columns) = row else {
            return Err(serde::de::Error::custom(format!(
                "{} row is not a JSON object",
                crop.detail_table()
            )));
        };

        let mut ranges = [None; 6];
        for (bound, column) in ranges.iter_mut().zip(RANGE_COLUMNS) {
            let parsed = match columns.get(column) {
                None => continue,
                Some(serde_json::Value::Null) => None,
                Some(value) => match decimal_cell(value) {
                    Some(parsed) => Some(parsed),
                    None => continue,
                },
            };
            columns.remove(column);
            *bound = parsed;
        }
        let [temperature_min, temperature_max, humidity_min, humidity_max, soil_min, soil_max] = ranges;

        Ok(Self {
            crop,
            optimal_temperature_min: temperature_min,
            optimal_temperature_max: temperature_max,
            optimal_humidity_min: humidity_min,
            optimal_humidity_max: humidity_max,
            optimal_soil_moisture_min: soil_min,
            optimal_soil_moisture_max: soil_max,
            extra: columns.into_iter().collect(),
        })
    }

    /// Whether a temperature lies inside the optimal range (unknown bounds are open)
    pub fn temperature_in_range(&self, celsius: Decimal) -> bool {
        within(celsius, self.optimal_temperature_min, self.optimal_temperature_max)
    }

    pub fn humidity_in_range(&self, percent: Decimal) -> bool {
        within(percent, self.optimal_humidity_min, self.optimal_humidity_max)
    }

    pub fn soil_moisture_in_range(&self, value: Decimal) -> bool {
        within(value, self.optimal_soil_moisture_min, self.optimal_soil_moisture_max)
    }
}

fn within(value: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}
