//! CSV export of dashboard tables

use std::collections::BTreeSet;

use serde_json::Value;
use shared::{Feature, IrrigationNeedRecord, ObservationRecord, AMOUNT_COLUMN, DATE_COLUMN};

use crate::error::{AppError, AppResult};

/// Export service for the tabular views
pub struct ExportService;

impl ExportService {
    /// Observation series as `date,<feature column>`
    pub fn observations_to_csv(feature: Feature, records: &[ObservationRecord]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record([DATE_COLUMN, feature.column()]).map_err(csv_error)?;

        for record in records {
            wtr.write_record([record.date.to_string(), record.feature_value.to_string()])
                .map_err(csv_error)?;
        }

        finish(wtr)
    }

    /// Irrigation needs with every extra column, in lexical order after the fixed ones
    pub fn irrigation_needs_to_csv(records: &[IrrigationNeedRecord]) -> AppResult<String> {
        let extra_columns: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.extra.keys().map(String::as_str))
            .collect();

        let mut wtr = csv::Writer::from_writer(vec![]);
        let header = [DATE_COLUMN, AMOUNT_COLUMN]
            .into_iter()
            .chain(extra_columns.iter().copied());
        wtr.write_record(header).map_err(csv_error)?;

        for record in records {
            let mut row = vec![record.date.to_string(), record.irrigation_amount_mm.to_string()];
            row.extend(
                extra_columns
                    .iter()
                    .map(|column| cell(record.extra.get(*column))),
            );
            wtr.write_record(&row).map_err(csv_error)?;
        }

        finish(wtr)
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("CSV serialization error: {}", e))
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}
