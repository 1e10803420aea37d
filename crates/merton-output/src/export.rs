//! CSV and JSON export of event-study results.

use chrono::NaiveDate;
use merton_events::{AbnormalReturnResult, EventOutcome};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One abnormal-return observation, flattened for tabular export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbnormalReturnRecord {
    /// Label of the event the observation belongs to.
    pub label: String,

    /// Observation date within the event window.
    pub date: NaiveDate,

    /// Abnormal return on that date.
    pub abnormal_return: f64,

    /// t-statistic of the abnormal return.
    pub t_stat: f64,
}

/// Flatten one event result into per-date records, in date order.
pub fn abnormal_return_records(result: &AbnormalReturnResult) -> Vec<AbnormalReturnRecord> {
    result
        .abnormal_returns
        .iter()
        .zip(&result.t_ar)
        .map(|(obs, &t_stat)| AbnormalReturnRecord {
            label: result.label.clone(),
            date: obs.date,
            abnormal_return: obs.value,
            t_stat,
        })
        .collect()
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for Vec<AbnormalReturnRecord> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in self {
                    wtr.serialize(record)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes)
                    .map_err(|e| ExportError::Io(std::io::Error::other(e.to_string())))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for AbnormalReturnResult {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => abnormal_return_records(self).export_to_string(format),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Write the per-date abnormal returns of every successful event to one
/// CSV file; failed events contribute no rows.
pub fn write_abnormal_returns_csv(
    path: &Path,
    outcomes: &[EventOutcome],
) -> Result<(), ExportError> {
    let records: Vec<AbnormalReturnRecord> = outcomes
        .iter()
        .filter_map(|outcome| outcome.result.as_ref().ok())
        .flat_map(abnormal_return_records)
        .collect();
    records.export_to_file(path, ExportFormat::Csv)
}

/// Write full event results as pretty-printed JSON, keyed by event label.
/// Failed events appear with their error message under an `"error"` key.
pub fn write_results_json(path: &Path, outcomes: &[EventOutcome]) -> Result<(), ExportError> {
    let mut map = serde_json::Map::new();
    for outcome in outcomes {
        let value = match &outcome.result {
            Ok(result) => serde_json::to_value(result)?,
            Err(err) => serde_json::json!({ "error": err.to_string() }),
        };
        map.insert(outcome.label.clone(), value);
    }
    let content = serde_json::to_string_pretty(&serde_json::Value::Object(map))?;
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use merton_analytics::{MarketModelResult, ReturnObservation};
    use merton_events::{EventWindows, WindowConfig};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 8, d).unwrap()
    }

    fn sample_result() -> AbnormalReturnResult {
        let windows = WindowConfig::default().windows_for(date(5)).unwrap();
        AbnormalReturnResult {
            label: "Merger Announced".to_string(),
            event_date: date(5),
            windows,
            market_model: MarketModelResult {
                beta: 0.85,
                estimation_sample_size: 120,
            },
            abnormal_returns: vec![
                ReturnObservation::new(date(4), 0.012),
                ReturnObservation::new(date(5), 0.345),
            ],
            car: 0.357,
            aar: 0.1785,
            std_ar: 0.02,
            t_ar: vec![0.6, 17.25],
            std_car: 0.0283,
            t_car: 12.62,
        }
    }

    #[test]
    fn test_records_flatten_in_date_order() {
        let records = abnormal_return_records(&sample_result());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "Merger Announced");
        assert_eq!(records[0].date, date(4));
        assert_eq!(records[0].abnormal_return, 0.012);
        assert_eq!(records[0].t_stat, 0.6);
        assert_eq!(records[1].date, date(5));
    }

    #[test]
    fn test_records_csv_contains_header_and_rows() {
        let csv = abnormal_return_records(&sample_result())
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert!(csv.starts_with("label,date,abnormal_return,t_stat"));
        assert!(csv.contains("Merger Announced,2022-08-04,0.012,0.6"));
    }

    #[test]
    fn test_result_json_round_trips() {
        let result = sample_result();
        let json = result.export_to_string(ExportFormat::Json).unwrap();
        let parsed: AbnormalReturnResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.label, result.label);
        assert_eq!(parsed.car, result.car);
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
