//! Ingestion report assembly and serialization.
//!
//! Pure aggregation over the upstream stages' outputs; the pipeline does not
//! persist reports itself, callers do.

use serde::Serialize;

use crate::types::{BatchOutcome, HeaderMapping, RowError};

/// The complete, serializable outcome of processing one submitted file.
///
/// Immutable once returned. `accepted_rows + rejected_rows == total_rows`
/// always holds: every data row is accounted for exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    pub total_rows: usize,
    pub accepted_rows: usize,
    pub rejected_rows: usize,
    pub header_mappings: Vec<HeaderMapping>,
    pub errors: Vec<RowError>,
    pub batches: Vec<BatchOutcome>,
    /// True when the submission was cut short by cooperative cancellation; the
    /// batch outcomes then reflect only what was actually attempted.
    pub cancelled: bool,
}

impl IngestionReport {
    /// Total records actually persisted, summed over all batch outcomes.
    pub fn persisted_rows(&self) -> usize {
        self.batches.iter().map(|b| b.persisted).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize the error list to a flat CSV table
    /// (`Row, Column, Value, Error, Severity`) for operator download and
    /// corrective re-upload.
    pub fn to_error_csv(&self) -> Result<String, csv::Error> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["Row", "Column", "Value", "Error", "Severity"])?;
        for e in &self.errors {
            let row = e.row.to_string();
            let severity = e.severity.to_string();
            wtr.write_record([
                row.as_str(),
                e.field.as_str(),
                e.value.as_str(),
                e.reason.as_str(),
                severity.as_str(),
            ])?;
        }
        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Merge the per-stage outputs into one report value.
pub fn build_report(
    header_mappings: Vec<HeaderMapping>,
    errors: Vec<RowError>,
    batches: Vec<BatchOutcome>,
    total_rows: usize,
    accepted_rows: usize,
    cancelled: bool,
) -> IngestionReport {
    IngestionReport {
        total_rows,
        accepted_rows,
        rejected_rows: total_rows - accepted_rows,
        header_mappings,
        errors,
        batches,
        cancelled,
    }
}
