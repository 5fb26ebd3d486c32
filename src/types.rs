//! Core data model for the ingestion pipeline.
//!
//! Raw parser output ([`RawTable`]) flows through header mapping
//! ([`HeaderMapping`]) and per-field normalization ([`FieldOutcome`]) into
//! either an [`InventoryRecord`] or a set of [`RowError`]s. All of these are
//! plain values; none carries control flow.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::fields::CanonicalField;

/// A parsed tabular file: ordered headers plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// One data row, cells aligned to [`RawTable::headers`].
///
/// `number` is 1-indexed over data rows: the header row is excluded and skipped
/// all-empty rows are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub number: usize,
    pub cells: Vec<String>,
}

/// A typed, normalized cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// Outcome of normalizing one field of one row.
///
/// Normalization is total: every path yields one of these, never an error
/// return, so the validator can apply a single uniform policy.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// The raw value resolved to a vocabulary member or parsed cleanly.
    Valid(FieldValue),
    /// The raw value was unrecognized for an optional field and was replaced by
    /// a safe default.
    Defaulted { value: FieldValue, reason: String },
    /// The raw value is malformed but kept; recorded at warning severity and
    /// never blocks the row.
    Suspect { value: FieldValue, reason: String },
    /// The raw value failed normalization; rejects the row when the field is
    /// mandatory.
    Invalid { raw: String, reason: String },
}

/// One row after normalization. Fields absent from the file (or with empty
/// cells) have no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub number: usize,
    pub outcomes: BTreeMap<CanonicalField, FieldOutcome>,
}

/// Association of one raw column header with a canonical field.
///
/// Computed once per file and immutable afterwards; the same mapping set
/// applies to every row of that file. `field` is `None` for unmapped headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderMapping {
    pub header: String,
    pub field: Option<CanonicalField>,
    pub confidence: f64,
}

/// Severity of a [`RowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rejects the row (mandatory field missing or failing normalization).
    Error,
    /// Recorded but does not reject the row (malformed optional value).
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// One row-level problem, retained as data for the ingestion report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-indexed data row number as it appeared in the source file.
    pub row: usize,
    /// Column label the problem refers to.
    pub field: String,
    /// The offending raw value (empty when the field was absent).
    pub value: String,
    pub reason: String,
    pub severity: Severity,
}

impl RowError {
    pub fn error(
        row: usize,
        field: CanonicalField,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(
        row: usize,
        field: CanonicalField,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
            severity: Severity::Warning,
        }
    }
}

/// Result of persisting one batch of accepted rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// 1-indexed batch number.
    pub index: usize,
    pub attempted: usize,
    pub persisted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The typed record handed to the persistence collaborator.
///
/// Mandatory attributes are always populated; the validator back-fills
/// `cut`/`polish`/`symmetry`/`depth_percent`/`table_percent` and a synthetic
/// `stock_number` when the file did not supply them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub stock_number: String,
    pub shape: String,
    pub weight: f64,
    pub color: String,
    pub clarity: String,
    pub cut: String,
    pub polish: String,
    pub symmetry: String,
    pub fluorescence: String,
    pub lab: Option<String>,
    pub certificate_number: String,
    pub price_per_carat: Option<f64>,
    pub total_price: Option<f64>,
    pub discount: Option<f64>,
    pub depth_percent: f64,
    pub table_percent: f64,
    pub measurements: Option<String>,
    pub girdle: Option<String>,
    pub culet: Option<String>,
    pub ratio: Option<f64>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub certificate_url: Option<String>,
    pub location: Option<String>,
    pub comment: Option<String>,
    pub availability: Option<String>,
}
