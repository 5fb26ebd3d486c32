//! Mandatory-field enforcement and record assembly.
//!
//! A row is accepted only when every mandatory field is mapped and its
//! normalized value is valid; a row failing on even one mandatory field is
//! rejected in full. Accepted rows are assembled into an
//! [`InventoryRecord`], back-filling the attributes the persistence contract
//! requires with deterministic defaults.

use crate::fields::{mandatory_fields, CanonicalField};
use crate::normalize::DEFAULT_GRADE;
use crate::types::{FieldOutcome, FieldValue, InventoryRecord, NormalizedRow, RowError};

pub const DEFAULT_DEPTH_PERCENT: f64 = 62.0;
pub const DEFAULT_TABLE_PERCENT: f64 = 58.0;

/// What to do about fields that were back-filled with defaults rather than
/// supplied by the file.
///
/// Under [`Flag`](DefaultPolicy::Flag) every back-filled field is disclosed as
/// a warning-severity [`RowError`], so operators can confirm assumed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultPolicy {
    /// Persist defaults without surfacing them in the report.
    Silent,
    /// Disclose each back-filled field as a warning on its row.
    #[default]
    Flag,
}

/// Per-row accept/reject decision.
#[derive(Debug, Clone, PartialEq)]
pub enum RowDecision {
    Accepted {
        record: InventoryRecord,
        /// Warning-severity errors observed on this row (malformed optional
        /// values, disclosed defaults).
        warnings: Vec<RowError>,
        /// Fields whose stored value did not come verbatim from the file.
        defaulted: Vec<CanonicalField>,
    },
    Rejected {
        /// One error per failing mandatory field.
        errors: Vec<RowError>,
    },
}

/// Apply the mandatory-field contract to one normalized row.
///
/// `stamp` is the submission timestamp used to derive synthetic stock numbers
/// for rows without one; combined with the row number it is unique within a
/// submission.
pub fn validate_row(row: &NormalizedRow, policy: DefaultPolicy, stamp: u64) -> RowDecision {
    use CanonicalField::*;

    let mut errors: Vec<RowError> = Vec::new();
    for field in mandatory_fields() {
        match row.outcomes.get(&field) {
            None => errors.push(RowError::error(
                row.number,
                field,
                "",
                "missing mandatory field",
            )),
            Some(FieldOutcome::Invalid { raw, reason }) => {
                errors.push(RowError::error(row.number, field, raw, reason));
            }
            Some(_) => {}
        }
    }
    if !errors.is_empty() {
        return RowDecision::Rejected { errors };
    }

    let mut warnings: Vec<RowError> = Vec::new();
    let mut degraded: Vec<CanonicalField> = Vec::new();
    let mut backfilled: Vec<CanonicalField> = Vec::new();

    for (field, outcome) in &row.outcomes {
        match outcome {
            FieldOutcome::Suspect { value, reason } => warnings.push(RowError::warning(
                row.number,
                *field,
                value.as_text().unwrap_or(""),
                reason,
            )),
            FieldOutcome::Defaulted { reason, .. } => {
                warnings.push(RowError::warning(row.number, *field, "", reason));
                degraded.push(*field);
            }
            _ => {}
        }
    }

    let stock_number = match text_value(row, StockNumber) {
        Some(s) => s,
        None => {
            backfilled.push(StockNumber);
            format!("SYN-{stamp}-{n:04}", n = row.number)
        }
    };

    // Mandatory outcomes are present and valid past the gate above.
    let record = InventoryRecord {
        stock_number,
        shape: text_value(row, Shape).unwrap_or_default(),
        weight: number_value(row, Weight).unwrap_or_default(),
        color: text_value(row, Color).unwrap_or_default(),
        clarity: text_value(row, Clarity).unwrap_or_default(),
        cut: grade_or_default(row, Cut, &mut backfilled),
        polish: grade_or_default(row, Polish, &mut backfilled),
        symmetry: grade_or_default(row, Symmetry, &mut backfilled),
        fluorescence: text_value(row, Fluorescence).unwrap_or_default(),
        lab: text_value(row, Lab),
        certificate_number: text_value(row, CertificateNumber).unwrap_or_default(),
        price_per_carat: number_value(row, PricePerCarat),
        total_price: number_value(row, TotalPrice),
        discount: number_value(row, Discount),
        depth_percent: percent_or_default(row, DepthPercent, DEFAULT_DEPTH_PERCENT, &mut backfilled),
        table_percent: percent_or_default(row, TablePercent, DEFAULT_TABLE_PERCENT, &mut backfilled),
        measurements: text_value(row, Measurements),
        girdle: text_value(row, Girdle),
        culet: text_value(row, Culet),
        ratio: number_value(row, Ratio),
        image_url: text_value(row, ImageUrl),
        video_url: text_value(row, VideoUrl),
        certificate_url: text_value(row, CertificateUrl),
        location: text_value(row, Location),
        comment: text_value(row, Comment),
        availability: text_value(row, Availability),
    };

    if policy == DefaultPolicy::Flag {
        for field in &backfilled {
            warnings.push(RowError::warning(
                row.number,
                *field,
                "",
                "assumed default value (not supplied in file)",
            ));
        }
    }

    let mut defaulted = backfilled;
    defaulted.extend(degraded);

    RowDecision::Accepted {
        record,
        warnings,
        defaulted,
    }
}

fn outcome_value(outcome: &FieldOutcome) -> Option<&FieldValue> {
    match outcome {
        FieldOutcome::Valid(v) => Some(v),
        FieldOutcome::Defaulted { value, .. } | FieldOutcome::Suspect { value, .. } => Some(value),
        FieldOutcome::Invalid { .. } => None,
    }
}

fn text_value(row: &NormalizedRow, field: CanonicalField) -> Option<String> {
    row.outcomes
        .get(&field)
        .and_then(outcome_value)
        .and_then(FieldValue::as_text)
        .map(str::to_string)
}

fn number_value(row: &NormalizedRow, field: CanonicalField) -> Option<f64> {
    row.outcomes
        .get(&field)
        .and_then(outcome_value)
        .and_then(FieldValue::as_number)
}

fn grade_or_default(
    row: &NormalizedRow,
    field: CanonicalField,
    backfilled: &mut Vec<CanonicalField>,
) -> String {
    match text_value(row, field) {
        Some(grade) => grade,
        None => {
            backfilled.push(field);
            DEFAULT_GRADE.to_string()
        }
    }
}

/// A suspect percent was already warned about during normalization and only
/// degrades to the default; a wholly absent one is disclosed as back-filled.
fn percent_or_default(
    row: &NormalizedRow,
    field: CanonicalField,
    default: f64,
    backfilled: &mut Vec<CanonicalField>,
) -> f64 {
    match row.outcomes.get(&field) {
        None => {
            backfilled.push(field);
            default
        }
        Some(outcome) => outcome_value(outcome)
            .and_then(FieldValue::as_number)
            .unwrap_or(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use std::collections::BTreeMap;

    fn valid_row() -> NormalizedRow {
        use CanonicalField::*;
        let mut outcomes = BTreeMap::new();
        outcomes.insert(Shape, FieldOutcome::Valid(FieldValue::Text("round brilliant".into())));
        outcomes.insert(Weight, FieldOutcome::Valid(FieldValue::Number(1.05)));
        outcomes.insert(Color, FieldOutcome::Valid(FieldValue::Text("G".into())));
        outcomes.insert(Clarity, FieldOutcome::Valid(FieldValue::Text("VS1".into())));
        outcomes.insert(Fluorescence, FieldOutcome::Valid(FieldValue::Text("NONE".into())));
        outcomes.insert(
            CertificateNumber,
            FieldOutcome::Valid(FieldValue::Text("123456".into())),
        );
        NormalizedRow { number: 1, outcomes }
    }

    #[test]
    fn one_invalid_mandatory_field_rejects_the_whole_row() {
        let mut row = valid_row();
        row.outcomes.insert(
            CanonicalField::Weight,
            FieldOutcome::Invalid {
                raw: "abc".into(),
                reason: "invalid weight: abc".into(),
            },
        );
        match validate_row(&row, DefaultPolicy::Silent, 0) {
            RowDecision::Rejected { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "weight");
                assert_eq!(errors[0].value, "abc");
                assert_eq!(errors[0].severity, Severity::Error);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_stock_number_gets_a_synthetic_one() {
        let row = valid_row();
        match validate_row(&row, DefaultPolicy::Silent, 1_700_000_000) {
            RowDecision::Accepted { record, defaulted, .. } => {
                assert!(record.stock_number.starts_with("SYN-1700000000-"));
                assert!(defaulted.contains(&CanonicalField::StockNumber));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn flag_policy_discloses_backfilled_fields_as_warnings() {
        let row = valid_row();
        let silent = validate_row(&row, DefaultPolicy::Silent, 0);
        let flagged = validate_row(&row, DefaultPolicy::Flag, 0);
        let warning_count = |d: &RowDecision| match d {
            RowDecision::Accepted { warnings, .. } => warnings.len(),
            RowDecision::Rejected { .. } => panic!("expected acceptance"),
        };
        assert_eq!(warning_count(&silent), 0);
        // stock, cut, polish, symmetry, depth, table are all back-filled
        assert_eq!(warning_count(&flagged), 6);
    }
}
