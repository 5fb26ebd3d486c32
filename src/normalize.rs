//! Per-field value normalization against controlled vocabularies and alias
//! tables.
//!
//! Normalization is total: [`normalize_field`] always returns a
//! [`FieldOutcome`], never an error. Mandatory fields that cannot be resolved
//! come back [`FieldOutcome::Invalid`]; unrecognized optional grades degrade to
//! a safe default; malformed optional values (prices, percents, URLs) come back
//! [`FieldOutcome::Suspect`] at warning severity.

use crate::fields::CanonicalField;
use crate::mapping::normalize_token;
use crate::types::{FieldOutcome, FieldValue, HeaderMapping, NormalizedRow, RawRow};

/// Canonical shape vocabulary. Stored values are the lowercase display names.
const SHAPES: &[&str] = &[
    "round brilliant",
    "oval",
    "pear",
    "princess",
    "cushion",
    "emerald",
    "radiant",
    "marquise",
    "asscher",
    "heart",
    "baguette",
    "trilliant",
];

/// Shape alias table, keys pre-normalized (lowercase, alphanumeric only).
/// Covers industry abbreviations and Hebrew vendor spellings.
const SHAPE_ALIASES: &[(&str, &str)] = &[
    ("rb", "round brilliant"),
    ("br", "round brilliant"),
    ("rbc", "round brilliant"),
    ("round", "round brilliant"),
    ("brilliant", "round brilliant"),
    ("ov", "oval"),
    ("ps", "pear"),
    ("pearshape", "pear"),
    ("pr", "princess"),
    ("prin", "princess"),
    ("cu", "cushion"),
    ("cus", "cushion"),
    ("cushionmodified", "cushion"),
    ("em", "emerald"),
    ("emr", "emerald"),
    ("rad", "radiant"),
    ("ra", "radiant"),
    ("mq", "marquise"),
    ("mar", "marquise"),
    ("as", "asscher"),
    ("asch", "asscher"),
    ("sqemerald", "asscher"),
    ("hs", "heart"),
    ("ht", "heart"),
    ("bg", "baguette"),
    ("tr", "trilliant"),
    ("עגול", "round brilliant"),
    ("אובל", "oval"),
    ("אגס", "pear"),
    ("לב", "heart"),
    ("מרובע", "princess"),
    ("קושן", "cushion"),
];

const CLARITIES: &[&str] = &[
    "FL", "IF", "VVS1", "VVS2", "VS1", "VS2", "SI1", "SI2", "SI3", "I1", "I2", "I3",
];

/// Cut/polish/symmetry grade vocabulary.
const GRADES: &[&str] = &["EXCELLENT", "VERY GOOD", "GOOD", "FAIR", "POOR"];

/// Grade aliases, keys pre-normalized (uppercase, alphanumeric only).
const GRADE_ALIASES: &[(&str, &str)] = &[
    ("EX", "EXCELLENT"),
    ("X", "EXCELLENT"),
    ("ID", "EXCELLENT"),
    ("IDEAL", "EXCELLENT"),
    ("VG", "VERY GOOD"),
    ("VGOOD", "VERY GOOD"),
    ("G", "GOOD"),
    ("GD", "GOOD"),
    ("F", "FAIR"),
    ("FR", "FAIR"),
    ("P", "POOR"),
    ("PR", "POOR"),
];

const FLUORESCENCE: &[&str] = &["NONE", "FAINT", "MEDIUM", "STRONG", "VERY STRONG"];

const FLUORESCENCE_ALIASES: &[(&str, &str)] = &[
    ("N", "NONE"),
    ("NON", "NONE"),
    ("NIL", "NONE"),
    ("F", "FAINT"),
    ("FA", "FAINT"),
    ("FNT", "FAINT"),
    ("M", "MEDIUM"),
    ("MED", "MEDIUM"),
    ("S", "STRONG"),
    ("ST", "STRONG"),
    ("STG", "STRONG"),
    ("VS", "VERY STRONG"),
    ("VST", "VERY STRONG"),
    ("VSTG", "VERY STRONG"),
];

/// Grading labs recognized as-is; anything else is kept verbatim (uppercased).
const LABS: &[&str] = &["GIA", "IGI", "HRD", "EGL", "AGS", "GSI", "GCAL"];

/// Default grade substituted for unrecognized optional cut/polish/symmetry.
pub const DEFAULT_GRADE: &str = "GOOD";

/// Normalize one raw row against the file's header mappings.
///
/// Unmapped columns and empty cells contribute no outcome; when two columns map
/// to the same field, the first mapped column wins.
pub fn normalize_row(raw: &RawRow, mappings: &[HeaderMapping]) -> NormalizedRow {
    let mut row = NormalizedRow {
        number: raw.number,
        outcomes: Default::default(),
    };
    for (idx, mapping) in mappings.iter().enumerate() {
        let Some(field) = mapping.field else { continue };
        let Some(cell) = raw.cells.get(idx) else { continue };
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        row.outcomes
            .entry(field)
            .or_insert_with(|| normalize_field(field, trimmed));
    }
    row
}

/// Normalize one non-empty raw value for one canonical field.
pub fn normalize_field(field: CanonicalField, raw: &str) -> FieldOutcome {
    use CanonicalField::*;
    match field {
        Shape => normalize_shape(raw),
        Weight => normalize_weight(raw),
        Color => normalize_color(raw),
        Clarity => normalize_clarity(raw),
        Cut | Polish | Symmetry => normalize_grade(raw),
        Fluorescence => normalize_fluorescence(raw),
        Lab => normalize_lab(raw),
        PricePerCarat | TotalPrice => normalize_price(raw),
        Discount => normalize_signed_number(raw),
        DepthPercent | TablePercent => normalize_percent(raw),
        Ratio => normalize_positive_number(raw),
        ImageUrl | VideoUrl | CertificateUrl => normalize_url(raw),
        CertificateNumber | StockNumber | Measurements | Girdle | Culet | Location | Comment
        | Availability => text(raw),
    }
}

fn text(raw: &str) -> FieldOutcome {
    FieldOutcome::Valid(FieldValue::Text(raw.trim().to_string()))
}

fn normalize_shape(raw: &str) -> FieldOutcome {
    let key = normalize_token(raw);
    for shape in SHAPES {
        if normalize_token(shape) == key {
            return FieldOutcome::Valid(FieldValue::Text((*shape).to_string()));
        }
    }
    for (alias, shape) in SHAPE_ALIASES {
        if *alias == key {
            return FieldOutcome::Valid(FieldValue::Text((*shape).to_string()));
        }
    }
    FieldOutcome::Invalid {
        raw: raw.to_string(),
        reason: format!("unrecognized shape: {raw}"),
    }
}

fn normalize_weight(raw: &str) -> FieldOutcome {
    match parse_number(raw) {
        Some(w) if w > 0.0 => FieldOutcome::Valid(FieldValue::Number(w)),
        _ => FieldOutcome::Invalid {
            raw: raw.to_string(),
            reason: format!("invalid weight: {raw}"),
        },
    }
}

fn normalize_color(raw: &str) -> FieldOutcome {
    let key = vocab_key(raw);
    // The standard grading letters, plus the lumped low-color band.
    if key == "OZ" {
        return FieldOutcome::Valid(FieldValue::Text("O-Z".to_string()));
    }
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if ('D'..='N').contains(&c) {
            return FieldOutcome::Valid(FieldValue::Text(key));
        }
    }
    FieldOutcome::Invalid {
        raw: raw.to_string(),
        reason: format!("invalid color grade: {raw}"),
    }
}

fn normalize_clarity(raw: &str) -> FieldOutcome {
    let key = vocab_key(raw);
    if CLARITIES.contains(&key.as_str()) {
        FieldOutcome::Valid(FieldValue::Text(key))
    } else {
        FieldOutcome::Invalid {
            raw: raw.to_string(),
            reason: format!("invalid clarity grade: {raw}"),
        }
    }
}

fn normalize_grade(raw: &str) -> FieldOutcome {
    let key = vocab_key(raw);
    for grade in GRADES {
        if vocab_key(grade) == key {
            return FieldOutcome::Valid(FieldValue::Text((*grade).to_string()));
        }
    }
    for (alias, grade) in GRADE_ALIASES {
        if *alias == key {
            return FieldOutcome::Valid(FieldValue::Text((*grade).to_string()));
        }
    }
    FieldOutcome::Defaulted {
        value: FieldValue::Text(DEFAULT_GRADE.to_string()),
        reason: format!("unrecognized grade '{raw}', defaulted to {DEFAULT_GRADE}"),
    }
}

fn normalize_fluorescence(raw: &str) -> FieldOutcome {
    let key = vocab_key(raw);
    for grade in FLUORESCENCE {
        if vocab_key(grade) == key {
            return FieldOutcome::Valid(FieldValue::Text((*grade).to_string()));
        }
    }
    for (alias, grade) in FLUORESCENCE_ALIASES {
        if *alias == key {
            return FieldOutcome::Valid(FieldValue::Text((*grade).to_string()));
        }
    }
    FieldOutcome::Invalid {
        raw: raw.to_string(),
        reason: format!("invalid fluorescence grade: {raw}"),
    }
}

fn normalize_lab(raw: &str) -> FieldOutcome {
    let key = vocab_key(raw);
    if LABS.contains(&key.as_str()) {
        FieldOutcome::Valid(FieldValue::Text(key))
    } else {
        FieldOutcome::Valid(FieldValue::Text(raw.trim().to_uppercase()))
    }
}

fn normalize_price(raw: &str) -> FieldOutcome {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    match cleaned.parse::<f64>() {
        Ok(p) if p.is_finite() && p > 0.0 => FieldOutcome::Valid(FieldValue::Number(p)),
        _ => FieldOutcome::Suspect {
            value: FieldValue::Text(raw.trim().to_string()),
            reason: format!("unparseable price: {raw}"),
        },
    }
}

fn normalize_signed_number(raw: &str) -> FieldOutcome {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .collect();
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => FieldOutcome::Valid(FieldValue::Number(n)),
        _ => FieldOutcome::Suspect {
            value: FieldValue::Text(raw.trim().to_string()),
            reason: format!("unparseable number: {raw}"),
        },
    }
}

fn normalize_percent(raw: &str) -> FieldOutcome {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .collect();
    match cleaned.parse::<f64>() {
        Ok(p) if p > 0.0 && p <= 100.0 => FieldOutcome::Valid(FieldValue::Number(p)),
        _ => FieldOutcome::Suspect {
            value: FieldValue::Text(raw.trim().to_string()),
            reason: format!("out-of-range percentage: {raw}"),
        },
    }
}

fn normalize_positive_number(raw: &str) -> FieldOutcome {
    match parse_number(raw) {
        Some(n) if n > 0.0 => FieldOutcome::Valid(FieldValue::Number(n)),
        _ => FieldOutcome::Suspect {
            value: FieldValue::Text(raw.trim().to_string()),
            reason: format!("unparseable number: {raw}"),
        },
    }
}

/// Malformed URLs are a warning, never a rejection; the raw value is kept.
fn normalize_url(raw: &str) -> FieldOutcome {
    let t = raw.trim();
    let rest = t
        .strip_prefix("https://")
        .or_else(|| t.strip_prefix("http://"));
    let well_formed = matches!(rest, Some(r) if !r.is_empty()) && !t.contains(char::is_whitespace);
    if well_formed {
        FieldOutcome::Valid(FieldValue::Text(t.to_string()))
    } else {
        FieldOutcome::Suspect {
            value: FieldValue::Text(t.to_string()),
            reason: format!("malformed url: {t}"),
        }
    }
}

/// Parse a decimal, tolerating a comma decimal separator ("1,05").
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if let Ok(n) = cleaned.parse::<f64>() {
        return n.is_finite().then_some(n);
    }
    if cleaned.contains(',') && !cleaned.contains('.') {
        if let Ok(n) = cleaned.replace(',', ".").parse::<f64>() {
            return n.is_finite().then_some(n);
        }
    }
    None
}

/// Uppercase a string and strip everything non-alphanumeric.
fn vocab_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}
