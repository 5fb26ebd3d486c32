//! Canonical inventory fields and the header-alias registry.
//!
//! [`REGISTRY`] is the single source of truth for which columns exist, which are
//! mandatory, and which raw header spellings are known for each. Its order is
//! fixed and is the documented tie-break order for header mapping: when two
//! fields reach the same similarity score, the earlier registry entry wins.

use std::fmt;

use serde::Serialize;

/// One standardized attribute of a gemstone inventory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    Shape,
    Weight,
    Color,
    Clarity,
    Cut,
    Polish,
    Symmetry,
    Fluorescence,
    Lab,
    CertificateNumber,
    StockNumber,
    PricePerCarat,
    TotalPrice,
    Discount,
    DepthPercent,
    TablePercent,
    Measurements,
    Girdle,
    Culet,
    Ratio,
    ImageUrl,
    VideoUrl,
    CertificateUrl,
    Location,
    Comment,
    Availability,
}

impl CanonicalField {
    /// Operator-facing column label used in error reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Shape => "shape",
            Self::Weight => "weight",
            Self::Color => "color",
            Self::Clarity => "clarity",
            Self::Cut => "cut",
            Self::Polish => "polish",
            Self::Symmetry => "symmetry",
            Self::Fluorescence => "fluorescence",
            Self::Lab => "lab",
            Self::CertificateNumber => "certificate number",
            Self::StockNumber => "stock number",
            Self::PricePerCarat => "price per carat",
            Self::TotalPrice => "total price",
            Self::Discount => "discount",
            Self::DepthPercent => "depth percent",
            Self::TablePercent => "table percent",
            Self::Measurements => "measurements",
            Self::Girdle => "girdle",
            Self::Culet => "culet",
            Self::Ratio => "ratio",
            Self::ImageUrl => "image url",
            Self::VideoUrl => "video url",
            Self::CertificateUrl => "certificate url",
            Self::Location => "location",
            Self::Comment => "comment",
            Self::Availability => "availability",
        }
    }

    /// Whether an invalid or missing value for this field rejects the whole row.
    pub fn is_mandatory(self) -> bool {
        spec_of(self).mandatory
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Registry entry: known header spellings and the mandatory flag for one field.
#[derive(Debug)]
pub struct FieldSpec {
    pub field: CanonicalField,
    pub mandatory: bool,
    /// Known raw header spellings, compared case- and punctuation-insensitively.
    /// Includes industry abbreviations and Hebrew vendor-export spellings.
    pub aliases: &'static [&'static str],
}

/// All canonical fields in fixed iteration order.
pub const REGISTRY: &[FieldSpec] = &[
    FieldSpec {
        field: CanonicalField::Shape,
        mandatory: true,
        aliases: &["shape", "shp", "form", "cut shape", "shape name", "צורה"],
    },
    FieldSpec {
        field: CanonicalField::Weight,
        mandatory: true,
        aliases: &[
            "weight", "carat", "carats", "carat weight", "ct", "crt", "size", "משקל", "קרט",
        ],
    },
    FieldSpec {
        field: CanonicalField::Color,
        mandatory: true,
        aliases: &["color", "colour", "col", "color grade", "צבע"],
    },
    FieldSpec {
        field: CanonicalField::Clarity,
        mandatory: true,
        aliases: &["clarity", "clar", "purity", "clarity grade", "ניקיון"],
    },
    FieldSpec {
        field: CanonicalField::Cut,
        mandatory: false,
        aliases: &["cut", "cut grade", "make", "חיתוך"],
    },
    FieldSpec {
        field: CanonicalField::Polish,
        mandatory: false,
        aliases: &["polish", "pol", "ליטוש"],
    },
    FieldSpec {
        field: CanonicalField::Symmetry,
        mandatory: false,
        aliases: &["symmetry", "sym", "symm", "סימטריה"],
    },
    FieldSpec {
        field: CanonicalField::Fluorescence,
        mandatory: true,
        aliases: &[
            "fluorescence", "fluor", "flour", "fluo", "fluorescence intensity", "פלואורסצנציה",
        ],
    },
    FieldSpec {
        field: CanonicalField::Lab,
        mandatory: false,
        aliases: &["lab", "laboratory", "grading lab", "cert lab", "מעבדה"],
    },
    FieldSpec {
        field: CanonicalField::CertificateNumber,
        mandatory: true,
        aliases: &[
            "certificate number", "certificate", "cert number", "cert no", "certificate id",
            "report number", "report no", "cert", "מספר תעודה",
        ],
    },
    FieldSpec {
        field: CanonicalField::StockNumber,
        mandatory: false,
        aliases: &[
            "stock number", "stock", "stock no", "stock id", "sku", "item number", "lot number",
            "vendor stock number", "מספר מלאי",
        ],
    },
    FieldSpec {
        field: CanonicalField::PricePerCarat,
        mandatory: false,
        aliases: &["price per carat", "ppc", "price carat", "price per ct", "מחיר לקרט"],
    },
    FieldSpec {
        field: CanonicalField::TotalPrice,
        mandatory: false,
        aliases: &["total price", "price", "total", "amount", "total amount", "מחיר"],
    },
    FieldSpec {
        field: CanonicalField::Discount,
        mandatory: false,
        aliases: &["discount", "disc", "rap percent", "off rap", "rapnet discount", "הנחה"],
    },
    FieldSpec {
        field: CanonicalField::DepthPercent,
        mandatory: false,
        aliases: &["depth", "depth percent", "total depth", "depth pct", "עומק"],
    },
    FieldSpec {
        field: CanonicalField::TablePercent,
        mandatory: false,
        aliases: &["table", "table percent", "table pct", "שולחן"],
    },
    FieldSpec {
        field: CanonicalField::Measurements,
        mandatory: false,
        aliases: &["measurements", "meas", "dimensions", "measurement", "mm"],
    },
    FieldSpec {
        field: CanonicalField::Girdle,
        mandatory: false,
        aliases: &["girdle", "חגורה"],
    },
    FieldSpec {
        field: CanonicalField::Culet,
        mandatory: false,
        aliases: &["culet"],
    },
    FieldSpec {
        field: CanonicalField::Ratio,
        mandatory: false,
        aliases: &["ratio", "lw ratio", "length width ratio"],
    },
    FieldSpec {
        field: CanonicalField::ImageUrl,
        mandatory: false,
        aliases: &["image", "image url", "image link", "photo", "picture", "img", "תמונה"],
    },
    FieldSpec {
        field: CanonicalField::VideoUrl,
        mandatory: false,
        aliases: &["video", "video url", "video link", "v360", "360 video", "וידאו"],
    },
    FieldSpec {
        field: CanonicalField::CertificateUrl,
        mandatory: false,
        aliases: &["certificate url", "cert url", "cert link", "certificate link", "cert pdf"],
    },
    FieldSpec {
        field: CanonicalField::Location,
        mandatory: false,
        aliases: &["location", "country", "city", "מיקום"],
    },
    FieldSpec {
        field: CanonicalField::Comment,
        mandatory: false,
        aliases: &["comment", "comments", "remark", "remarks", "notes", "הערות"],
    },
    FieldSpec {
        field: CanonicalField::Availability,
        mandatory: false,
        aliases: &["availability", "status", "avail", "זמינות"],
    },
];

/// Look up the registry entry for a field.
pub fn spec_of(field: CanonicalField) -> &'static FieldSpec {
    REGISTRY
        .iter()
        .find(|s| s.field == field)
        .expect("every canonical field has a registry entry")
}

/// Fields whose absence or invalidity rejects the whole row, in registry order.
pub fn mandatory_fields() -> impl Iterator<Item = CanonicalField> {
    REGISTRY.iter().filter(|s| s.mandatory).map(|s| s.field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_field_once() {
        for spec in REGISTRY {
            assert_eq!(
                REGISTRY.iter().filter(|s| s.field == spec.field).count(),
                1,
                "duplicate registry entry for {}",
                spec.field
            );
            assert!(!spec.aliases.is_empty());
        }
    }

    #[test]
    fn six_fields_are_mandatory() {
        let mandatory: Vec<_> = mandatory_fields().collect();
        assert_eq!(
            mandatory,
            vec![
                CanonicalField::Shape,
                CanonicalField::Weight,
                CanonicalField::Color,
                CanonicalField::Clarity,
                CanonicalField::Fluorescence,
                CanonicalField::CertificateNumber,
            ]
        );
    }
}
