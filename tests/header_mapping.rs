use gemstone_ingest::fields::CanonicalField;
use gemstone_ingest::mapping::{map_header, map_headers, MIN_CONFIDENCE};

fn mapped_field(header: &str) -> Option<CanonicalField> {
    map_header(header).field
}

#[test]
fn common_header_dialects_map_to_the_right_fields() {
    assert_eq!(mapped_field("Shape"), Some(CanonicalField::Shape));
    assert_eq!(mapped_field("Carat"), Some(CanonicalField::Weight));
    assert_eq!(mapped_field("CT"), Some(CanonicalField::Weight));
    assert_eq!(mapped_field("Colour"), Some(CanonicalField::Color));
    assert_eq!(mapped_field("Clar"), Some(CanonicalField::Clarity));
    assert_eq!(mapped_field("Fluo"), Some(CanonicalField::Fluorescence));
    assert_eq!(mapped_field("Cert. No."), Some(CanonicalField::CertificateNumber));
    assert_eq!(mapped_field("Stock #"), Some(CanonicalField::StockNumber));
    assert_eq!(mapped_field("Price/Carat"), Some(CanonicalField::PricePerCarat));
    assert_eq!(mapped_field("Total Depth"), Some(CanonicalField::DepthPercent));
}

#[test]
fn hebrew_headers_map_through_the_alias_tables() {
    assert_eq!(mapped_field("משקל"), Some(CanonicalField::Weight));
    assert_eq!(mapped_field("צבע"), Some(CanonicalField::Color));
    assert_eq!(mapped_field("הערות"), Some(CanonicalField::Comment));
}

#[test]
fn containment_matches_carry_reduced_confidence() {
    let m = map_header("Stone Shape");
    assert_eq!(m.field, Some(CanonicalField::Shape));
    assert!(m.confidence < 1.0);
    assert!(m.confidence >= MIN_CONFIDENCE);
}

#[test]
fn carat_maps_to_weight_with_high_confidence() {
    let m = map_header("Carat");
    assert_eq!(m.field, Some(CanonicalField::Weight));
    assert!(m.confidence >= 0.7);
}

#[test]
fn unrecognizable_headers_stay_unmapped() {
    let m = map_header("XYZ123");
    assert_eq!(m.field, None);
    assert_eq!(m.confidence, 0.0);
}

#[test]
fn mapping_a_full_header_row_is_deterministic_and_ordered() {
    let headers: Vec<String> = [
        "Stock #",
        "Shape",
        "Carat",
        "Color",
        "Clarity",
        "Fluorescence",
        "Cert Number",
        "XYZ123",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let first = map_headers(&headers);
    let second = map_headers(&headers);
    assert_eq!(first, second);

    // one mapping per header, in header order
    assert_eq!(first.len(), headers.len());
    assert_eq!(first[0].header, "Stock #");
    assert_eq!(first[7].field, None);
}
