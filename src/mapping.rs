//! Fuzzy header-to-field mapping.
//!
//! Scoring is deliberately lenient: false positives are tolerated because
//! value normalization re-validates every cell, and the mandatory-field gate is
//! an independent second check. The contract, per header/alias pair after
//! normalization (lowercase, strip non-alphanumeric):
//!
//! 1. exact match scores 1.0
//! 2. substring containment scores `(shorter / longer) * 0.9`
//! 3. otherwise, the position-wise character-overlap ratio over the longer
//!    string, scaled by 0.6, considered only when the raw ratio is at least 0.4
//!
//! The best-scoring (field, score) pair per header is kept; a header maps when
//! its best score reaches [`MIN_CONFIDENCE`], else it is unmapped. Ties resolve
//! to the earliest [`crate::fields::REGISTRY`] entry, making mapping fully
//! deterministic.

use crate::fields::{CanonicalField, REGISTRY};
use crate::types::HeaderMapping;

/// Minimum similarity at which a header is considered mapped.
pub const MIN_CONFIDENCE: f64 = 0.2;

const CONTAINMENT_WEIGHT: f64 = 0.9;
const OVERLAP_WEIGHT: f64 = 0.6;
const OVERLAP_FLOOR: f64 = 0.4;

/// Lowercase a string and strip everything non-alphanumeric.
pub fn normalize_token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Similarity between a raw header and a field alias, in [0, 1].
///
/// Pure function over the two strings; no I/O, no registry access.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_token(a);
    let b = normalize_token(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a.contains(&b) || b.contains(&a) {
        let shorter = a_len.min(b_len) as f64;
        let longer = a_len.max(b_len) as f64;
        return shorter / longer * CONTAINMENT_WEIGHT;
    }

    let overlap = positional_overlap(&a, &b);
    if overlap >= OVERLAP_FLOOR {
        overlap * OVERLAP_WEIGHT
    } else {
        0.0
    }
}

/// Share of positions holding the same character, over the longer length.
fn positional_overlap(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longer = a.len().max(b.len());
    let matches = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    matches as f64 / longer as f64
}

/// Map one raw header against every alias of every registry field.
pub fn map_header(header: &str) -> HeaderMapping {
    let mut best: Option<(CanonicalField, f64)> = None;
    for spec in REGISTRY {
        for alias in spec.aliases {
            let score = similarity(header, alias);
            // Strict improvement keeps the earliest registry entry on ties.
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((spec.field, score));
            }
        }
    }

    match best {
        Some((field, score)) if score >= MIN_CONFIDENCE => HeaderMapping {
            header: header.to_string(),
            field: Some(field),
            confidence: score,
        },
        _ => HeaderMapping {
            header: header.to_string(),
            field: None,
            confidence: 0.0,
        },
    }
}

/// Map all headers of a file, one [`HeaderMapping`] per header, in order.
pub fn map_headers(headers: &[String]) -> Vec<HeaderMapping> {
    headers.iter().map(|h| map_header(h)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::CanonicalField;

    #[test]
    fn exact_match_after_normalization_scores_one() {
        assert_eq!(similarity("Cert. No.", "cert no"), 1.0);
        assert_eq!(similarity("WEIGHT", "weight"), 1.0);
    }

    #[test]
    fn containment_scales_by_length_ratio() {
        // "caratweight" (11) contains "carat" (5)
        let score = similarity("Carat Weight", "carat");
        assert!((score - 5.0 / 11.0 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn positional_overlap_requires_the_floor() {
        // colour/color: 4 of 6 positions agree -> 0.4 after scaling
        let score = similarity("colour", "color");
        assert!((score - 4.0 / 6.0 * 0.6).abs() < 1e-12);
        // below the 0.4 raw-ratio floor the branch contributes nothing
        assert_eq!(similarity("shape", "price"), 0.0);
    }

    #[test]
    fn carat_header_maps_to_weight() {
        let m = map_header("Carat");
        assert_eq!(m.field, Some(CanonicalField::Weight));
        assert!(m.confidence >= 0.7);
    }

    #[test]
    fn gibberish_header_is_unmapped_with_zero_confidence() {
        let m = map_header("XYZ123");
        assert_eq!(m.field, None);
        assert_eq!(m.confidence, 0.0);
    }

    #[test]
    fn mapping_is_deterministic() {
        let headers: Vec<String> = ["Shape", "Carat", "Col", "Clar", "Fluo", "Cert", "Stock #"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let first = map_headers(&headers);
        let second = map_headers(&headers);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_header_is_unmapped() {
        let m = map_header("   ");
        assert_eq!(m.field, None);
    }
}
