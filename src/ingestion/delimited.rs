//! Delimited-text parsing with delimiter auto-detection.

use crate::error::{IngestError, IngestResult};
use crate::types::{RawRow, RawTable};

/// Candidate delimiters, in tie-break preference order.
const CANDIDATES: [u8; 3] = [b',', b';', b'\t'];

/// Parse CSV/TSV/semicolon-separated text into a [`RawTable`].
///
/// The delimiter is detected from the header line. Rows are padded/truncated
/// to the header's column count; all-empty rows are skipped and not counted as
/// data rows.
pub fn parse_delimited(bytes: &[u8]) -> IngestResult<RawTable> {
    let text = String::from_utf8_lossy(bytes);

    let mut non_empty = text.lines().filter(|l| !l.trim().is_empty());
    let header_line = non_empty.next().ok_or_else(|| IngestError::EmptyFile {
        message: "file has no content".to_string(),
    })?;
    if non_empty.next().is_none() {
        return Err(IngestError::EmptyFile {
            message: "file has a header but no data rows".to_string(),
        });
    }

    let delimiter = detect_delimiter(header_line);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let width = headers.len();

    let mut rows: Vec<RawRow> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(width, String::new());
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(RawRow {
            number: rows.len() + 1,
            cells,
        });
    }

    Ok(RawTable { headers, rows })
}

/// Pick the candidate delimiter yielding the most header columns; comma wins
/// ties (strict improvement required to replace it).
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = (CANDIDATES[0], column_count(header_line, CANDIDATES[0]));
    for &candidate in &CANDIDATES[1..] {
        let count = column_count(header_line, candidate);
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

fn column_count(line: &str, delimiter: u8) -> usize {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_reader(line.as_bytes());
    reader
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |record| record.len())
}
