#![cfg(feature = "excel")]

//! Spreadsheet parsing via calamine.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{IngestError, IngestResult};
use crate::types::{RawRow, RawTable};

/// Decode the first worksheet of a workbook into a [`RawTable`].
///
/// Behavior:
/// - the first non-empty row is the header row
/// - every cell is carried as its display string (integer-valued floats print
///   without the fraction, keeping certificate/stock numbers clean); typing
///   happens later in the normalizer
/// - all-empty rows are skipped and not counted as data rows
pub fn parse_spreadsheet(bytes: &[u8]) -> IngestResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names.first().ok_or_else(|| IngestError::EmptyFile {
        message: "workbook has no sheets".to_string(),
    })?;
    let range = workbook.worksheet_range(first_sheet)?;

    let mut rows_iter = range.rows();
    let header = loop {
        match rows_iter.next() {
            Some(row) if row.iter().any(|c| !matches!(c, Data::Empty)) => break row,
            Some(_) => continue,
            None => {
                return Err(IngestError::EmptyFile {
                    message: format!("sheet '{first_sheet}' has no non-empty rows"),
                });
            }
        }
    };
    let headers: Vec<String> = header
        .iter()
        .map(|c| cell_to_string(c).trim().to_string())
        .collect();
    let width = headers.len();

    let mut rows: Vec<RawRow> = Vec::new();
    for row in rows_iter {
        let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
        cells.resize(width, String::new());
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(RawRow {
            number: rows.len() + 1,
            cells,
        });
    }
    if rows.is_empty() {
        return Err(IngestError::EmptyFile {
            message: format!("sheet '{first_sheet}' has a header but no data rows"),
        });
    }

    Ok(RawTable { headers, rows })
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
