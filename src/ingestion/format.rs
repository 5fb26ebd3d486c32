//! File-format detection and the parser entrypoint.

use std::path::Path;

use crate::error::{IngestError, IngestResult};
use crate::types::RawTable;

use super::delimited;

/// Supported source-file families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited text: comma, semicolon, or tab separated (delimiter is
    /// auto-detected from the header line).
    Delimited,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Spreadsheet,
}

impl SourceFormat {
    /// Parse a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" | "tsv" => Some(Self::Delimited),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Parse raw file bytes into a [`RawTable`], detecting the format from the
/// filename extension.
pub fn parse_table(bytes: &[u8], filename: &str) -> IngestResult<RawTable> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestError::UnsupportedFormat {
            message: format!("cannot detect format: filename '{filename}' has no extension"),
        })?;

    let format = SourceFormat::from_extension(ext).ok_or_else(|| {
        IngestError::UnsupportedFormat {
            message: format!("unsupported file extension '{ext}'"),
        }
    })?;

    match format {
        SourceFormat::Delimited => delimited::parse_delimited(bytes),
        SourceFormat::Spreadsheet => parse_spreadsheet_dispatch(bytes),
    }
}

fn parse_spreadsheet_dispatch(bytes: &[u8]) -> IngestResult<RawTable> {
    // Avoid unused warnings when the feature is off.
    let _ = bytes;

    #[cfg(feature = "excel")]
    {
        super::excel::parse_spreadsheet(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestError::UnsupportedFormat {
            message: "spreadsheet ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
