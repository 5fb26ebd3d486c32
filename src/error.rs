use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Fatal, file-level error returned by the ingestion pipeline.
///
/// Only conditions that stop a submission before (or instead of) row processing
/// live here. Row-level and batch-level problems are captured as report data
/// ([`crate::types::RowError`], [`crate::types::BatchOutcome`]) and never
/// propagate as `Err`.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet decode error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Delimited-text decode error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no usable content (no header, or a header with no data rows,
    /// or a workbook with no sheets).
    #[error("empty file: {message}")]
    EmptyFile { message: String },

    /// The file's format could not be determined or is not supported.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// Header mapping matched none of the mandatory inventory columns, so no row
    /// could ever be accepted.
    #[error("missing mandatory columns: {message}")]
    MissingMandatoryColumns { message: String },
}
