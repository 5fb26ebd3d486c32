//! Tabular file parsing: format detection, delimited text, spreadsheets.
//!
//! The entry point is [`parse_table`], which detects the file kind from the
//! filename extension and yields a [`crate::types::RawTable`] of headers plus
//! raw string rows. Parsing is a pure function over the bytes: typing and
//! vocabulary checks happen later, in the normalizer.

pub mod delimited;
#[cfg(feature = "excel")]
pub mod excel;
pub mod format;

pub use format::{parse_table, SourceFormat};
