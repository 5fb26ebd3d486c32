//! `gemstone-ingest` turns arbitrary, inconsistently formatted gemstone
//! inventory exports (CSV / TSV / semicolon-CSV / TXT / XLSX) into validated,
//! normalized inventory records, with partial-failure tracking and auditable
//! error reports.
//!
//! The primary entrypoint is [`pipeline::ingest_bytes`] (or
//! [`pipeline::ingest_from_path`]), which runs the full pipeline over one
//! submitted file:
//!
//! 1. **Parse** ([`ingestion`]): format detection by extension, delimiter
//!    auto-detection for delimited text, spreadsheet decode behind the `excel`
//!    feature (on by default).
//! 2. **Map headers** ([`mapping`]): fuzzy-match each raw column name against
//!    the canonical field registry ([`fields`]), once per file.
//! 3. **Normalize** ([`normalize`]): per-field typing against controlled
//!    vocabularies and multi-language alias tables.
//! 4. **Validate** ([`validate`]): whole-row accept/reject on the mandatory
//!    fields (shape, weight, color, clarity, fluorescence, certificate
//!    number), with deterministic back-fill of persistence defaults.
//! 5. **Persist** ([`persist`]): fixed-size batches upserted through a
//!    caller-supplied [`persist::InventoryStore`], one failing batch never
//!    aborting its siblings.
//! 6. **Report** ([`report`]): one [`report::IngestionReport`] per submission,
//!    JSON-serializable, with an on-demand operator error CSV.
//!
//! Every data row ends up exactly once in either the accepted set or the row
//! error list; no row is silently dropped.
//!
//! ## Quick example
//!
//! ```no_run
//! use gemstone_ingest::persist::MemoryStore;
//! use gemstone_ingest::pipeline::{ingest_from_path, IngestOptions};
//!
//! # fn main() -> Result<(), gemstone_ingest::IngestError> {
//! let store = MemoryStore::new();
//! let report = ingest_from_path("inventory.csv", "vendor-17", &store, &IngestOptions::default())?;
//! println!(
//!     "accepted {} of {} rows, {} persisted",
//!     report.accepted_rows,
//!     report.total_rows,
//!     report.persisted_rows()
//! );
//! if !report.errors.is_empty() {
//!     std::fs::write("errors.csv", report.to_error_csv().expect("serialize error table"))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fields;
pub mod ingestion;
pub mod mapping;
pub mod normalize;
pub mod observe;
pub mod persist;
pub mod pipeline;
pub mod report;
pub mod types;
pub mod validate;

pub use error::{IngestError, IngestResult};
pub use pipeline::{ingest_bytes, ingest_from_path, IngestOptions};
pub use report::IngestionReport;
