//! End-to-end ingestion pipeline orchestration.
//!
//! [`ingest_bytes`] runs Parser → Mapper → Normalizer → Validator → Persister
//! → Report Builder for one submitted file. Per-row normalization/validation
//! is CPU-bound and embarrassingly parallel, so it runs on a rayon pool with
//! results collected in original row order; persistence is the only I/O stage
//! and runs sequentially so progress reporting stays deterministic.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::{IngestError, IngestResult};
use crate::fields::mandatory_fields;
use crate::ingestion::parse_table;
use crate::mapping::map_headers;
use crate::normalize::normalize_row;
use crate::observe::{IngestEvent, IngestObserver};
use crate::persist::{persist_batches, CancelToken, InventoryStore};
use crate::report::{build_report, IngestionReport};
use crate::types::{InventoryRecord, RowError};
use crate::validate::{validate_row, DefaultPolicy, RowDecision};

/// Default number of accepted rows persisted per upsert call.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Options controlling one submission.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestOptions {
    /// Accepted rows per upsert batch.
    pub batch_size: usize,
    /// Worker threads for row normalization/validation.
    ///
    /// `None` uses the process-wide rayon pool (available parallelism).
    pub num_threads: Option<usize>,
    /// Disclosure policy for back-filled default values.
    pub default_policy: DefaultPolicy,
    /// Optional observer for progress events.
    pub observer: Option<Arc<dyn IngestObserver>>,
    /// Cooperative cancellation, checked between batches.
    pub cancel: CancelToken,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            num_threads: None,
            default_policy: DefaultPolicy::default(),
            observer: None,
            cancel: CancelToken::new(),
        }
    }
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field("batch_size", &self.batch_size)
            .field("num_threads", &self.num_threads)
            .field("default_policy", &self.default_policy)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Ingest a file read from `path`. See [`ingest_bytes`].
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    owner: &str,
    store: &dyn InventoryStore,
    options: &IngestOptions,
) -> IngestResult<IngestionReport> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    ingest_bytes(&bytes, filename, owner, store, options)
}

/// Run the full ingestion pipeline over one submitted file.
///
/// `owner` is the opaque owner key used for upsert keying; together with each
/// record's stock number it makes re-submission idempotent.
///
/// Returns `Err` only for file-level fatal conditions (unreadable/empty file,
/// unsupported format, no mandatory column mapped). Row-level and batch-level
/// problems are captured in the returned [`IngestionReport`].
///
/// # Panics
///
/// Panics if `options.batch_size == 0`.
pub fn ingest_bytes(
    bytes: &[u8],
    filename: &str,
    owner: &str,
    store: &dyn InventoryStore,
    options: &IngestOptions,
) -> IngestResult<IngestionReport> {
    assert!(options.batch_size > 0, "batch_size must be > 0");
    let observer = options.observer.as_deref();

    let table = parse_table(bytes, filename)?;
    emit(
        observer,
        IngestEvent::FileParsed {
            rows: table.rows.len(),
            columns: table.headers.len(),
        },
    );

    let mappings = map_headers(&table.headers);
    let mapped = mappings.iter().filter(|m| m.field.is_some()).count();
    emit(
        observer,
        IngestEvent::HeadersMapped {
            mapped,
            unmapped: mappings.len() - mapped,
        },
    );

    let mapped_fields: BTreeSet<_> = mappings.iter().filter_map(|m| m.field).collect();
    if !mandatory_fields().any(|f| mapped_fields.contains(&f)) {
        let expected: Vec<&str> = mandatory_fields().map(|f| f.label()).collect();
        return Err(IngestError::MissingMandatoryColumns {
            message: format!(
                "none of the mandatory columns ({}) matched the file's headers",
                expected.join(", ")
            ),
        });
    }

    let stamp = unix_ts();
    let policy = options.default_policy;
    let decisions: Vec<RowDecision> = run_on_pool(options.num_threads, || {
        table
            .rows
            .par_iter()
            .map(|raw| validate_row(&normalize_row(raw, &mappings), policy, stamp))
            .collect()
    });

    let total_rows = table.rows.len();
    let mut accepted: Vec<InventoryRecord> = Vec::new();
    let mut errors: Vec<RowError> = Vec::new();
    for decision in decisions {
        match decision {
            RowDecision::Accepted {
                record,
                mut warnings,
                ..
            } => {
                accepted.push(record);
                errors.append(&mut warnings);
            }
            RowDecision::Rejected { errors: mut errs } => errors.append(&mut errs),
        }
    }
    let accepted_rows = accepted.len();
    emit(
        observer,
        IngestEvent::RowsValidated {
            accepted: accepted_rows,
            rejected: total_rows - accepted_rows,
        },
    );

    let (batches, cancelled) = persist_batches(
        &accepted,
        owner,
        store,
        options.batch_size,
        &options.cancel,
        observer,
    );

    let report = build_report(mappings, errors, batches, total_rows, accepted_rows, cancelled);
    emit(
        observer,
        IngestEvent::Completed {
            total_rows,
            accepted: report.accepted_rows,
            rejected: report.rejected_rows,
            persisted: report.persisted_rows(),
        },
    );
    Ok(report)
}

fn run_on_pool<T, F>(num_threads: Option<usize>, f: F) -> T
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    match num_threads {
        Some(n) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(n.max(1))
                .build()
                .expect("failed to build rayon thread pool");
            pool.install(f)
        }
        None => f(),
    }
}

fn emit(observer: Option<&dyn IngestObserver>, event: IngestEvent) {
    if let Some(obs) = observer {
        obs.on_event(&event);
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
