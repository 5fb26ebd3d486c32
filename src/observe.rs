//! Observer hooks for ingestion progress.
//!
//! The pipeline reports coarse stage progress plus per-batch persistence
//! events, so a caller can render incremental progress (batch *k* of *n*)
//! without blocking on the whole submission.

use std::fmt;
use std::sync::Arc;

use crate::types::BatchOutcome;

/// Progress events emitted during one submission, in pipeline order.
#[derive(Debug, Clone)]
pub enum IngestEvent {
    FileParsed { rows: usize, columns: usize },
    HeadersMapped { mapped: usize, unmapped: usize },
    RowsValidated { accepted: usize, rejected: usize },
    BatchStarted { index: usize, total: usize, rows: usize },
    BatchFinished { index: usize, total: usize, outcome: BatchOutcome },
    Cancelled { after_batches: usize },
    Completed {
        total_rows: usize,
        accepted: usize,
        rejected: usize,
        persisted: usize,
    },
}

/// Observer interface for ingestion progress.
///
/// Implementors can record metrics, logs, or drive a progress UI.
pub trait IngestObserver: Send + Sync {
    fn on_event(&self, event: &IngestEvent);
}

/// Logs ingestion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestObserver for StdErrObserver {
    fn on_event(&self, event: &IngestEvent) {
        eprintln!("[ingest] {event:?}");
    }
}

/// Fans out events to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestObserver for CompositeObserver {
    fn on_event(&self, event: &IngestEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}
