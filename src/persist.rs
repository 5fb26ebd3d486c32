//! Batched persistence with per-batch failure isolation.
//!
//! Accepted rows are partitioned into contiguous fixed-size batches and
//! upserted in order through the caller-supplied [`InventoryStore`]. A failing
//! batch is recorded and does not abort its siblings: isolation, not
//! atomicity, is the contract. There is no automatic retry; re-submitting a
//! corrected file is the operator's retry path.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::observe::{IngestEvent, IngestObserver};
use crate::types::{BatchOutcome, InventoryRecord};

/// Error returned by a store for one failed batch upsert.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Persistence collaborator contract.
///
/// One call upserts one batch keyed by (stock number, owner), so re-submitting
/// a corrected file updates existing records instead of duplicating them. The
/// pipeline does not define the storage schema, only the record shape it hands
/// off.
pub trait InventoryStore: Send + Sync {
    /// Upsert a batch for `owner`. Returns the number of records persisted.
    fn upsert_batch(&self, owner: &str, batch: &[InventoryRecord]) -> Result<usize, StoreError>;
}

/// Cooperative cancellation checked between batches (never mid-batch).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// In-memory [`InventoryStore`] keyed by (stock number, owner).
///
/// The reference collaborator: useful for dry runs, and demonstrates the
/// upsert idempotency the contract expects.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(String, String), InventoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }

    pub fn get(&self, owner: &str, stock_number: &str) -> Option<InventoryRecord> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(&(stock_number.to_string(), owner.to_string()))
            .cloned()
    }

    /// All stored records, in no particular order.
    pub fn records(&self) -> Vec<InventoryRecord> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl InventoryStore for MemoryStore {
    fn upsert_batch(&self, owner: &str, batch: &[InventoryRecord]) -> Result<usize, StoreError> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        for record in batch {
            records.insert(
                (record.stock_number.clone(), owner.to_string()),
                record.clone(),
            );
        }
        Ok(batch.len())
    }
}

/// Persist `records` in contiguous batches of `batch_size`, in order.
///
/// Returns the per-batch outcomes (1-indexed, in batch order) and whether the
/// run was cut short by cancellation. Batches after a cancellation are not
/// attempted and get no outcome.
///
/// # Panics
///
/// Panics if `batch_size == 0`.
pub fn persist_batches(
    records: &[InventoryRecord],
    owner: &str,
    store: &dyn InventoryStore,
    batch_size: usize,
    cancel: &CancelToken,
    observer: Option<&dyn IngestObserver>,
) -> (Vec<BatchOutcome>, bool) {
    assert!(batch_size > 0, "batch_size must be > 0");

    let ranges = batch_ranges(records.len(), batch_size);
    let total = ranges.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, range) in ranges.into_iter().enumerate() {
        if cancel.is_cancelled() {
            emit(observer, IngestEvent::Cancelled { after_batches: i });
            return (outcomes, true);
        }

        let index = i + 1;
        let batch = &records[range];
        emit(
            observer,
            IngestEvent::BatchStarted {
                index,
                total,
                rows: batch.len(),
            },
        );

        let outcome = match store.upsert_batch(owner, batch) {
            Ok(persisted) => BatchOutcome {
                index,
                attempted: batch.len(),
                persisted,
                error: None,
            },
            Err(e) => BatchOutcome {
                index,
                attempted: batch.len(),
                persisted: 0,
                error: Some(e.to_string()),
            },
        };

        emit(
            observer,
            IngestEvent::BatchFinished {
                index,
                total,
                outcome: outcome.clone(),
            },
        );
        outcomes.push(outcome);
    }

    (outcomes, false)
}

fn emit(observer: Option<&dyn IngestObserver>, event: IngestEvent) {
    if let Some(obs) = observer {
        obs.on_event(&event);
    }
}

fn batch_ranges(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(len.div_ceil(batch_size));
    let mut start = 0usize;
    while start < len {
        let end = (start + batch_size).min(len);
        out.push(start..end);
        start = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_ranges_are_contiguous_and_cover_everything() {
        assert_eq!(batch_ranges(0, 50), vec![]);
        assert_eq!(batch_ranges(120, 50), vec![0..50, 50..100, 100..120]);
        assert_eq!(batch_ranges(50, 50), vec![0..50]);
        assert_eq!(batch_ranges(3, 50), vec![0..3]);
    }

    fn record(stock: &str) -> InventoryRecord {
        InventoryRecord {
            stock_number: stock.to_string(),
            shape: "round brilliant".to_string(),
            weight: 1.0,
            color: "G".to_string(),
            clarity: "VS1".to_string(),
            cut: "GOOD".to_string(),
            polish: "GOOD".to_string(),
            symmetry: "GOOD".to_string(),
            fluorescence: "NONE".to_string(),
            lab: None,
            certificate_number: "1".to_string(),
            price_per_carat: None,
            total_price: None,
            discount: None,
            depth_percent: 62.0,
            table_percent: 58.0,
            measurements: None,
            girdle: None,
            culet: None,
            ratio: None,
            image_url: None,
            video_url: None,
            certificate_url: None,
            location: None,
            comment: None,
            availability: None,
        }
    }

    #[test]
    fn memory_store_upsert_overwrites_same_stock_and_owner() {
        let store = MemoryStore::new();
        store.upsert_batch("owner-1", &[record("S1")]).unwrap();
        store.upsert_batch("owner-1", &[record("S1")]).unwrap();
        store.upsert_batch("owner-2", &[record("S1")]).unwrap();
        assert_eq!(store.record_count(), 2);
    }

    #[test]
    fn pre_cancelled_token_persists_nothing() {
        let store = MemoryStore::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let (outcomes, cancelled) =
            persist_batches(&[record("S1")], "o", &store, 50, &cancel, None);
        assert!(cancelled);
        assert!(outcomes.is_empty());
        assert_eq!(store.record_count(), 0);
    }
}
