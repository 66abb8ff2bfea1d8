//! End-to-end tests of the loading engine: reveal orchestration, cache
//! consistency, change detection and the fetch guard.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use chronoline::prelude::*;
use chronoline::cache::ChunkCache;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn items(range: std::ops::Range<u64>) -> Vec<TimelineItem> {
    range
        .map(|id| TimelineItem::new(id, format!("title {id}"), format!("content {id}")))
        .collect()
}

/// Wraps a `VecSupplier` and records every fetch call.
struct CountingSupplier {
    inner: VecSupplier,
    calls: Mutex<Vec<(usize, usize)>>,
}

impl CountingSupplier {
    fn new(items: Vec<TimelineItem>) -> Self {
        Self {
            inner: VecSupplier::new(items),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.lock().clone()
    }
}

impl ItemSupplier for CountingSupplier {
    fn total(&self) -> usize {
        self.inner.total()
    }

    fn fetch(&self, start_index: usize, chunk_size: usize) -> Result<Vec<TimelineItem>> {
        self.calls.lock().push((start_index, chunk_size));
        self.inner.fetch(start_index, chunk_size)
    }

    fn changes(&self) -> Option<&ObservableFlag> {
        self.inner.changes()
    }
}

/// Declares a total it can never deliver: every fetch returns at most
/// `per_fetch` items.
struct ShortSupplier {
    declared_total: usize,
    per_fetch: usize,
}

impl ItemSupplier for ShortSupplier {
    fn total(&self) -> usize {
        self.declared_total
    }

    fn fetch(&self, start_index: usize, chunk_size: usize) -> Result<Vec<TimelineItem>> {
        let count = chunk_size.min(self.per_fetch);
        Ok((start_index..start_index + count)
            .map(|i| TimelineItem::new(i as u64, format!("title {i}"), ""))
            .collect())
    }
}

/// Fails every fetch.
struct FailingSupplier {
    declared_total: usize,
}

impl ItemSupplier for FailingSupplier {
    fn total(&self) -> usize {
        self.declared_total
    }

    fn fetch(&self, _start_index: usize, _chunk_size: usize) -> Result<Vec<TimelineItem>> {
        Err(Error::fetch("backend unavailable"))
    }
}

/// Re-enters the controller from inside its own fetch, the way a scroll
/// handler firing mid-load would.
struct ReentrantSupplier {
    inner: VecSupplier,
    controller: Mutex<Weak<LoadController<ReentrantSupplier>>>,
    fetch_count: Mutex<usize>,
    saw_loading: Mutex<bool>,
}

impl ReentrantSupplier {
    fn new(items: Vec<TimelineItem>) -> Self {
        Self {
            inner: VecSupplier::new(items),
            controller: Mutex::new(Weak::new()),
            fetch_count: Mutex::new(0),
            saw_loading: Mutex::new(false),
        }
    }
}

impl ItemSupplier for ReentrantSupplier {
    fn total(&self) -> usize {
        self.inner.total()
    }

    fn fetch(&self, start_index: usize, chunk_size: usize) -> Result<Vec<TimelineItem>> {
        *self.fetch_count.lock() += 1;
        if let Some(controller) = self.controller.lock().upgrade() {
            *self.saw_loading.lock() = controller.is_loading();
            // A second reveal arriving before this fetch resolves must be
            // silently dropped, not queued.
            controller.reveal_more(10).unwrap();
        }
        self.inner.fetch(start_index, chunk_size)
    }
}

// -----------------------------------------------------------------------------
// Properties
// -----------------------------------------------------------------------------

#[test]
fn revealed_count_is_monotonic_and_bounded() {
    init_tracing();
    let controller = Arc::new(LoadController::new(Arc::new(VecSupplier::new(items(0..37)))));

    let mut previous = 0;
    for chunk_size in [3, 10, 1, 25, 10, 50, 4] {
        controller.reveal_more(chunk_size).unwrap();
        let revealed = controller.revealed_count();
        assert!(revealed >= previous);
        assert!(revealed <= controller.total());
        previous = revealed;
    }
    assert_eq!(previous, 37);
}

#[test]
fn cached_positions_are_never_fetched_twice() {
    init_tracing();
    let supplier = Arc::new(CountingSupplier::new(items(0..40)));
    let controller = LoadController::new(supplier.clone());

    for chunk_size in [10, 5, 10, 10, 10] {
        controller.reveal_more(chunk_size).unwrap();
    }

    let calls = supplier.calls();
    let mut next_expected = 0;
    for &(start, size) in &calls {
        assert_eq!(start, next_expected, "fetch overlaps cached positions");
        next_expected = start + size;
    }
    assert_eq!(next_expected, 40);
}

#[test]
fn reveal_when_exhausted_is_a_no_op() {
    init_tracing();
    let supplier = Arc::new(CountingSupplier::new(items(0..8)));
    let controller = Arc::new(LoadController::new(supplier.clone()));

    controller.reveal().unwrap();
    assert!(controller.is_exhausted());
    let calls_before = supplier.calls().len();

    let revealed_signal = Arc::new(Mutex::new(0));
    let recv = revealed_signal.clone();
    controller.signals().items_revealed.connect(move |_| {
        *recv.lock() += 1;
    });

    controller.reveal().unwrap();
    controller.reveal_more(100).unwrap();

    assert_eq!(controller.revealed_count(), 8);
    assert_eq!(supplier.calls().len(), calls_before);
    assert_eq!(*revealed_signal.lock(), 0);
    assert!(controller.is_exhausted());
}

#[test]
fn reset_clears_fully() {
    init_tracing();
    let supplier = Arc::new(VecSupplier::new(items(0..30)));
    let controller = LoadController::new(supplier.clone());

    controller.reveal().unwrap();
    controller.reveal().unwrap();
    assert_eq!(controller.revealed_count(), 20);

    controller.reset();

    assert!(controller.visible_to_vec().unwrap().is_empty());
    assert_eq!(controller.revealed_count(), 0);
    assert!(!controller.is_loading());
    // Total is 30, so the engine is not exhausted after reset.
    assert!(!controller.is_exhausted());
}

#[test]
fn oversized_chunk_is_clamped() {
    init_tracing();
    let supplier = Arc::new(CountingSupplier::new(items(0..25)));
    let controller = LoadController::new(supplier.clone());

    controller.reveal_more(20).unwrap();
    controller.reveal_more(20).unwrap();

    assert_eq!(controller.revealed_count(), 25);
    assert_eq!(supplier.calls(), vec![(0, 20), (20, 5)]);
}

// -----------------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------------

#[test]
fn default_chunks_reveal_25_items_in_three_steps() {
    init_tracing();
    let supplier = Arc::new(CountingSupplier::new(items(0..25)));
    let controller = LoadController::new(supplier.clone());

    controller.reveal().unwrap();
    assert_eq!(controller.revealed_count(), 10);
    assert!(!controller.is_exhausted());

    controller.reveal().unwrap();
    assert_eq!(controller.revealed_count(), 20);
    assert!(!controller.is_exhausted());

    controller.reveal().unwrap();
    assert_eq!(controller.revealed_count(), 25);
    assert!(controller.is_exhausted());

    assert_eq!(supplier.calls(), vec![(0, 10), (10, 10), (20, 5)]);

    let ids = controller
        .visible_items(|visible| visible.iter().map(TimelineItem::id).collect::<Vec<_>>())
        .unwrap();
    assert_eq!(ids, (0..25).collect::<Vec<_>>());
}

#[test]
fn empty_supplier_starts_exhausted() {
    init_tracing();
    let supplier = Arc::new(CountingSupplier::new(Vec::new()));
    let controller = LoadController::new(supplier.clone());

    assert!(controller.is_exhausted());
    assert!(controller.visible_to_vec().unwrap().is_empty());

    controller.reveal().unwrap();
    assert!(supplier.calls().is_empty());
}

#[test]
fn change_flag_flip_resets_and_refetches_from_zero() {
    init_tracing();
    let supplier = Arc::new(CountingSupplier::new(items(0..100)));
    let controller = Arc::new(LoadController::new(supplier.clone()));
    let watcher = ChangeWatcher::new(supplier.changes().unwrap(), controller.clone());

    let invalidations = Arc::new(Mutex::new(0));
    let recv = invalidations.clone();
    watcher.invalidated().connect(move |_| {
        *recv.lock() += 1;
    });

    controller.reveal().unwrap();
    controller.reveal().unwrap();
    assert_eq!(controller.revealed_count(), 20);

    supplier.changes().unwrap().set(true);

    assert_eq!(controller.revealed_count(), 0);
    assert!(controller.visible_to_vec().unwrap().is_empty());
    assert_eq!(*invalidations.lock(), 1);

    controller.reveal_more(10).unwrap();
    assert_eq!(controller.revealed_count(), 10);
    assert_eq!(supplier.calls().last(), Some(&(0, 10)));
}

#[test]
fn reentrant_reveal_during_fetch_is_dropped() {
    init_tracing();
    let supplier = Arc::new(ReentrantSupplier::new(items(0..30)));
    let controller = Arc::new(LoadController::new(supplier.clone()));
    *supplier.controller.lock() = Arc::downgrade(&controller);

    controller.reveal_more(10).unwrap();

    assert_eq!(*supplier.fetch_count.lock(), 1);
    assert!(*supplier.saw_loading.lock());
    assert_eq!(controller.revealed_count(), 10);
    assert!(!controller.is_loading());
}

// -----------------------------------------------------------------------------
// Failure semantics
// -----------------------------------------------------------------------------

#[test]
fn fetch_failure_is_surfaced_and_not_retried() {
    init_tracing();
    let controller = LoadController::new(Arc::new(FailingSupplier { declared_total: 10 }));

    let err = controller.reveal().unwrap_err();
    assert_eq!(err, Error::fetch("backend unavailable"));

    // The engine stays consistent: nothing revealed, not stuck in-flight.
    assert_eq!(controller.revealed_count(), 0);
    assert!(!controller.is_loading());
    assert!(controller.visible_to_vec().unwrap().is_empty());
}

#[test]
fn short_returning_supplier_is_a_fatal_contract_violation() {
    init_tracing();
    let controller = LoadController::new(Arc::new(ShortSupplier {
        declared_total: 25,
        per_fetch: 5,
    }));

    // The short chunk itself is accepted as-is...
    controller.reveal().unwrap();
    assert_eq!(controller.revealed_count(), 10);

    // ...but the skipped positions surface on the next append.
    let err = controller.reveal().unwrap_err();
    assert_eq!(
        err,
        Error::OutOfOrderWrite {
            expected: 5,
            found: 10
        }
    );
    assert!(!controller.is_loading());
}

#[test]
fn duplicate_ids_from_supplier_are_fatal() {
    init_tracing();
    // A supplier that serves the same ids for every position.
    struct LoopingSupplier;
    impl ItemSupplier for LoopingSupplier {
        fn total(&self) -> usize {
            20
        }
        fn fetch(&self, _start_index: usize, chunk_size: usize) -> Result<Vec<TimelineItem>> {
            Ok((0..chunk_size as u64)
                .map(|id| TimelineItem::new(id, "looped", ""))
                .collect())
        }
    }

    let controller = LoadController::new(Arc::new(LoopingSupplier));
    controller.reveal().unwrap();

    let err = controller.reveal().unwrap_err();
    assert_eq!(err, Error::DuplicateId { id: 0 });
}

// -----------------------------------------------------------------------------
// Cache leftovers
// -----------------------------------------------------------------------------

#[test]
fn leftover_cache_is_revealed_without_fetching() {
    init_tracing();
    // Returns more than asked: the surplus stays cached but unrevealed.
    struct GreedySupplier {
        inner: CountingSupplier,
    }
    impl ItemSupplier for GreedySupplier {
        fn total(&self) -> usize {
            self.inner.total()
        }
        fn fetch(&self, start_index: usize, chunk_size: usize) -> Result<Vec<TimelineItem>> {
            self.inner.fetch(start_index, chunk_size * 2)
        }
    }

    let supplier = Arc::new(GreedySupplier {
        inner: CountingSupplier::new(items(0..40)),
    });
    let controller = LoadController::new(supplier.clone());

    controller.reveal_more(10).unwrap();
    assert_eq!(controller.revealed_count(), 10);

    // Positions 10..20 are already cached; no second fetch happens.
    controller.reveal_more(10).unwrap();
    assert_eq!(controller.revealed_count(), 20);
    assert_eq!(supplier.inner.calls().len(), 1);

    let ids = controller
        .visible_items(|visible| visible.iter().map(TimelineItem::id).collect::<Vec<_>>())
        .unwrap();
    assert_eq!(ids, (0..20).collect::<Vec<_>>());
}

// -----------------------------------------------------------------------------
// Cache unit behavior exercised through the public surface
// -----------------------------------------------------------------------------

#[test]
fn cache_contract_is_strictly_sequential() {
    init_tracing();
    let mut cache = ChunkCache::new();
    cache.append(items(0..10), 0).unwrap();

    assert_eq!(
        cache.append(items(20..30), 20).unwrap_err(),
        Error::OutOfOrderWrite {
            expected: 10,
            found: 20
        }
    );
    assert_eq!(
        cache.slice(0, 11).unwrap_err(),
        Error::RangeNotCached {
            from: 0,
            to: 11,
            cached: 10
        }
    );

    cache.clear();
    assert!(cache.is_empty());
}
