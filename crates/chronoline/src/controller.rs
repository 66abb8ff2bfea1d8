//! The load controller: reveal orchestration and fetch scheduling.
//!
//! [`LoadController`] is the renderer's single point of contact. It decides
//! when a reveal can be satisfied from cache and when a fetch is needed,
//! enforces at most one outstanding fetch, and exposes the currently visible
//! item sequence.

use std::sync::Arc;

use chronoline_core::Signal;
use parking_lot::Mutex;

use crate::cache::ChunkCache;
use crate::error::{Error, Result};
use crate::item::TimelineItem;
use crate::supplier::ItemSupplier;

/// Chunk size used by [`LoadController::reveal`].
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Signals emitted by a [`LoadController`].
///
/// A renderer connects to these to stay synchronized with the engine. All
/// signals fire after the controller's state is fully updated, so slots may
/// query the controller re-entrantly.
pub struct ControllerSignals {
    /// Emitted when the visible range grows. Args: (old, new revealed count).
    pub items_revealed: Signal<(usize, usize)>,

    /// Emitted after a full reset: the cache is empty and the revealed count
    /// is back to zero.
    pub reset: Signal<()>,

    /// Emitted when the controller becomes exhausted: every item up to the
    /// supplier's total has been revealed.
    pub exhausted: Signal<()>,
}

impl ControllerSignals {
    fn new() -> Self {
        Self {
            items_revealed: Signal::new(),
            reset: Signal::new(),
            exhausted: Signal::new(),
        }
    }
}

/// Mutable engine state, guarded by one lock.
struct ControllerState {
    cache: ChunkCache,
    /// How many leading cache positions are exposed to the renderer.
    revealed: usize,
    /// A fetch is outstanding. The sole concurrency guard: reveals arriving
    /// while set are dropped, not queued.
    in_flight: bool,
    /// `revealed == total`.
    exhausted: bool,
    /// Supplier-declared upper bound, fixed between resets.
    total: usize,
}

/// Orchestrates how many items are revealed and when to fetch the next chunk.
///
/// The controller owns the [`ChunkCache`] exclusively; nothing else mutates
/// it. Methods take `&self` (state lives behind a `parking_lot::Mutex`), so
/// a renderer can hold the controller in an `Arc` and call it from event
/// handlers.
///
/// The lock is *not* held across [`ItemSupplier::fetch`]: a supplier that
/// re-enters the controller during a fetch sees `in_flight == true` and the
/// re-entrant reveal is dropped.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chronoline::item::TimelineItem;
/// use chronoline::supplier::VecSupplier;
/// use chronoline::LoadController;
///
/// let supplier = Arc::new(VecSupplier::new(
///     (0..25).map(|id| TimelineItem::new(id, "title", "content")).collect(),
/// ));
/// let controller = LoadController::new(supplier);
///
/// controller.reveal().unwrap();
/// assert_eq!(controller.revealed_count(), 10);
/// assert!(!controller.is_exhausted());
/// ```
pub struct LoadController<S: ItemSupplier> {
    supplier: Arc<S>,
    state: Mutex<ControllerState>,
    signals: ControllerSignals,
}

impl<S: ItemSupplier> LoadController<S> {
    /// Create a controller over a supplier.
    ///
    /// The supplier's total is read once here; it is treated as ground truth
    /// until the next [`reset`](Self::reset). A total of zero starts the
    /// controller already exhausted; no fetch is ever issued.
    pub fn new(supplier: Arc<S>) -> Self {
        let total = supplier.total();
        tracing::debug!(target: "chronoline::controller", total, "controller created");
        Self {
            supplier,
            state: Mutex::new(ControllerState {
                cache: ChunkCache::new(),
                revealed: 0,
                in_flight: false,
                exhausted: total == 0,
                total,
            }),
            signals: ControllerSignals::new(),
        }
    }

    /// Reveal up to [`DEFAULT_CHUNK_SIZE`] more items.
    pub fn reveal(&self) -> Result<()> {
        self.reveal_more(DEFAULT_CHUNK_SIZE)
    }

    /// Reveal up to `chunk_size` more items, fetching from the supplier if
    /// the cache does not already cover them.
    ///
    /// Safe to call repeatedly from triggers that fire faster than a render
    /// commits: calls made while exhausted or while a fetch is outstanding
    /// are silently dropped. A chunk size larger than the remaining items is
    /// clamped, never over-fetching past the total.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidChunkSize`] for `chunk_size == 0`.
    /// - [`Error::Fetch`] if the supplier fails; the controller is left
    ///   consistent and not in-flight, but the engine does not retry.
    /// - [`Error::OutOfOrderWrite`] / [`Error::DuplicateId`] on a supplier
    ///   contract violation, fatal for this session.
    pub fn reveal_more(&self, chunk_size: usize) -> Result<()> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }

        let (start, need) = {
            let mut state = self.state.lock();
            if state.exhausted || state.in_flight {
                tracing::trace!(
                    target: "chronoline::controller",
                    exhausted = state.exhausted,
                    in_flight = state.in_flight,
                    "dropping reveal request"
                );
                return Ok(());
            }

            let need = chunk_size.min(state.total - state.revealed);
            if state.cache.len() >= state.revealed + need {
                // Already cached, e.g. left over from before a reveal that
                // never committed. Advance without fetching.
                let old = state.revealed;
                state.revealed += need;
                state.exhausted = state.revealed == state.total;
                let exhausted = state.exhausted;
                let new = state.revealed;
                drop(state);

                tracing::debug!(
                    target: "chronoline::controller",
                    old, new,
                    "revealed from cache"
                );
                self.signals.items_revealed.emit((old, new));
                if exhausted {
                    self.signals.exhausted.emit(());
                }
                return Ok(());
            }

            state.in_flight = true;
            (state.revealed, need)
        };

        tracing::debug!(
            target: "chronoline::controller",
            start, need,
            "fetching chunk"
        );
        // Lock released: a re-entrant reveal during this call is dropped by
        // the in_flight guard above.
        let fetched = self.supplier.fetch(start, need);

        let mut state = self.state.lock();
        state.in_flight = false;

        let items = match fetched {
            Ok(items) => items,
            Err(err) => {
                drop(state);
                tracing::warn!(
                    target: "chronoline::controller",
                    start, need,
                    error = %err,
                    "supplier fetch failed"
                );
                return Err(err);
            }
        };

        if let Err(err) = state.cache.append(items, start) {
            drop(state);
            tracing::warn!(
                target: "chronoline::controller",
                error = %err,
                "supplier violated the cache contract"
            );
            return Err(err);
        }

        // Advance by what was asked for, trusting the declared total. A
        // short-returning supplier leaves a gap that the next append reports
        // as an out-of-order write.
        let old = state.revealed;
        state.revealed = start + need;
        state.exhausted = state.revealed == state.total;
        let exhausted = state.exhausted;
        let new = state.revealed;
        drop(state);

        self.signals.items_revealed.emit((old, new));
        if exhausted {
            tracing::debug!(target: "chronoline::controller", total = new, "exhausted");
            self.signals.exhausted.emit(());
        }
        Ok(())
    }

    /// Access the visible item sequence (the leading `revealed_count()`
    /// cache entries, in fetch order) without cloning.
    ///
    /// # Errors
    ///
    /// [`Error::RangeNotCached`] only if a misbehaving supplier previously
    /// returned fewer items than requested.
    pub fn visible_items<R>(&self, f: impl FnOnce(&[TimelineItem]) -> R) -> Result<R> {
        let state = self.state.lock();
        let visible = state.cache.slice(0, state.revealed)?;
        Ok(f(visible))
    }

    /// The visible item sequence as an owned vector.
    pub fn visible_to_vec(&self) -> Result<Vec<TimelineItem>> {
        self.visible_items(|items| items.to_vec())
    }

    /// `true` once every item up to the total has been revealed.
    pub fn is_exhausted(&self) -> bool {
        self.state.lock().exhausted
    }

    /// `true` while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight
    }

    /// How many items are currently exposed to the renderer.
    pub fn revealed_count(&self) -> usize {
        self.state.lock().revealed
    }

    /// The supplier-declared upper bound for this session.
    pub fn total(&self) -> usize {
        self.state.lock().total
    }

    /// Signals for renderers to observe.
    pub fn signals(&self) -> &ControllerSignals {
        &self.signals
    }

    /// Return to the initial state: empty cache, nothing revealed, total
    /// re-read from the supplier.
    ///
    /// Intended to be called by a [`ChangeWatcher`](crate::ChangeWatcher),
    /// but exposed for manual re-sync. Idempotent and cheap; resetting an
    /// already-empty engine is a no-op apart from the signals.
    pub fn reset(&self) {
        let exhausted = {
            let mut state = self.state.lock();
            state.cache.clear();
            state.revealed = 0;
            state.in_flight = false;
            state.total = self.supplier.total();
            state.exhausted = state.total == 0;
            tracing::debug!(
                target: "chronoline::controller",
                total = state.total,
                "reset"
            );
            state.exhausted
        };

        self.signals.reset.emit(());
        if exhausted {
            self.signals.exhausted.emit(());
        }
    }
}
