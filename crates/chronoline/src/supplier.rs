//! The data-source boundary.
//!
//! An [`ItemSupplier`] is the read-only contract the engine consumes: a
//! declared total and a batch fetch. A supplier may additionally expose an
//! [`ObservableFlag`] signalling that its dataset changed out from under the
//! engine; the [`ChangeWatcher`](crate::ChangeWatcher) observes it and
//! triggers a full reset on every transition.
//!
//! [`VecSupplier`] is the bundled in-memory implementation, useful for fixed
//! datasets and for tests.

use chronoline_core::ObservableFlag;
use parking_lot::RwLock;

use crate::error::Result;
use crate::item::TimelineItem;

/// A read-only source of timeline items.
///
/// The engine trusts the declared [`total`](Self::total) as ground truth for
/// a session; it is re-read only at reset. [`fetch`](Self::fetch) runs to
/// completion before control returns; the engine holds no more than one
/// outstanding fetch and never retries a failed one.
pub trait ItemSupplier: Send + Sync {
    /// The maximum number of items that can be fetched.
    fn total(&self) -> usize;

    /// Fetch the next batch of items.
    ///
    /// `start_index` is the position of the first item wanted (one past the
    /// last item already held); `chunk_size` is how many are wanted. A
    /// supplier returning fewer items than requested degrades the session:
    /// the shortfall surfaces as an out-of-order write on the following
    /// fetch and is treated as fatal.
    fn fetch(&self, start_index: usize, chunk_size: usize) -> Result<Vec<TimelineItem>>;

    /// The change flag to watch for dataset invalidation, if the supplier
    /// supports dynamic reloads.
    fn changes(&self) -> Option<&ObservableFlag> {
        None
    }
}

/// An in-memory supplier over a vector of items.
///
/// Supports dynamic reloads: [`replace_items`](Self::replace_items) swaps
/// the dataset and flips the change flag, which a connected
/// [`ChangeWatcher`](crate::ChangeWatcher) turns into a full engine reset.
///
/// # Example
///
/// ```
/// use chronoline::item::TimelineItem;
/// use chronoline::supplier::{ItemSupplier, VecSupplier};
///
/// let supplier = VecSupplier::new(vec![
///     TimelineItem::new(1, "2021-01-01", "First entry"),
///     TimelineItem::new(2, "2021-02-14", "Second entry"),
/// ]);
///
/// assert_eq!(supplier.total(), 2);
/// let chunk = supplier.fetch(0, 10).unwrap();
/// assert_eq!(chunk.len(), 2);
/// ```
pub struct VecSupplier {
    items: RwLock<Vec<TimelineItem>>,
    changes: ObservableFlag,
}

impl VecSupplier {
    /// Create a supplier over a fixed set of items.
    pub fn new(items: Vec<TimelineItem>) -> Self {
        Self {
            items: RwLock::new(items),
            changes: ObservableFlag::new(false),
        }
    }

    /// Replace the whole dataset and flip the change flag.
    ///
    /// Observers connected to the flag (normally a `ChangeWatcher`) run
    /// before this returns.
    pub fn replace_items(&self, items: Vec<TimelineItem>) {
        {
            let mut current = self.items.write();
            *current = items;
        }
        tracing::debug!(
            target: "chronoline::supplier",
            total = self.total(),
            "dataset replaced, flipping change flag"
        );
        self.changes.toggle();
    }
}

impl ItemSupplier for VecSupplier {
    fn total(&self) -> usize {
        self.items.read().len()
    }

    fn fetch(&self, start_index: usize, chunk_size: usize) -> Result<Vec<TimelineItem>> {
        let items = self.items.read();
        let from = start_index.min(items.len());
        let to = (start_index + chunk_size).min(items.len());
        Ok(items[from..to].to_vec())
    }

    fn changes(&self) -> Option<&ObservableFlag> {
        Some(&self.changes)
    }
}
