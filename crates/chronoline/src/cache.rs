//! The chunk cache: fetched items keyed by position.
//!
//! [`ChunkCache`] holds every item fetched so far, ordered, gap-free and
//! deduplicated by item id. It grows monotonically between resets; the only
//! supported invalidation is [`clear`](ChunkCache::clear), which empties it
//! entirely. Partial invalidation is deliberately unsupported.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::item::TimelineItem;

/// An ordered, gap-free, deduplicated sequence of items indexed by fetch
/// position.
///
/// Invariants:
/// - positions `0..len()` are all present (appends are strictly sequential),
/// - no two cached items share an id.
///
/// The cache is a plain value; the [`LoadController`](crate::LoadController)
/// owns it exclusively and provides the locking.
#[derive(Debug, Default)]
pub struct ChunkCache {
    items: Vec<TimelineItem>,
    ids: HashSet<u64>,
}

impl ChunkCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count of cached items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert a chunk starting at the given position.
    ///
    /// The position must equal the current length: no gaps, no overwrites.
    /// The whole chunk is validated before anything is inserted, so a failed
    /// append leaves the cache untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfOrderWrite`] if `at_position != len()`.
    /// - [`Error::DuplicateId`] if any incoming id is already cached, or
    ///   appears twice within the chunk itself.
    pub fn append(&mut self, items: Vec<TimelineItem>, at_position: usize) -> Result<()> {
        if at_position != self.items.len() {
            tracing::warn!(
                target: "chronoline::cache",
                expected = self.items.len(),
                found = at_position,
                "rejecting out-of-order append"
            );
            return Err(Error::OutOfOrderWrite {
                expected: self.items.len(),
                found: at_position,
            });
        }

        let mut incoming = HashSet::with_capacity(items.len());
        for item in &items {
            if self.ids.contains(&item.id()) || !incoming.insert(item.id()) {
                tracing::warn!(
                    target: "chronoline::cache",
                    id = item.id(),
                    "rejecting chunk with duplicate item id"
                );
                return Err(Error::DuplicateId { id: item.id() });
            }
        }

        tracing::debug!(
            target: "chronoline::cache",
            at_position,
            count = items.len(),
            "appending chunk"
        );
        self.ids.extend(incoming);
        self.items.extend(items);
        Ok(())
    }

    /// The cached items in `[from, to)`.
    ///
    /// # Errors
    ///
    /// [`Error::RangeNotCached`] if any position in the range is missing.
    /// Callers must ensure coverage via fetch first.
    pub fn slice(&self, from: usize, to: usize) -> Result<&[TimelineItem]> {
        if from > to || to > self.items.len() {
            return Err(Error::RangeNotCached {
                from,
                to,
                cached: self.items.len(),
            });
        }
        Ok(&self.items[from..to])
    }

    /// Empty the cache. Used only by reset.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            tracing::debug!(
                target: "chronoline::cache",
                dropped = self.items.len(),
                "clearing cache"
            );
        }
        self.items.clear();
        self.ids.clear();
    }
}
