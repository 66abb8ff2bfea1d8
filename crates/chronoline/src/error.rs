//! Error types for the loading engine.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading and caching timeline items.
///
/// The cache-contract violations (`OutOfOrderWrite`, `DuplicateId`) always
/// indicate a misbehaving supplier and are fatal for the current session:
/// the engine surfaces them to the caller and never retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A chunk was appended at a position other than the end of the cache.
    ///
    /// The cache accepts strictly sequential appends only; a gap means the
    /// supplier returned fewer items than it declared at some earlier fetch.
    #[error("out-of-order cache write: expected position {expected}, got {found}")]
    OutOfOrderWrite { expected: usize, found: usize },

    /// An appended chunk contained an item id that is already cached.
    #[error("duplicate item id {id} in appended chunk")]
    DuplicateId { id: u64 },

    /// A slice was requested over positions the cache does not hold.
    ///
    /// This is a programmer error: visibility never advances past what has
    /// been fetched, so well-behaved callers cannot hit it.
    #[error("range {from}..{to} not cached (cache holds {cached} items)")]
    RangeNotCached {
        from: usize,
        to: usize,
        cached: usize,
    },

    /// A reveal was requested with a chunk size of zero.
    #[error("chunk size must be positive")]
    InvalidChunkSize,

    /// The supplier failed to produce a chunk.
    ///
    /// The engine has no retry policy; recovering is the caller's concern.
    #[error("supplier fetch failed: {message}")]
    Fetch { message: String },
}

impl Error {
    /// Create a fetch error from a supplier-side failure.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }
}
