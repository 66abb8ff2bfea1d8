//! Incremental loading engine for timeline views.
//!
//! Chronoline renders nothing itself. It is the data-acquisition and
//! cache-consistency core behind a progressively-growing list whose full
//! dataset may be far larger than what should ever sit in memory or in the
//! rendered view at once: it decides which chunk of records to request next,
//! caches and deduplicates what arrives, detects that the upstream dataset
//! changed and must be thrown away, and knows when loading is exhausted.
//! A UI layer supplies the presentation and simply iterates the engine's
//! visible sequence.
//!
//! # Components
//!
//! - [`ItemSupplier`](supplier::ItemSupplier): the read-only data-source
//!   contract: a declared total and a batch fetch
//! - [`ChunkCache`](cache::ChunkCache): fetched items keyed by position,
//!   ordered, gap-free, deduplicated
//! - [`LoadController`](controller::LoadController): orchestrates reveals,
//!   fetches and the visible sequence
//! - [`ChangeWatcher`](watcher::ChangeWatcher): observes the supplier's
//!   change flag and resets everything when it flips
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────┐ reveal_more  ┌────────────────┐  fetch   ┌──────────────┐
//! │ Renderer │─────────────>│ LoadController │─────────>│ ItemSupplier │
//! │          │<─────────────│   ChunkCache   │<─────────│              │
//! └──────────┘ visible      └────────────────┘  items   └──────┬───────┘
//!      ▲                            ▲ reset                    │ changes
//!      │ invalidated         ┌──────┴────────┐                 │
//!      └─────────────────────│ ChangeWatcher │<────────────────┘
//!                            └───────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chronoline::prelude::*;
//!
//! let supplier = Arc::new(VecSupplier::new(
//!     (0..25)
//!         .map(|id| TimelineItem::new(id, format!("Day {id}"), "an event"))
//!         .collect(),
//! ));
//! let controller = Arc::new(LoadController::new(supplier.clone()));
//! let watcher = ChangeWatcher::new(supplier.changes().unwrap(), controller.clone());
//!
//! // Renderer side: reveal on scroll-to-bottom, redraw on invalidation.
//! watcher.invalidated().connect(|_| { /* clear scroll position */ });
//!
//! controller.reveal().unwrap();
//! assert_eq!(controller.revealed_count(), 10);
//!
//! controller.reveal().unwrap();
//! controller.reveal().unwrap();
//! assert!(controller.is_exhausted());
//! assert_eq!(controller.visible_to_vec().unwrap().len(), 25);
//! ```
//!
//! # Concurrency
//!
//! Single-threaded cooperative: fetches run to completion before control
//! returns, and the controller's `in_flight` flag drops (never queues)
//! reveals that arrive while one is outstanding. Types are `Send + Sync`
//! so `Arc` handles can be shared with a host framework.

pub mod cache;
pub mod controller;
pub mod error;
pub mod item;
pub mod prelude;
pub mod supplier;
pub mod watcher;

pub use controller::{ControllerSignals, DEFAULT_CHUNK_SIZE, LoadController};
pub use error::{Error, Result};
pub use item::{TimelineItem, TitleFormat};
pub use supplier::{ItemSupplier, VecSupplier};
pub use watcher::ChangeWatcher;
