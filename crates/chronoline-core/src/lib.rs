//! Core primitives for Chronoline.
//!
//! This crate provides the reactive foundation the loading engine is built on:
//!
//! - **Signal/Slot System**: Type-safe change notification between components
//! - **Property System**: Value cells with change detection
//! - **Observable Flags**: Boolean handles that notify on every transition
//!
//! Everything here follows a single-threaded cooperative model: slots run
//! directly on the emitting thread, in connection order. The types are still
//! `Send + Sync` (interior mutability via `parking_lot`), so handles can be
//! shared behind an `Arc` across threads when a host application needs to.
//!
//! # Signal/Slot Example
//!
//! ```
//! use chronoline_core::Signal;
//!
//! let total_changed = Signal::<usize>::new();
//!
//! let conn_id = total_changed.connect(|total| {
//!     println!("Total is now {}", total);
//! });
//!
//! total_changed.emit(25);
//! total_changed.disconnect(conn_id);
//! ```
//!
//! # Observable Flag Example
//!
//! ```
//! use chronoline_core::ObservableFlag;
//!
//! // A flag owned by a data source, watched by the engine.
//! let changes = ObservableFlag::new(false);
//!
//! changes.changed().connect(|&value| {
//!     println!("Flag flipped to {}", value);
//! });
//!
//! // Every transition notifies, regardless of direction.
//! changes.set(true);
//! changes.set(false);
//! ```

mod property;
mod signal;

pub use property::{ObservableFlag, Property};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
