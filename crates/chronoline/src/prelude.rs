//! Prelude module for Chronoline.
//!
//! Re-exports the types most consumers need:
//!
//! ```
//! use chronoline::prelude::*;
//! ```

pub use crate::controller::{ControllerSignals, DEFAULT_CHUNK_SIZE, LoadController};
pub use crate::error::{Error, Result};
pub use crate::item::{DEFAULT_TITLE_DATE_FORMAT, TimelineItem, TitleFormat};
pub use crate::supplier::{ItemSupplier, VecSupplier};
pub use crate::watcher::ChangeWatcher;

pub use chronoline_core::{ConnectionId, ObservableFlag, Property, Signal};
