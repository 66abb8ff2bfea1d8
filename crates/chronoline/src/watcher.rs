//! Dataset-change watching.
//!
//! A [`ChangeWatcher`] observes a supplier's change flag and, on any
//! transition, resets the [`LoadController`](crate::LoadController) and tells
//! the renderer to drop its virtual-scroll position. The watcher does not
//! debounce: every observed transition causes a full reset. Resets are
//! idempotent and cheap, so a burst of flips before a render commits is
//! harmless.

use std::sync::Arc;

use chronoline_core::{ConnectionId, ObservableFlag, Signal};

use crate::controller::LoadController;
use crate::supplier::ItemSupplier;

/// Watches an [`ObservableFlag`] and resets the engine on every transition.
///
/// The flag is an explicit handle passed in by the caller (typically the
/// supplier's own flag from [`ItemSupplier::changes`]) rather than anything
/// discovered implicitly. The direction of a transition is irrelevant:
/// `true -> false` is as dirty as `false -> true`.
///
/// Dropping the watcher unsubscribes from the flag; later flips no longer
/// reach the controller.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chronoline::item::TimelineItem;
/// use chronoline::supplier::{ItemSupplier, VecSupplier};
/// use chronoline::{ChangeWatcher, LoadController};
///
/// let supplier = Arc::new(VecSupplier::new(vec![
///     TimelineItem::new(1, "2021-01-01", "First entry"),
/// ]));
/// let controller = Arc::new(LoadController::new(supplier.clone()));
/// let watcher = ChangeWatcher::new(supplier.changes().unwrap(), controller.clone());
///
/// watcher.invalidated().connect(|_| {
///     // Renderer side: clear the virtual-scroll position, re-render.
/// });
///
/// controller.reveal().unwrap();
/// supplier.replace_items(Vec::new());
/// assert_eq!(controller.revealed_count(), 0);
/// ```
pub struct ChangeWatcher {
    flag: ObservableFlag,
    connection: ConnectionId,
    invalidated: Arc<Signal<()>>,
}

impl ChangeWatcher {
    /// Subscribe to `flag`, resetting `controller` on every transition.
    pub fn new<S>(flag: &ObservableFlag, controller: Arc<LoadController<S>>) -> Self
    where
        S: ItemSupplier + 'static,
    {
        let invalidated = Arc::new(Signal::new());
        let notify = invalidated.clone();
        let connection = flag.changed().connect(move |&value| {
            tracing::debug!(
                target: "chronoline::watcher",
                value,
                "change flag transitioned, resetting engine"
            );
            controller.reset();
            notify.emit(());
        });
        Self {
            flag: flag.clone(),
            connection,
            invalidated,
        }
    }

    /// Fired after each reset so the renderer can clear any retained scroll
    /// position and re-render from an empty sequence.
    pub fn invalidated(&self) -> &Signal<()> {
        &self.invalidated
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.flag.changed().disconnect(self.connection);
    }
}
