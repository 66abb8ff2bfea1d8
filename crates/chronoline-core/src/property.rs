//! Reactive value cells with change detection.
//!
//! [`Property<T>`] wraps a value and reports whether a `set()` actually
//! changed it, so callers can emit a notification signal only on real
//! transitions. [`ObservableFlag`] packages a boolean property together with
//! its transition signal: the "notify me when this value differs from what I
//! last saw" handle that a data source hands to observers.
//!
//! # Example
//!
//! ```
//! use chronoline_core::{Property, Signal};
//!
//! struct Counter {
//!     value: Property<i32>,
//!     value_changed: Signal<i32>,
//! }
//!
//! impl Counter {
//!     fn set_value(&self, new_value: i32) {
//!         if self.value.set(new_value) {
//!             self.value_changed.emit(new_value);
//!         }
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::signal::Signal;

/// A value cell that tracks changes.
///
/// When `set()` is called, the new value is compared with the current one and
/// the return value says whether anything actually changed. This enables
/// efficient change notification.
///
/// # Thread Safety
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// when `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()`
    /// instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    ///
    /// Useful during initialization or batch updates where notifications
    /// should be deferred.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

static_assertions::assert_impl_all!(Property<bool>: Send, Sync);

/// Shared state behind an [`ObservableFlag`] handle.
struct FlagInner {
    value: Property<bool>,
    changed: Signal<bool>,
}

/// A boolean owned by one party and observed by others.
///
/// Cloning an `ObservableFlag` produces another handle to the same flag, so
/// an owner can keep one handle and pass clones to observers. Every observed
/// transition fires the [`changed`](Self::changed) signal with the new value;
/// both directions count: the flag does not distinguish `true -> false`
/// from `false -> true`. Setting the current value again does nothing.
///
/// # Example
///
/// ```
/// use chronoline_core::ObservableFlag;
///
/// let flag = ObservableFlag::new(false);
/// flag.changed().connect(|&value| println!("now {}", value));
///
/// flag.set(true);   // fires
/// flag.set(true);   // no transition, silent
/// flag.set(false);  // fires again
/// ```
#[derive(Clone)]
pub struct ObservableFlag {
    inner: Arc<FlagInner>,
}

impl ObservableFlag {
    /// Create a flag with an initial value.
    pub fn new(initial: bool) -> Self {
        Self {
            inner: Arc::new(FlagInner {
                value: Property::new(initial),
                changed: Signal::new(),
            }),
        }
    }

    /// The current value.
    pub fn get(&self) -> bool {
        self.inner.value.get()
    }

    /// Set the value, firing [`changed`](Self::changed) if it transitioned.
    pub fn set(&self, value: bool) {
        if self.inner.value.set(value) {
            tracing::trace!(
                target: "chronoline_core::property",
                value,
                "observable flag transitioned"
            );
            self.inner.changed.emit(value);
        }
    }

    /// Flip the value. Always a transition, so always fires.
    pub fn toggle(&self) {
        self.set(!self.get());
    }

    /// The transition signal. Receives the new value on every flip.
    pub fn changed(&self) -> &Signal<bool> {
        &self.inner.changed
    }
}

impl Default for ObservableFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for ObservableFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableFlag")
            .field("value", &self.get())
            .finish()
    }
}
