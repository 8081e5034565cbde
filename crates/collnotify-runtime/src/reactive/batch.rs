#![forbid(unsafe_code)]

//! RAII suspension of change notifications.
//!
//! A [`SuspensionGuard`] is returned by
//! [`ChangeNotifier::suspend`](super::ChangeNotifier::suspend). While any
//! guard is held, every reported change is buffered. Releasing the last held
//! guard (by drop or [`SuspensionGuard::resume`]) consolidates the buffer
//! according to the suspension mode and dispatches the result.
//!
//! # Invariants
//!
//! 1. Only the last release dispatches; earlier releases return nothing.
//! 2. Each guard releases exactly once.
//! 3. Nested guards share one buffer. Whichever guard is released last
//!    closes it, so [`SuspensionGuard::discard`] on that guard drops every
//!    buffered change, including changes reported while other guards were
//!    held.

use collnotify_core::{BatchChangeEvent, SuspensionMode};

use super::notifier::ChangeNotifier;

// ---------------------------------------------------------------------------
// SuspensionGuard — one level of suspension
// ---------------------------------------------------------------------------

/// Holds one level of notification suspension.
#[must_use = "dropping this guard resumes notifications immediately"]
pub struct SuspensionGuard<T: PartialEq + 'static> {
    notifier: ChangeNotifier<T>,
    mode: SuspensionMode,
    released: bool,
}

impl<T: PartialEq + 'static> SuspensionGuard<T> {
    pub(crate) fn new(notifier: ChangeNotifier<T>, mode: SuspensionMode) -> Self {
        Self {
            notifier,
            mode,
            released: false,
        }
    }

    /// Mode of the suspension this guard belongs to.
    #[must_use]
    pub fn mode(&self) -> SuspensionMode {
        self.mode
    }

    /// Release this level and return whatever was dispatched.
    ///
    /// Empty for nested guards.
    pub fn resume(mut self) -> Vec<BatchChangeEvent<T>> {
        self.released = true;
        self.notifier.release(false)
    }

    /// Release this level without dispatching.
    ///
    /// If no other guard is still held, the whole shared buffer is dropped,
    /// whichever guard opened the suspension. While another guard is held
    /// this behaves like [`resume`](Self::resume) and the buffer survives.
    pub fn discard(mut self) {
        self.released = true;
        let _ = self.notifier.release(true);
    }
}

impl<T: PartialEq + 'static> Drop for SuspensionGuard<T> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            let _ = self.notifier.release(false);
        }
    }
}

impl<T: PartialEq + 'static> std::fmt::Debug for SuspensionGuard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuspensionGuard")
            .field("mode", &self.mode)
            .field("released", &self.released)
            .finish()
    }
}
