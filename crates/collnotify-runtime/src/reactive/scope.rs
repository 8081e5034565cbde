#![forbid(unsafe_code)]

//! Lifecycle management for groups of subscriptions.
//!
//! A [`SubscriptionScope`] collects the subscriptions a logical owner (a view,
//! an undo service, a mirror list) holds across one or more notifiers. When
//! the scope is dropped, every subscription is released at once.
//!
//! # Usage
//!
//! ```ignore
//! let mut scope = SubscriptionScope::new();
//!
//! let items = ChangeNotifier::<String>::new();
//! scope.subscribe(&items, |event| println!("{} x{}", event.action(), event.len()));
//!
//! // When scope drops, all subscriptions are released.
//! ```
//!
//! # Invariants
//!
//! 1. After drop, no callbacks from this scope will fire.
//! 2. `clear()` releases all subscriptions immediately (reusable scope).
//! 3. Subscription count is always accurate.

use collnotify_core::BatchChangeEvent;

use super::notifier::{ChangeNotifier, Subscription};

// ---------------------------------------------------------------------------
// SubscriptionScope — lifecycle management
// ---------------------------------------------------------------------------

/// Collects subscriptions for one owner.
#[derive(Default)]
pub struct SubscriptionScope {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Keep an existing subscription alive until the scope is dropped or cleared.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to a notifier within this scope.
    ///
    /// Returns a reference to the scope for chaining.
    pub fn subscribe<T: 'static>(
        &mut self,
        notifier: &ChangeNotifier<T>,
        callback: impl Fn(&BatchChangeEvent<T>) + 'static,
    ) -> &mut Self {
        let sub = notifier.subscribe(callback);
        self.subscriptions.push(sub);
        self
    }

    /// Number of subscriptions held.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release all subscriptions now; the scope stays usable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl std::fmt::Debug for SubscriptionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionScope")
            .field("subscription_count", &self.subscriptions.len())
            .finish()
    }
}
