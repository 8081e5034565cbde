#![forbid(unsafe_code)]

//! Change notification for observable collections.
//!
//! This module provides the host-facing half of collnotify:
//!
//! - [`ChangeNotifier`]: a shared notifier a collection calls on every add or
//!   remove. Changes are dispatched to subscribers immediately, or buffered
//!   while notifications are suspended.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//! - [`SuspensionGuard`]: RAII guard that buffers every change until the
//!   outermost guard is released, then dispatches the consolidated batch.
//! - [`SubscriptionScope`]: holds many subscriptions for one logical owner.
//!
//! # Architecture
//!
//! `ChangeNotifier<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Subscribers are stored as `Weak` callbacks and cleaned up lazily
//! during dispatch.
//!
//! Suspension owns one [`SuspensionContext`](collnotify_core::SuspensionContext)
//! at a time. Nested guards share it; only releasing the outermost guard
//! consolidates and dispatches.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Events from one release are dispatched in the order the engine returns.
//! 3. Nested suspensions must use the active mode.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    dispatch.
//! 5. Callbacks run with no internal borrow held, so they may call back into
//!    the notifier.

pub mod batch;
pub mod notifier;
pub mod scope;

pub use batch::SuspensionGuard;
pub use notifier::{ChangeNotifier, Subscription};
pub use scope::SubscriptionScope;
