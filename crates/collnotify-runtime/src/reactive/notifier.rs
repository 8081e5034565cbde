#![forbid(unsafe_code)]

//! Shared change notifier with subscriber management.
//!
//! # Usage
//!
//! ```ignore
//! use collnotify_runtime::{ChangeNotifier, MutationAction, SuspensionMode};
//!
//! let notifier = ChangeNotifier::new();
//! let _sub = notifier.subscribe(|event| println!("{:?}", event.action()));
//!
//! // Dispatched immediately as a one-item Add event.
//! notifier.notify("a", Some(0), MutationAction::Add)?;
//!
//! {
//!     let _guard = notifier.suspend(SuspensionMode::MixedConsolidate)?;
//!     notifier.notify("b", Some(1), MutationAction::Add)?;
//!     notifier.notify("b", Some(1), MutationAction::Remove)?;
//! } // Net effect is empty: nothing is dispatched.
//! ```
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the caller of `notify` or of the guard
//!   release that triggered dispatch.
//! - Notifier dropped while subscriptions alive: subscriptions are inert.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use collnotify_core::{
    BatchChangeEvent, MutationAction, Result, SuspendConfig, SuspendError, SuspensionContext,
    SuspensionMode,
};

use super::batch::SuspensionGuard;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

type Callback<T> = dyn Fn(&BatchChangeEvent<T>);

struct Slot<T> {
    callback: Box<Callback<T>>,
}

/// The open suspension shared by all nested guards.
struct Active<T> {
    context: SuspensionContext<T>,
    depth: usize,
}

struct Inner<T> {
    config: SuspendConfig,
    subscribers: Vec<Weak<Slot<T>>>,
    active: Option<Active<T>>,
}

// ---------------------------------------------------------------------------
// ChangeNotifier — subscribers and dispatch
// ---------------------------------------------------------------------------

/// A shared, single-threaded change notifier for one collection.
///
/// Cloning yields another handle to the same subscribers and suspension state.
pub struct ChangeNotifier<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for ChangeNotifier<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .field("active_mode", &self.active_mode())
            .field("depth", &self.suspension_depth())
            .finish()
    }
}

impl<T> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeNotifier<T> {
    /// Create a notifier with the default [`SuspendConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SuspendConfig::default())
    }

    #[must_use]
    pub fn with_config(config: SuspendConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                config,
                subscribers: Vec::new(),
                active: None,
            })),
        }
    }

    #[must_use]
    pub fn config(&self) -> SuspendConfig {
        self.inner.borrow().config.clone()
    }

    /// Whether changes are currently buffered instead of dispatched.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.inner.borrow().active.is_some()
    }

    /// Number of suspension guards currently held (0 when not suspended).
    #[must_use]
    pub fn suspension_depth(&self) -> usize {
        self.inner.borrow().active.as_ref().map_or(0, |a| a.depth)
    }

    /// Mode of the active suspension.
    #[must_use]
    pub fn active_mode(&self) -> Option<SuspensionMode> {
        self.inner
            .borrow()
            .active
            .as_ref()
            .map(|a| a.context.mode())
    }

    /// Number of changes buffered by the active suspension.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner
            .borrow()
            .active
            .as_ref()
            .map_or(0, |a| a.context.len())
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Dispatch `events` to every live subscriber, in order.
    fn dispatch(&self, events: &[BatchChangeEvent<T>]) {
        if events.is_empty() {
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("dispatch", events = events.len()).entered();

        // Upgrade first so no borrow is held while callbacks run.
        let subscribers: Vec<Rc<Slot<T>>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for event in events {
            for slot in &subscribers {
                (slot.callback)(event);
            }
        }
        tracing::debug!(
            events = events.len(),
            subscribers = subscribers.len(),
            "dispatched change batch"
        );
    }
}

impl<T: 'static> ChangeNotifier<T> {
    /// Register a callback for every dispatched event.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe(&self, callback: impl Fn(&BatchChangeEvent<T>) + 'static) -> Subscription {
        let slot = Rc::new(Slot {
            callback: Box::new(callback),
        });
        self.inner.borrow_mut().subscribers.push(Rc::downgrade(&slot));
        Subscription { _slot: slot }
    }
}

// ---------------------------------------------------------------------------
// ChangeNotifier — reporting and suspension
// ---------------------------------------------------------------------------

impl<T: PartialEq + 'static> ChangeNotifier<T> {
    /// Report one change from the host collection.
    ///
    /// Dispatched immediately as a single-item event unless notifications are
    /// suspended, in which case it is buffered. While
    /// [`SuspendConfig::enforce_homogeneous`] is set (the default), an action
    /// an `Adding` or `Removing` suspension does not admit fails with
    /// [`SuspendError::ActionNotAllowed`] and nothing is buffered.
    pub fn notify(&self, item: T, index: Option<usize>, action: MutationAction) -> Result<()> {
        {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            if let Some(active) = inner.active.as_mut() {
                if inner.config.enforce_homogeneous {
                    active.context.try_record(item, index, action)?;
                } else {
                    active.context.record(item, index, action);
                }
                return Ok(());
            }
        }
        self.dispatch(&[BatchChangeEvent::single(item, index, action)]);
        Ok(())
    }

    /// Shorthand for `notify(item, Some(index), MutationAction::Add)`.
    pub fn added(&self, item: T, index: usize) -> Result<()> {
        self.notify(item, Some(index), MutationAction::Add)
    }

    /// Shorthand for `notify(item, Some(index), MutationAction::Remove)`.
    pub fn removed(&self, item: T, index: usize) -> Result<()> {
        self.notify(item, Some(index), MutationAction::Remove)
    }

    /// Suspend notifications until the returned guard is released.
    ///
    /// Nested calls share the active suspension and must request its mode;
    /// only releasing the outermost guard dispatches.
    pub fn suspend(&self, mode: SuspensionMode) -> Result<SuspensionGuard<T>> {
        let depth = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let limit = inner.config.max_nesting;
            match inner.active.as_mut() {
                Some(active) => {
                    let active_mode = active.context.mode();
                    if active_mode != mode {
                        return Err(SuspendError::ModeMismatch {
                            active: active_mode,
                            requested: mode,
                        });
                    }
                    if active.depth >= limit {
                        return Err(SuspendError::NestingTooDeep { limit });
                    }
                    active.depth += 1;
                    active.depth
                }
                None => {
                    if limit == 0 {
                        return Err(SuspendError::NestingTooDeep { limit });
                    }
                    inner.active = Some(Active {
                        context: SuspensionContext::open(mode),
                        depth: 1,
                    });
                    1
                }
            }
        };
        tracing::trace!(mode = %mode, depth, "suspended change notifications");
        Ok(SuspensionGuard::new(self.clone(), mode))
    }

    /// Suspend in [`SuspendConfig::default_mode`].
    pub fn suspend_default(&self) -> Result<SuspensionGuard<T>> {
        let mode = self.inner.borrow().config.default_mode;
        self.suspend(mode)
    }

    /// Release one suspension level.
    ///
    /// Releasing the outermost level closes the context and, unless
    /// `discard` is set, dispatches and returns the consolidated events.
    pub(crate) fn release(&self, discard: bool) -> Vec<BatchChangeEvent<T>> {
        let context = {
            let mut guard = self.inner.borrow_mut();
            let Some(active) = guard.active.as_mut() else {
                return Vec::new();
            };
            active.depth = active.depth.saturating_sub(1);
            if active.depth > 0 {
                tracing::trace!(depth = active.depth, "released nested suspension");
                return Vec::new();
            }
            match guard.active.take() {
                Some(active) => active.context,
                None => return Vec::new(),
            }
        };

        if discard {
            tracing::debug!(
                mode = %context.mode(),
                dropped = context.len(),
                "discarded suspended changes"
            );
            return Vec::new();
        }

        let events = context.close();
        self.dispatch(&events);
        events
    }
}

// ---------------------------------------------------------------------------
// Subscription — RAII registration
// ---------------------------------------------------------------------------

/// RAII guard that keeps a subscriber registered.
///
/// Dropping it unsubscribes; the callback will not fire on the next dispatch.
#[must_use = "dropping this subscription unsubscribes immediately"]
pub struct Subscription {
    _slot: Rc<dyn Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collnotify_core::EventAction;
    use std::cell::Cell;

    fn recorder<T: Clone + 'static>(
        notifier: &ChangeNotifier<T>,
    ) -> (Rc<RefCell<Vec<BatchChangeEvent<T>>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = notifier.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (seen, sub)
    }

    // ---- Dispatch tests ----

    #[test]
    fn unsuspended_notify_dispatches_single_event() {
        let notifier = ChangeNotifier::new();
        let (seen, _sub) = recorder(&notifier);

        notifier.added('a', 0).unwrap();
        notifier.removed('a', 0).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].action(), EventAction::Add);
        assert_eq!(seen[0].items(), &['a']);
        assert_eq!(seen[1].action(), EventAction::Remove);
    }

    #[test]
    fn subscribers_notified_in_registration_order() {
        let notifier = ChangeNotifier::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o1 = Rc::clone(&order);
        let _s1 = notifier.subscribe(move |_| o1.borrow_mut().push(1));
        let o2 = Rc::clone(&order);
        let _s2 = notifier.subscribe(move |_| o2.borrow_mut().push(2));
        let o3 = Rc::clone(&order);
        let _s3 = notifier.subscribe(move |_| o3.borrow_mut().push(3));

        notifier.added(0u8, 0).unwrap();
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let notifier = ChangeNotifier::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = notifier.subscribe(move |_| c.set(c.get() + 1));
        assert_eq!(notifier.subscriber_count(), 1);

        notifier.added(1u8, 0).unwrap();
        drop(sub);
        notifier.added(2u8, 1).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    // ---- Shared state tests ----

    #[test]
    fn clones_share_state() {
        let notifier = ChangeNotifier::new();
        let (seen, _sub) = recorder(&notifier);
        let other = notifier.clone();

        let _guard = other.suspend(SuspensionMode::Mixed).unwrap();
        assert!(notifier.is_suspended());
        notifier.added(5u8, 0).unwrap();
        assert_eq!(other.pending_len(), 1);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn callback_may_reenter_notifier() {
        let notifier: ChangeNotifier<u8> = ChangeNotifier::new();
        let observed = Rc::new(Cell::new(None));

        let handle = notifier.clone();
        let obs = Rc::clone(&observed);
        let _sub = notifier.subscribe(move |_| obs.set(Some(handle.is_suspended())));

        notifier.added(1, 0).unwrap();
        assert_eq!(observed.get(), Some(false));
    }

    #[test]
    fn debug_format() {
        let notifier: ChangeNotifier<u8> = ChangeNotifier::new();
        let _sub = notifier.subscribe(|_| {});
        let debug = format!("{notifier:?}");
        assert!(debug.contains("subscribers: 1"));
        assert!(debug.contains("active_mode: None"));
    }

    // ---- Config and logging tests ----

    #[test]
    fn suspend_default_uses_config() {
        let config = SuspendConfig::default().with_default_mode(SuspensionMode::MixedBash);
        let notifier: ChangeNotifier<u8> = ChangeNotifier::with_config(config);
        let _guard = notifier.suspend_default().unwrap();
        assert_eq!(notifier.active_mode(), Some(SuspensionMode::MixedBash));
    }

    #[tracing_test::traced_test]
    #[test]
    fn dispatch_is_logged() {
        let notifier = ChangeNotifier::new();
        let _sub = notifier.subscribe(|_| {});
        notifier.added(1u8, 0).unwrap();
        assert!(logs_contain("dispatched change batch"));
    }
}
