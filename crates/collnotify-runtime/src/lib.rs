#![forbid(unsafe_code)]

//! Host-side runtime for collnotify.
//!
//! [`reactive`] wraps the consolidation engine from `collnotify-core` in a
//! single-threaded notifier that a collection owns: it dispatches changes to
//! subscribers immediately, or buffers them while a suspension guard is held.

pub mod reactive;

pub use collnotify_core::{
    BatchChangeEvent, EventAction, MutationAction, MutationRecord, Result, SuspendConfig,
    SuspendError, SuspensionMode,
};
pub use reactive::{ChangeNotifier, Subscription, SubscriptionScope, SuspensionGuard};
