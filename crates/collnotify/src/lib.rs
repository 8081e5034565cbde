#![forbid(unsafe_code)]

//! collnotify: suspend, buffer and consolidate collection change notifications.
//!
//! - [`collnotify_core`]: records, suspension contexts, the consolidation
//!   engine and id-addressed scopes.
//! - [`collnotify_runtime`] (feature `runtime`, on by default): a
//!   single-threaded notifier with RAII suspension guards and subscriptions.
//!
//! Most hosts only need the [`prelude`].

pub use collnotify_core;
#[cfg(feature = "runtime")]
pub use collnotify_runtime;

pub use collnotify_core::{
    BatchChangeEvent, EventAction, MutationAction, MutationRecord, Result, ScopeId, ScopeTable,
    SuspendConfig, SuspendError, SuspensionContext, SuspensionMode, build_events,
};
#[cfg(feature = "runtime")]
pub use collnotify_runtime::{ChangeNotifier, Subscription, SubscriptionScope, SuspensionGuard};

pub mod prelude {
    pub use collnotify_core::{
        BatchChangeEvent, EventAction, MutationAction, SuspendConfig, SuspendError,
        SuspensionMode,
    };
    #[cfg(feature = "runtime")]
    pub use collnotify_runtime::{ChangeNotifier, Subscription, SuspensionGuard};
}
