#![forbid(unsafe_code)]

//! Change-notification suspension and consolidation for observable collections.
//!
//! This crate provides:
//! - [`MutationRecord`] for a single buffered add or remove
//! - [`SuspensionContext`] for the append-only buffer of one suspended span
//! - [`engine`] for turning a closed context into [`BatchChangeEvent`]s
//! - [`ScopeTable`] for hosts that address open scopes through opaque ids
//!
//! The host collection itself (storage, mutation API, UI dispatch) lives
//! outside this crate. It only feeds records in and hands events out.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod event;
pub mod mode;
pub mod record;
pub mod scope;

pub use config::SuspendConfig;
pub use context::SuspensionContext;
pub use engine::build_events;
pub use error::{Result, SuspendError};
pub use event::{BatchChangeEvent, EventAction};
pub use mode::{MutationAction, SuspensionMode};
pub use record::MutationRecord;
pub use scope::{ScopeId, ScopeTable};
