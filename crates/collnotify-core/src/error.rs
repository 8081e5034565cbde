#![forbid(unsafe_code)]

//! Errors from suspension and consolidation operations.
//!
//! Every variant is a precondition failure detected before any record is
//! buffered or any context is consumed. None of them are transient.

use crate::mode::{MutationAction, SuspensionMode};
use crate::scope::ScopeId;

/// Result alias for this crate.
pub type Result<T, E = SuspendError> = std::result::Result<T, E>;

/// Errors from suspension scopes and consolidation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuspendError {
    /// The scope was never opened, or was already closed or discarded.
    #[error("no open suspension context for {0}")]
    NullContext(ScopeId),

    /// A mode-specific algorithm was asked to process a context of another mode.
    #[error("operation requires a {expected} context, got {actual}")]
    InvalidModeForOperation {
        expected: SuspensionMode,
        actual: SuspensionMode,
    },

    /// A mode name or code maps to no known mode.
    #[error("unhandled suspension mode: {0}")]
    UnhandledMode(String),

    /// A record contradicts a homogeneous scope while enforcement is on.
    #[error("cannot record {action} in a {mode} scope")]
    ActionNotAllowed {
        mode: SuspensionMode,
        action: MutationAction,
    },

    /// A nested suspension asked for a different mode than the active one.
    #[error("cannot suspend in {requested} mode while a {active} suspension is active")]
    ModeMismatch {
        active: SuspensionMode,
        requested: SuspensionMode,
    },

    /// Nested suspensions exceeded the configured depth.
    #[error("suspension nesting exceeds limit of {limit}")]
    NestingTooDeep { limit: usize },

    /// A configuration document could not be loaded.
    #[error("invalid suspension config: {0}")]
    InvalidConfig(String),

    /// Deserialized event parts do not form a well-shaped event.
    #[error("malformed change event: {0}")]
    MalformedEvent(&'static str),
}
