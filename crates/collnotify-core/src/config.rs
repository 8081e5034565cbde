#![forbid(unsafe_code)]

//! Host-facing suspension policy.
//!
//! [`SuspendConfig`] is plain data with documented defaults. With the
//! `serde` feature it can be embedded in a host's own configuration, and
//! with `policy-config` it can be loaded from a JSON policy document:
//!
//! ```json
//! { "default_mode": "mixed_consolidate", "enforce_homogeneous": false }
//! ```
//!
//! Missing fields fall back to their defaults.

use crate::mode::SuspensionMode;

/// Policy shared by [`ScopeTable`](crate::ScopeTable) and host notifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SuspendConfig {
    /// Mode used when the host suspends without naming one.
    /// Default: `None` (a single Reset on resume)
    pub default_mode: SuspensionMode,

    /// Reject records whose action contradicts an `Adding` or `Removing`
    /// scope at the call that reports them. When disabled, such records are
    /// buffered and emitted under the scope's own action.
    /// Default: true
    pub enforce_homogeneous: bool,

    /// Maximum number of simultaneously held nested suspensions.
    /// Zero forbids suspension entirely.
    /// Default: 64
    pub max_nesting: usize,
}

impl Default for SuspendConfig {
    fn default() -> Self {
        Self {
            default_mode: SuspensionMode::None,
            enforce_homogeneous: true,
            max_nesting: 64,
        }
    }
}

impl SuspendConfig {
    #[must_use]
    pub fn with_default_mode(mut self, mode: SuspensionMode) -> Self {
        self.default_mode = mode;
        self
    }

    #[must_use]
    pub fn with_enforce_homogeneous(mut self, enforce: bool) -> Self {
        self.enforce_homogeneous = enforce;
        self
    }

    #[must_use]
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Parse a JSON policy document.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::SuspendError::InvalidConfig(e.to_string()))
    }
}
