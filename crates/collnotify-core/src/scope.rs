#![forbid(unsafe_code)]

//! Id-addressed suspension scopes.
//!
//! [`ScopeTable`] lets a host hold several open scopes at once and refer to
//! them through opaque [`ScopeId`]s instead of owning each
//! [`SuspensionContext`] directly.
//!
//! # Invariants
//!
//! 1. Ids increase monotonically and are never reused.
//! 2. Closing or discarding removes the context; any later operation on that
//!    id fails with [`SuspendError::NullContext`].
//! 3. A failed operation leaves the table unchanged.

use std::fmt;

use ahash::AHashMap;

use crate::config::SuspendConfig;
use crate::context::SuspensionContext;
use crate::error::{Result, SuspendError};
use crate::event::BatchChangeEvent;
use crate::mode::{MutationAction, SuspensionMode};

/// Opaque handle to an open suspension scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeId(u64);

impl ScopeId {
    /// Rebuild an id from its raw value (for hosts that store ids elsewhere).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Open suspension scopes keyed by [`ScopeId`].
#[derive(Debug)]
pub struct ScopeTable<T> {
    config: SuspendConfig,
    next_id: u64,
    open: AHashMap<ScopeId, SuspensionContext<T>>,
}

impl<T> Default for ScopeTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopeTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SuspendConfig::default())
    }

    #[must_use]
    pub fn with_config(config: SuspendConfig) -> Self {
        Self {
            config,
            next_id: 1,
            open: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SuspendConfig {
        &self.config
    }

    /// Open a scope whose mode is fixed until it closes.
    pub fn open_scope(&mut self, mode: SuspensionMode) -> ScopeId {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        self.open.insert(id, SuspensionContext::open(mode));
        tracing::trace!(scope = %id, mode = %mode, "opened suspension scope");
        id
    }

    /// Open a scope in the configured default mode.
    pub fn open_default_scope(&mut self) -> ScopeId {
        self.open_scope(self.config.default_mode)
    }

    /// Buffer one mutation in an open scope.
    pub fn record(
        &mut self,
        scope: ScopeId,
        item: T,
        index: Option<usize>,
        action: MutationAction,
    ) -> Result<()> {
        let context = self
            .open
            .get_mut(&scope)
            .ok_or(SuspendError::NullContext(scope))?;
        if self.config.enforce_homogeneous {
            context.try_record(item, index, action)
        } else {
            context.record(item, index, action);
            Ok(())
        }
    }

    /// Mode of an open scope.
    pub fn mode_of(&self, scope: ScopeId) -> Result<SuspensionMode> {
        self.open
            .get(&scope)
            .map(SuspensionContext::mode)
            .ok_or(SuspendError::NullContext(scope))
    }

    /// Number of records buffered in an open scope.
    pub fn pending_len(&self, scope: ScopeId) -> Result<usize> {
        self.open
            .get(&scope)
            .map(SuspensionContext::len)
            .ok_or(SuspendError::NullContext(scope))
    }

    /// Abandon a scope without consolidating; returns the number of records dropped.
    pub fn discard_scope(&mut self, scope: ScopeId) -> Result<usize> {
        let context = self
            .open
            .remove(&scope)
            .ok_or(SuspendError::NullContext(scope))?;
        let dropped = context.len();
        tracing::debug!(scope = %scope, dropped, "discarded suspension scope");
        Ok(dropped)
    }

    #[must_use]
    pub fn is_open(&self, scope: ScopeId) -> bool {
        self.open.contains_key(&scope)
    }

    /// Number of scopes currently open.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

impl<T: PartialEq> ScopeTable<T> {
    /// Close a scope and return its consolidated events in dispatch order.
    pub fn close_scope(&mut self, scope: ScopeId) -> Result<Vec<BatchChangeEvent<T>>> {
        let context = self
            .open
            .remove(&scope)
            .ok_or(SuspendError::NullContext(scope))?;
        tracing::trace!(scope = %scope, "closing suspension scope");
        Ok(context.close())
    }
}
