#![forbid(unsafe_code)]

//! Append-only buffer for one suspension scope.
//!
//! A [`SuspensionContext`] is opened with a [`SuspensionMode`], collects
//! [`MutationRecord`]s while the host's notifications are suspended, and is
//! consumed exactly once by [`SuspensionContext::close`]. Closing takes the
//! context by value, so a closed context cannot be recorded into again.
//!
//! # Invariants
//!
//! 1. The mode never changes after `open`.
//! 2. Records are never removed or rewritten while the context is open.
//! 3. `close` is a deterministic function of the append order.

use crate::engine;
use crate::error::{Result, SuspendError};
use crate::event::BatchChangeEvent;
use crate::mode::{MutationAction, SuspensionMode};
use crate::record::MutationRecord;

/// Buffered mutations for one suspended span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspensionContext<T> {
    mode: SuspensionMode,
    records: Vec<MutationRecord<T>>,
}

impl<T> SuspensionContext<T> {
    /// Open an empty context.
    #[must_use]
    pub fn open(mode: SuspensionMode) -> Self {
        Self {
            mode,
            records: Vec::new(),
        }
    }

    /// Open an empty context with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(mode: SuspensionMode, capacity: usize) -> Self {
        Self {
            mode,
            records: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn mode(&self) -> SuspensionMode {
        self.mode
    }

    /// Buffered records in append order.
    #[must_use]
    pub fn records(&self) -> &[MutationRecord<T>] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `action` fits this context's mode.
    ///
    /// Only `Adding` and `Removing` restrict actions.
    #[must_use]
    pub fn accepts(&self, action: MutationAction) -> bool {
        self.mode
            .homogeneous_action()
            .is_none_or(|expected| expected == action)
    }

    /// Append one record. O(1) amortized, valid in any mode.
    pub fn record(&mut self, item: T, index: Option<usize>, action: MutationAction) {
        self.records.push(MutationRecord::new(item, index, action));
    }

    /// Append one record, rejecting actions the mode does not admit.
    ///
    /// Nothing is buffered when this fails.
    pub fn try_record(
        &mut self,
        item: T,
        index: Option<usize>,
        action: MutationAction,
    ) -> Result<()> {
        if !self.accepts(action) {
            return Err(SuspendError::ActionNotAllowed {
                mode: self.mode,
                action,
            });
        }
        self.record(item, index, action);
        Ok(())
    }

    /// Give up the buffered records without consolidating them.
    #[must_use]
    pub fn into_records(self) -> Vec<MutationRecord<T>> {
        self.records
    }
}

impl<T: PartialEq> SuspensionContext<T> {
    /// Close the scope and consolidate according to the mode.
    #[must_use]
    pub fn close(self) -> Vec<BatchChangeEvent<T>> {
        engine::build_events(self)
    }
}

impl<T> Extend<MutationRecord<T>> for SuspensionContext<T> {
    fn extend<I: IntoIterator<Item = MutationRecord<T>>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_is_empty() {
        let ctx = SuspensionContext::<u8>::open(SuspensionMode::Mixed);
        assert_eq!(ctx.mode(), SuspensionMode::Mixed);
        assert!(ctx.is_empty());
        assert_eq!(ctx.len(), 0);
    }

    #[test]
    fn record_appends_in_order() {
        let mut ctx = SuspensionContext::open(SuspensionMode::Mixed);
        ctx.record("a", Some(0), MutationAction::Add);
        ctx.record("b", None, MutationAction::Remove);
        assert_eq!(
            ctx.records(),
            &[
                MutationRecord::add("a", 0),
                MutationRecord::new("b", None, MutationAction::Remove)
            ]
        );
    }

    #[test]
    fn accepts_by_mode() {
        let adding = SuspensionContext::<u8>::open(SuspensionMode::Adding);
        assert!(adding.accepts(MutationAction::Add));
        assert!(!adding.accepts(MutationAction::Remove));

        let removing = SuspensionContext::<u8>::open(SuspensionMode::Removing);
        assert!(!removing.accepts(MutationAction::Add));

        let bash = SuspensionContext::<u8>::open(SuspensionMode::MixedBash);
        assert!(bash.accepts(MutationAction::Add));
        assert!(bash.accepts(MutationAction::Remove));
    }

    #[test]
    fn try_record_rejects_without_buffering() {
        let mut ctx = SuspensionContext::open(SuspensionMode::Adding);
        ctx.try_record(1, Some(0), MutationAction::Add).unwrap();
        let err = ctx.try_record(2, Some(1), MutationAction::Remove).unwrap_err();
        assert_eq!(
            err,
            SuspendError::ActionNotAllowed {
                mode: SuspensionMode::Adding,
                action: MutationAction::Remove,
            }
        );
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn record_in_none_mode_still_resets() {
        let mut ctx = SuspensionContext::open(SuspensionMode::None);
        ctx.record(5, Some(0), MutationAction::Add);
        assert_eq!(ctx.close(), vec![BatchChangeEvent::reset()]);
    }

    #[test]
    fn extend_appends_records() {
        let mut ctx = SuspensionContext::open(SuspensionMode::Removing);
        ctx.extend([MutationRecord::remove(1, 0), MutationRecord::remove(2, 0)]);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.into_records().len(), 2);
    }
}
