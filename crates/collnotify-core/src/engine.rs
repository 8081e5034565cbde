#![forbid(unsafe_code)]

//! Consolidation of buffered records into batch notifications.
//!
//! [`build_events`] consumes a closed [`SuspensionContext`] and runs the
//! policy selected by its [`SuspensionMode`]:
//!
//! | Mode | Output |
//! |------|--------|
//! | `None` | exactly one empty Reset event |
//! | `Adding` / `Removing` | one Add / Remove event, records verbatim |
//! | `Mixed` | one MixedSequence event, records and actions verbatim |
//! | `MixedBash` | one event per maximal run of equal actions |
//! | `MixedConsolidate` | at most one Add then one Remove event, net effect only |
//!
//! The `build_*` functions run a single policy against a borrowed context and
//! fail with [`SuspendError::InvalidModeForOperation`] when the context was
//! opened in a different mode.
//!
//! # Cancellation (MixedConsolidate)
//!
//! Records are scanned in append order against two pending lists. An add
//! first tries to cancel a pending remove, a remove first tries to cancel a
//! pending add; unmatched records join their own pending list. Matching is
//! LIFO:
//!
//! - with an index, the most recent pending entry at that index is the only
//!   candidate, and it cancels only if its item is equal;
//! - without an index, the most recent pending entry with an equal item
//!   cancels, whatever its index.
//!
//! Pending entries keep the order in which they were appended.

use crate::context::SuspensionContext;
use crate::error::{Result, SuspendError};
use crate::event::BatchChangeEvent;
use crate::mode::{MutationAction, SuspensionMode};
use crate::record::MutationRecord;

/// Consolidate a context according to its mode.
///
/// Deterministic: the same sequence of records always yields the same events.
#[must_use]
pub fn build_events<T: PartialEq>(context: SuspensionContext<T>) -> Vec<BatchChangeEvent<T>> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "build_events",
        mode = %context.mode(),
        records = context.len()
    )
    .entered();

    let mode = context.mode();
    let record_count = context.len();
    let records = context.into_records();
    let events = match mode {
        SuspensionMode::None => vec![BatchChangeEvent::reset()],
        SuspensionMode::Adding => homogeneous(MutationAction::Add, records),
        SuspensionMode::Removing => homogeneous(MutationAction::Remove, records),
        SuspensionMode::Mixed => vec![BatchChangeEvent::mixed_sequence(records)],
        SuspensionMode::MixedBash => bash(records),
        SuspensionMode::MixedConsolidate => consolidate(records),
    };

    tracing::debug!(
        mode = %mode,
        records = record_count,
        events = events.len(),
        "consolidated suspension context"
    );
    events
}

/// The `None` policy: a single Reset event regardless of content.
pub fn build_reset<T>(context: &SuspensionContext<T>) -> Result<Vec<BatchChangeEvent<T>>> {
    expect_mode(context, SuspensionMode::None)?;
    Ok(vec![BatchChangeEvent::reset()])
}

/// The `Adding` policy.
pub fn build_adding<T: Clone>(context: &SuspensionContext<T>) -> Result<Vec<BatchChangeEvent<T>>> {
    expect_mode(context, SuspensionMode::Adding)?;
    Ok(homogeneous(MutationAction::Add, context.records().to_vec()))
}

/// The `Removing` policy.
pub fn build_removing<T: Clone>(
    context: &SuspensionContext<T>,
) -> Result<Vec<BatchChangeEvent<T>>> {
    expect_mode(context, SuspensionMode::Removing)?;
    Ok(homogeneous(MutationAction::Remove, context.records().to_vec()))
}

/// The `Mixed` policy.
pub fn build_mixed<T: Clone>(context: &SuspensionContext<T>) -> Result<Vec<BatchChangeEvent<T>>> {
    expect_mode(context, SuspensionMode::Mixed)?;
    Ok(vec![BatchChangeEvent::mixed_sequence(
        context.records().to_vec(),
    )])
}

/// The `MixedBash` policy.
pub fn build_mixed_bash<T: Clone>(
    context: &SuspensionContext<T>,
) -> Result<Vec<BatchChangeEvent<T>>> {
    expect_mode(context, SuspensionMode::MixedBash)?;
    Ok(bash(context.records().to_vec()))
}

/// The `MixedConsolidate` policy.
pub fn build_mixed_consolidate<T: Clone + PartialEq>(
    context: &SuspensionContext<T>,
) -> Result<Vec<BatchChangeEvent<T>>> {
    expect_mode(context, SuspensionMode::MixedConsolidate)?;
    Ok(consolidate(context.records().to_vec()))
}

fn expect_mode<T>(context: &SuspensionContext<T>, expected: SuspensionMode) -> Result<()> {
    if context.mode() == expected {
        Ok(())
    } else {
        Err(SuspendError::InvalidModeForOperation {
            expected,
            actual: context.mode(),
        })
    }
}

// Empty input is no change at all, so no event.
fn homogeneous<T>(
    action: MutationAction,
    records: Vec<MutationRecord<T>>,
) -> Vec<BatchChangeEvent<T>> {
    if records.is_empty() {
        return Vec::new();
    }
    // Items and indices pass through verbatim; every record takes the
    // scope's action, including ones buffered with enforcement disabled.
    let records = records
        .into_iter()
        .map(|r| MutationRecord::new(r.item, r.index, action))
        .collect();
    vec![BatchChangeEvent::from_records(action, records)]
}

fn bash<T>(records: Vec<MutationRecord<T>>) -> Vec<BatchChangeEvent<T>> {
    let mut events = Vec::new();
    let mut run: Vec<MutationRecord<T>> = Vec::new();
    let mut run_action: Option<MutationAction> = None;

    for record in records {
        if run_action.is_some_and(|action| action != record.action) {
            let closed = std::mem::take(&mut run);
            if let Some(action) = run_action {
                events.push(BatchChangeEvent::from_records(action, closed));
            }
        }
        run_action = Some(record.action);
        run.push(record);
    }

    if let Some(action) = run_action
        && !run.is_empty()
    {
        events.push(BatchChangeEvent::from_records(action, run));
    }
    events
}

fn consolidate<T: PartialEq>(records: Vec<MutationRecord<T>>) -> Vec<BatchChangeEvent<T>> {
    let mut pending_adds: Vec<MutationRecord<T>> = Vec::new();
    let mut pending_removes: Vec<MutationRecord<T>> = Vec::new();
    let mut cancelled = 0usize;

    for record in records {
        let (opposite, own) = match record.action {
            MutationAction::Add => (&mut pending_removes, &mut pending_adds),
            MutationAction::Remove => (&mut pending_adds, &mut pending_removes),
        };
        if try_cancel(&record.item, record.index, opposite) {
            cancelled += 1;
        } else {
            own.push(record);
        }
    }

    tracing::trace!(
        cancelled_pairs = cancelled,
        net_adds = pending_adds.len(),
        net_removes = pending_removes.len(),
        "consolidated mixed records"
    );

    let mut events = Vec::with_capacity(2);
    if !pending_adds.is_empty() {
        events.push(BatchChangeEvent::from_records(
            MutationAction::Add,
            pending_adds,
        ));
    }
    if !pending_removes.is_empty() {
        events.push(BatchChangeEvent::from_records(
            MutationAction::Remove,
            pending_removes,
        ));
    }
    events
}

/// Remove the LIFO match for `(item, index)` from `candidates`.
///
/// Returns whether an entry was cancelled.
fn try_cancel<T: PartialEq>(
    item: &T,
    index: Option<usize>,
    candidates: &mut Vec<MutationRecord<T>>,
) -> bool {
    let position = match index {
        Some(index) => candidates
            .iter()
            .rposition(|c| c.index == Some(index))
            .filter(|&p| candidates[p].item == *item),
        None => candidates.iter().rposition(|c| c.item == *item),
    };
    match position {
        Some(p) => {
            candidates.remove(p);
            true
        }
        None => false,
    }
}
