#![forbid(unsafe_code)]

//! Batched change notifications emitted when a suspension scope closes.
//!
//! # Invariants
//!
//! 1. `items().len() == indices().len()` for every event.
//! 2. `actions()` is non-empty only for [`EventAction::MixedSequence`], where
//!    it has the same length as `items()`.
//! 3. [`EventAction::Reset`] events carry no items.
//! 4. Events are immutable after construction.
//!
//! With the `serde` feature, deserialization checks invariants 1 to 3 and
//! rejects documents that break them.

use std::fmt;

use crate::mode::MutationAction;
use crate::record::MutationRecord;

/// What a [`BatchChangeEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventAction {
    /// Every item was added.
    Add,
    /// Every item was removed.
    Remove,
    /// Something changed; observers should re-read the whole collection.
    Reset,
    /// Items carry individual actions in [`BatchChangeEvent::actions`].
    MixedSequence,
}

impl From<MutationAction> for EventAction {
    fn from(action: MutationAction) -> Self {
        match action {
            MutationAction::Add => Self::Add,
            MutationAction::Remove => Self::Remove,
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Reset => "reset",
            Self::MixedSequence => "mixed_sequence",
        })
    }
}

/// A contiguous batch of changes delivered to observers in one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchChangeEvent<T> {
    action: EventAction,
    items: Vec<T>,
    indices: Vec<Option<usize>>,
    actions: Vec<MutationAction>,
}

impl<T> BatchChangeEvent<T> {
    /// An item-less Reset event.
    #[must_use]
    pub fn reset() -> Self {
        Self {
            action: EventAction::Reset,
            items: Vec::new(),
            indices: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// A single-item event, as dispatched when notifications are not suspended.
    #[must_use]
    pub fn single(item: T, index: Option<usize>, action: MutationAction) -> Self {
        Self {
            action: action.into(),
            items: vec![item],
            indices: vec![index],
            actions: Vec::new(),
        }
    }

    /// An Add or Remove event over `records`.
    ///
    /// The per-record actions are dropped; callers only pass records that
    /// share `action`.
    #[must_use]
    pub fn from_records(action: MutationAction, records: Vec<MutationRecord<T>>) -> Self {
        debug_assert!(records.iter().all(|r| r.action == action));
        let (items, indices): (Vec<T>, Vec<Option<usize>>) =
            records.into_iter().map(|r| (r.item, r.index)).unzip();
        Self {
            action: action.into(),
            items,
            indices,
            actions: Vec::new(),
        }
    }

    /// A MixedSequence event keeping every record's own action.
    #[must_use]
    pub fn mixed_sequence(records: Vec<MutationRecord<T>>) -> Self {
        let mut items = Vec::with_capacity(records.len());
        let mut indices = Vec::with_capacity(records.len());
        let mut actions = Vec::with_capacity(records.len());
        for record in records {
            items.push(record.item);
            indices.push(record.index);
            actions.push(record.action);
        }
        Self {
            action: EventAction::MixedSequence,
            items,
            indices,
            actions,
        }
    }

    #[must_use]
    pub fn action(&self) -> EventAction {
        self.action
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn indices(&self) -> &[Option<usize>] {
        &self.indices
    }

    /// Per-item actions; empty unless this is a MixedSequence event.
    #[must_use]
    pub fn actions(&self) -> &[MutationAction] {
        &self.actions
    }

    /// Number of items carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The action that applies to the item at `position`.
    ///
    /// `None` for Reset events and out-of-range positions.
    #[must_use]
    pub fn action_at(&self, position: usize) -> Option<MutationAction> {
        if position >= self.items.len() {
            return None;
        }
        match self.action {
            EventAction::Add => Some(MutationAction::Add),
            EventAction::Remove => Some(MutationAction::Remove),
            EventAction::MixedSequence => self.actions.get(position).copied(),
            EventAction::Reset => None,
        }
    }

    /// Iterate the carried changes as records borrowing their items.
    pub fn iter(&self) -> impl Iterator<Item = MutationRecord<&T>> + '_ {
        self.items
            .iter()
            .zip(&self.indices)
            .enumerate()
            .filter_map(|(position, (item, index))| {
                self.action_at(position)
                    .map(|action| MutationRecord::new(item, *index, action))
            })
    }

    /// Consume the event into owned records.
    #[must_use]
    pub fn into_records(self) -> Vec<MutationRecord<T>> {
        let Self {
            action,
            items,
            indices,
            actions,
        } = self;
        let fixed = match action {
            EventAction::Add => Some(MutationAction::Add),
            EventAction::Remove => Some(MutationAction::Remove),
            EventAction::Reset | EventAction::MixedSequence => None,
        };
        items
            .into_iter()
            .zip(indices)
            .enumerate()
            .filter_map(|(position, (item, index))| {
                fixed
                    .or_else(|| actions.get(position).copied())
                    .map(|action| MutationRecord::new(item, index, action))
            })
            .collect()
    }
}

/// Wire form of [`BatchChangeEvent`], checked before it becomes an event.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EventParts<T> {
    action: EventAction,
    items: Vec<T>,
    indices: Vec<Option<usize>>,
    #[serde(default)]
    actions: Vec<MutationAction>,
}

#[cfg(feature = "serde")]
impl<T> EventParts<T> {
    fn into_event(self) -> crate::Result<BatchChangeEvent<T>> {
        use crate::error::SuspendError;

        if self.items.len() != self.indices.len() {
            return Err(SuspendError::MalformedEvent(
                "items and indices differ in length",
            ));
        }
        match self.action {
            EventAction::MixedSequence if self.actions.len() != self.items.len() => {
                return Err(SuspendError::MalformedEvent(
                    "mixed sequence needs one action per item",
                ));
            }
            EventAction::Add | EventAction::Remove | EventAction::Reset
                if !self.actions.is_empty() =>
            {
                return Err(SuspendError::MalformedEvent(
                    "per-item actions are only valid on a mixed sequence",
                ));
            }
            EventAction::Reset if !self.items.is_empty() => {
                return Err(SuspendError::MalformedEvent("reset carries no items"));
            }
            _ => {}
        }
        Ok(BatchChangeEvent {
            action: self.action,
            items: self.items,
            indices: self.indices,
            actions: self.actions,
        })
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for BatchChangeEvent<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <EventParts<T> as serde::Deserialize<'de>>::deserialize(deserializer)?
            .into_event()
            .map_err(serde::de::Error::custom)
    }
}
