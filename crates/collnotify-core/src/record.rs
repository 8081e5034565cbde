#![forbid(unsafe_code)]

//! A single buffered collection mutation.

use crate::mode::MutationAction;

/// One add or remove captured while notifications were suspended.
///
/// `index` is the position in the host collection at the moment the mutation
/// happened, not a position inside any buffer. `None` means the host did not
/// track a position for this record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutationRecord<T> {
    pub item: T,
    pub index: Option<usize>,
    pub action: MutationAction,
}

impl<T> MutationRecord<T> {
    #[must_use]
    pub fn new(item: T, index: Option<usize>, action: MutationAction) -> Self {
        Self {
            item,
            index,
            action,
        }
    }

    /// An add at `index`.
    #[must_use]
    pub fn add(item: T, index: usize) -> Self {
        Self::new(item, Some(index), MutationAction::Add)
    }

    /// A remove from `index`.
    #[must_use]
    pub fn remove(item: T, index: usize) -> Self {
        Self::new(item, Some(index), MutationAction::Remove)
    }
}
