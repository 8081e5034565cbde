#![forbid(unsafe_code)]

//! Suspension modes and mutation actions.
//!
//! A [`SuspensionMode`] is chosen when a scope opens and selects the
//! consolidation policy that runs when it closes. Modes can be parsed from
//! their names and from a stable numeric code so hosts that persist or
//! exchange modes outside Rust get a structured [`SuspendError::UnhandledMode`]
//! instead of a silent fallback.

use std::fmt;
use std::str::FromStr;

use crate::error::SuspendError;

/// A single collection mutation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MutationAction {
    /// An item was inserted.
    Add,
    /// An item was removed.
    Remove,
}

impl MutationAction {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consolidation policy for one suspension scope.
///
/// Fixed for the lifetime of the scope that was opened with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SuspensionMode {
    /// Discard detail; closing emits a single empty Reset event.
    None,
    /// Only adds are recorded; closing emits one Add event.
    Adding,
    /// Only removes are recorded; closing emits one Remove event.
    Removing,
    /// Closing emits one event carrying every record and its action.
    Mixed,
    /// Closing emits one event per maximal run of equal actions.
    MixedBash,
    /// Closing cancels matching add/remove pairs and emits the net effect.
    MixedConsolidate,
}

impl SuspensionMode {
    /// All modes in declaration (and numeric code) order.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Adding,
        Self::Removing,
        Self::Mixed,
        Self::MixedBash,
        Self::MixedConsolidate,
    ];

    /// Whether records in this mode carry a per-record action.
    #[must_use]
    pub const fn is_mixed(self) -> bool {
        matches!(self, Self::Mixed | Self::MixedBash | Self::MixedConsolidate)
    }

    /// The single action a homogeneous mode admits, if any.
    #[must_use]
    pub const fn homogeneous_action(self) -> Option<MutationAction> {
        match self {
            Self::Adding => Some(MutationAction::Add),
            Self::Removing => Some(MutationAction::Remove),
            _ => None,
        }
    }

    /// Stable numeric code (0..=5).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Adding => 1,
            Self::Removing => 2,
            Self::Mixed => 3,
            Self::MixedBash => 4,
            Self::MixedConsolidate => 5,
        }
    }

    /// Stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Adding => "adding",
            Self::Removing => "removing",
            Self::Mixed => "mixed",
            Self::MixedBash => "mixed_bash",
            Self::MixedConsolidate => "mixed_consolidate",
        }
    }
}

impl fmt::Display for SuspensionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuspensionMode {
    type Err = SuspendError;

    /// Case-insensitive; `_` and `-` separators are ignored, so
    /// `"MixedBash"`, `"mixed_bash"` and `"mixed-bash"` are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "none" => Ok(Self::None),
            "adding" => Ok(Self::Adding),
            "removing" => Ok(Self::Removing),
            "mixed" => Ok(Self::Mixed),
            "mixedbash" => Ok(Self::MixedBash),
            "mixedconsolidate" => Ok(Self::MixedConsolidate),
            _ => Err(SuspendError::UnhandledMode(s.to_string())),
        }
    }
}

impl TryFrom<u8> for SuspensionMode {
    type Error = SuspendError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| SuspendError::UnhandledMode(code.to_string()))
    }
}
