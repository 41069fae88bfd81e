//! Action type catalog for the append-only action log.
//!
//! The string representation uses the `task.<verb>` dotted format used in
//! the persisted log. Two of the four types are assignment signals; the
//! other two are transition-class events that only ever feed the staleness
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ErrorCode;

/// The four action types in the baton signal catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// An actor took the task for themselves.
    Taken,
    /// An actor assigned the task to a (possibly different) actor.
    Assigned,
    /// The task was handed over, closing the previous stage's view.
    Handover,
    /// The task was sent on to its next stage.
    SendNext,
}

/// Error returned when parsing an unknown action type string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown action type '{raw}': expected one of task.taken, task.assigned, \
     task.handover, task.send_next"
)]
pub struct UnknownActionType {
    /// The unrecognised input string.
    pub raw: String,
}

impl UnknownActionType {
    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::UnknownActionType
    }

    /// Optional remediation hint for operators and agents.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

impl ActionType {
    /// All known action types in catalog order.
    pub const ALL: [Self; 4] = [Self::Taken, Self::Assigned, Self::Handover, Self::SendNext];

    /// The action types that normalize into assignment candidates.
    pub const CANDIDATE_KINDS: [Self; 2] = [Self::Taken, Self::Assigned];

    /// The transition-class action types that feed the staleness boundary.
    pub const TRANSITION_KINDS: [Self; 2] = [Self::Handover, Self::SendNext];

    /// Return the canonical `task.<verb>` string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Taken => "task.taken",
            Self::Assigned => "task.assigned",
            Self::Handover => "task.handover",
            Self::SendNext => "task.send_next",
        }
    }

    /// Returns `true` for transition-class types.
    #[must_use]
    pub const fn is_transition(self) -> bool {
        matches!(self, Self::Handover | Self::SendNext)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = UnknownActionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task.taken" => Ok(Self::Taken),
            "task.assigned" => Ok(Self::Assigned),
            "task.handover" => Ok(Self::Handover),
            "task.send_next" => Ok(Self::SendNext),
            _ => Err(UnknownActionType { raw: s.to_string() }),
        }
    }
}

// Custom serde: serialize as the `task.<verb>` string.
impl Serialize for ActionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
