//! Staleness boundary derived from transition-class actions.

use crate::signal::record::ActionRecord;

/// Microsecond timestamp of the Unix epoch, the boundary when a task has
/// never transitioned.
pub const EPOCH_US: i64 = 0;

/// The staleness boundary: assignment signals at or before it belong to a
/// previous stage's view of the task and are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionBoundary {
    /// Microseconds since the Unix epoch.
    pub occurred_at_us: i64,
}

impl Default for TransitionBoundary {
    fn default() -> Self {
        Self {
            occurred_at_us: EPOCH_US,
        }
    }
}

impl TransitionBoundary {
    /// Find the most recent transition in `records`, regardless of input
    /// order. Non-transition records are the caller's bug but are simply
    /// ignored here; an empty slice yields the epoch boundary.
    #[must_use]
    pub fn from_transitions(records: &[ActionRecord]) -> Self {
        let occurred_at_us = records
            .iter()
            .filter(|r| r.action.is_transition())
            .map(|r| r.occurred_at_us)
            .max()
            .unwrap_or(EPOCH_US);
        Self { occurred_at_us }
    }

    /// Returns `true` if a signal at `ts_us` is still live, meaning
    /// strictly after the boundary.
    #[must_use]
    pub const fn admits(self, ts_us: i64) -> bool {
        ts_us > self.occurred_at_us
    }
}
