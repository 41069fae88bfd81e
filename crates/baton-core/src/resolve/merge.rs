//! Staleness filtering and per-actor deduplication.

use std::collections::HashMap;

use crate::model::actor::ActorId;
use crate::model::candidate::AssignmentCandidate;

use super::boundary::TransitionBoundary;

/// Drop candidates at or before the boundary, then collapse to one
/// candidate per actor, keeping the latest timestamp. When two candidates
/// for the same actor carry the same timestamp the first one seen wins, so
/// callers feeding sources in a fixed order get a deterministic result.
#[must_use]
pub fn merge(
    candidates: impl IntoIterator<Item = AssignmentCandidate>,
    boundary: TransitionBoundary,
) -> Vec<AssignmentCandidate> {
    let mut latest: HashMap<ActorId, AssignmentCandidate> = HashMap::new();

    for candidate in candidates {
        if !boundary.admits(candidate.occurred_at_us) {
            continue;
        }
        match latest.entry(candidate.actor_id.clone()) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                if candidate.occurred_at_us > slot.get().occurred_at_us {
                    slot.insert(candidate);
                }
            }
        }
    }

    latest.into_values().collect()
}
