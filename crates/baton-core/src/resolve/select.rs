//! Final selection: stage scoping, exclusions, and the collapse policy.

use serde::{Deserialize, Serialize};

use crate::model::actor::ActorId;
use crate::model::candidate::AssignmentCandidate;

/// How the active set is collapsed after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollapsePolicy {
    /// Keep only the most recent surviving candidate.
    #[default]
    #[serde(rename = "most-recent")]
    MostRecentOnly,
    /// Keep every surviving candidate, newest first.
    #[serde(rename = "all")]
    KeepAll,
}

/// Inputs the selector filters against.
#[derive(Debug, Clone)]
pub struct SelectionContext {
    pub current_stage: String,
    pub creator: ActorId,
    /// Extra actor to exclude, typically the caller.
    pub exclude: Option<ActorId>,
    pub policy: CollapsePolicy,
}

/// Apply stage scoping and exclusions, order newest first, and collapse
/// per the policy. Equal timestamps break ties by actor id so the result
/// is stable across runs.
#[must_use]
pub fn select_active(
    mut candidates: Vec<AssignmentCandidate>,
    ctx: &SelectionContext,
) -> Vec<AssignmentCandidate> {
    candidates.retain(|c| {
        c.matches_stage(&ctx.current_stage)
            && c.actor_id != ctx.creator
            && ctx.exclude.as_ref() != Some(&c.actor_id)
    });

    candidates.sort_by(|a, b| {
        b.occurred_at_us
            .cmp(&a.occurred_at_us)
            .then_with(|| a.actor_id.cmp(&b.actor_id))
    });

    if ctx.policy == CollapsePolicy::MostRecentOnly {
        candidates.truncate(1);
    }
    candidates
}
