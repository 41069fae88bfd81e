//! The assignment resolution pipeline.
//!
//! `resolve_assignments` is the public entry point. It never returns an
//! error: structural failures (no creator, no current stage) yield an empty
//! result, and a failing signal source simply contributes no candidates.
//! Each degradation is logged with enough context to chase down later.

pub mod boundary;
pub mod identity;
pub mod merge;
pub mod normalize;
pub mod select;

use tracing::{debug, warn};

use crate::model::actor::ActorId;
use crate::model::candidate::{Assignee, AssignmentCandidate};
use crate::signal::types::ActionType;
use crate::source::{ActionLog, AttachmentStore, ProfileDirectory, TaskDirectory};

pub use boundary::TransitionBoundary;
pub use select::CollapsePolicy;

use identity::resolve_identities;
use normalize::{normalize_action, normalize_attachment};
use select::{SelectionContext, select_active};

/// Everything the engine needs from the outside world. Blanket-implemented
/// for any type providing all four seams.
pub trait SignalSources: TaskDirectory + ActionLog + AttachmentStore + ProfileDirectory {}

impl<T: TaskDirectory + ActionLog + AttachmentStore + ProfileDirectory> SignalSources for T {}

/// Caller-supplied knobs for one resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Extra actor to exclude from the result, typically the caller.
    pub exclude: Option<ActorId>,
    pub policy: CollapsePolicy,
}

/// Resolve the active assignee set for `task_id`'s current stage.
#[must_use]
pub fn resolve_assignments<S: SignalSources>(
    sources: &S,
    task_id: &str,
    options: &ResolveOptions,
) -> Vec<Assignee> {
    let creator = match sources.creator(task_id) {
        Ok(creator) => creator,
        Err(error) => {
            warn!(%task_id, %error, "creator unavailable, resolving to empty");
            return Vec::new();
        }
    };
    let current_stage = match sources.current_stage(task_id) {
        Ok(stage) => stage,
        Err(error) => {
            warn!(%task_id, %error, "current stage unavailable, resolving to empty");
            return Vec::new();
        }
    };

    let transitions = sources
        .records(task_id, &ActionType::TRANSITION_KINDS)
        .unwrap_or_else(|error| {
            warn!(%task_id, %error, "transition history unavailable, using epoch boundary");
            Vec::new()
        });
    let boundary = TransitionBoundary::from_transitions(&transitions);

    let actions = sources
        .records(task_id, &ActionType::CANDIDATE_KINDS)
        .unwrap_or_else(|error| {
            warn!(%task_id, %error, "action log unavailable, skipping its signals");
            Vec::new()
        });
    let attachments = sources.attachments(task_id).unwrap_or_else(|error| {
        warn!(%task_id, %error, "attachments unavailable, skipping their signals");
        Vec::new()
    });

    let candidates = actions
        .iter()
        .filter_map(|record| normalize_action(record, &creator))
        .chain(
            attachments
                .iter()
                .flat_map(|record| normalize_attachment(record, &creator)),
        );

    let mut merged = merge::merge(candidates, boundary);
    resolve_identities(&mut merged, sources);

    let ctx = SelectionContext {
        current_stage,
        creator,
        exclude: options.exclude.clone(),
        policy: options.policy,
    };
    let selected = select_active(merged, &ctx);
    debug!(
        %task_id,
        boundary_us = boundary.occurred_at_us,
        selected = selected.len(),
        "resolution complete"
    );

    selected
        .into_iter()
        .map(AssignmentCandidate::into_assignee)
        .collect()
}
