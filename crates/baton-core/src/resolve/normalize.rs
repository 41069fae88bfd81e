//! Normalization of raw records into [`AssignmentCandidate`]s.
//!
//! This is the only place that knows the two sources' quirks. Everything
//! downstream sees one candidate shape, and creator self-signals are
//! dropped here so later stages never re-check.

use crate::model::actor::ActorId;
use crate::model::candidate::{ActionKind, AssignmentCandidate, SignalOrigin};
use crate::signal::record::{ActionRecord, AssignedEntry, AttachmentRecord};
use crate::signal::types::ActionType;

/// Normalize one action-log record. Returns `None` for transition-class
/// records and for signals pointing at the task's creator.
#[must_use]
pub fn normalize_action(record: &ActionRecord, creator: &ActorId) -> Option<AssignmentCandidate> {
    let detail = &record.detail;
    let (kind, actor_id, display_name, email, role, stage_label) = match record.action {
        ActionType::Taken => (
            ActionKind::Taken,
            ActorId::new(record.actor.clone()),
            detail.name.clone().unwrap_or_default(),
            detail.email.clone().unwrap_or_default(),
            detail.role.clone().unwrap_or_default(),
            detail.stage.clone().unwrap_or_default(),
        ),
        ActionType::Assigned => {
            // Assignment targets live in the to* variant; older records
            // only carry the generic fields for the target.
            let actor_id = match &detail.to {
                Some(to) => ActorId::new(to.clone()),
                None => ActorId::new(record.actor.clone()),
            };
            (
                ActionKind::Assigned,
                actor_id,
                detail
                    .to_name
                    .clone()
                    .or_else(|| detail.name.clone())
                    .unwrap_or_default(),
                detail
                    .to_email
                    .clone()
                    .or_else(|| detail.email.clone())
                    .unwrap_or_default(),
                detail
                    .to_role
                    .clone()
                    .or_else(|| detail.role.clone())
                    .unwrap_or_default(),
                detail.assign_stage.clone().unwrap_or_default(),
            )
        }
        ActionType::Handover | ActionType::SendNext => return None,
    };

    if &actor_id == creator {
        return None;
    }

    Some(AssignmentCandidate {
        actor_id,
        display_name,
        email,
        role,
        kind,
        occurred_at_us: record.occurred_at_us,
        stage_label,
        origin: SignalOrigin::ActionLog,
    })
}

/// Normalize one attachment record into zero or more candidates: an
/// optional taken signal plus one assigned signal per `assigned_to` entry.
#[must_use]
pub fn normalize_attachment(
    record: &AttachmentRecord,
    creator: &ActorId,
) -> Vec<AssignmentCandidate> {
    let mut out = Vec::new();

    if let Some(taken_by) = &record.taken_by {
        let actor_id = ActorId::new(taken_by.clone());
        if &actor_id != creator {
            out.push(AssignmentCandidate {
                actor_id,
                display_name: String::new(),
                email: String::new(),
                role: String::new(),
                kind: ActionKind::Taken,
                occurred_at_us: record.created_at_us,
                stage_label: String::new(),
                origin: SignalOrigin::Attachment,
            });
        }
    }

    for entry in &record.assigned_to {
        if let Some(candidate) = normalize_assigned_entry(entry, record.created_at_us, creator) {
            out.push(candidate);
        }
    }

    out
}

fn normalize_assigned_entry(
    entry: &AssignedEntry,
    record_ts_us: i64,
    creator: &ActorId,
) -> Option<AssignmentCandidate> {
    let actor_id = match &entry.id {
        Some(id) => ActorId::new(id.clone()),
        None => ActorId::unknown(),
    };
    if &actor_id == creator {
        return None;
    }

    // The entry's role has always doubled as its stage scope.
    let role = entry.role.clone().unwrap_or_default();
    Some(AssignmentCandidate {
        actor_id,
        display_name: entry.name.clone().unwrap_or_default(),
        email: entry.email.clone().unwrap_or_default(),
        role: role.clone(),
        kind: ActionKind::Assigned,
        occurred_at_us: entry.assigned_at_us.unwrap_or(record_ts_us),
        stage_label: role,
        origin: SignalOrigin::Attachment,
    })
}
