//! The normalized assignment candidate and its public projection.
//!
//! Both raw sources (action log, attachment table) are collapsed into the
//! single [`AssignmentCandidate`] shape by the normalizer, so every stage
//! after normalization operates on one type regardless of where a signal
//! came from.

use serde::{Deserialize, Serialize};

use super::actor::ActorId;

/// The two signal kinds that survive normalization. Transition-class
/// actions (handover, send-to-next) never become candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Taken,
    Assigned,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Taken => "taken",
            Self::Assigned => "assigned",
        }
    }
}

/// Which raw source produced a candidate. Traceability only; no stage of
/// the pipeline branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalOrigin {
    ActionLog,
    Attachment,
}

/// A normalized, deduplication-eligible assignment signal.
///
/// Display fields use the empty string for "not yet resolved"; the identity
/// resolver fills them from the profile directory where it can. An empty
/// `stage_label` means the signal is unscoped and matches any stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentCandidate {
    pub actor_id: ActorId,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub kind: ActionKind,
    /// Microseconds since the Unix epoch.
    pub occurred_at_us: i64,
    pub stage_label: String,
    pub origin: SignalOrigin,
}

impl AssignmentCandidate {
    /// Returns `true` if the candidate still needs a profile lookup: its
    /// display name is empty or merely echoes the actor id.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.display_name.is_empty() || self.display_name == self.actor_id.as_str()
    }

    /// Case-insensitive stage match. An empty label is unscoped and
    /// matches every stage.
    #[must_use]
    pub fn matches_stage(&self, stage: &str) -> bool {
        self.stage_label.is_empty() || self.stage_label.eq_ignore_ascii_case(stage)
    }

    /// Project to the public shape, dropping internal-only fields.
    #[must_use]
    pub fn into_assignee(self) -> Assignee {
        Assignee {
            actor_id: self.actor_id,
            display_name: self.display_name,
            email: self.email,
            role: self.role,
            kind: self.kind,
        }
    }
}

/// Public result shape returned by the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignee {
    pub actor_id: ActorId,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub kind: ActionKind,
}

#[cfg(test)]
mod tests {
    use super::{ActionKind, ActorId, AssignmentCandidate, SignalOrigin};

    fn candidate(stage_label: &str) -> AssignmentCandidate {
        AssignmentCandidate {
            actor_id: ActorId::new("u-1"),
            display_name: String::new(),
            email: String::new(),
            role: String::new(),
            kind: ActionKind::Assigned,
            occurred_at_us: 10,
            stage_label: stage_label.to_string(),
            origin: SignalOrigin::ActionLog,
        }
    }

    #[test]
    fn empty_stage_label_matches_any_stage() {
        assert!(candidate("").matches_stage("review"));
        assert!(candidate("").matches_stage("intake"));
    }

    #[test]
    fn stage_match_is_case_insensitive() {
        assert!(candidate("Review").matches_stage("review"));
        assert!(candidate("review").matches_stage("REVIEW"));
        assert!(!candidate("intake").matches_stage("review"));
    }

    #[test]
    fn unresolved_when_name_empty_or_echoes_id() {
        let mut c = candidate("");
        assert!(c.is_unresolved());

        c.display_name = "u-1".to_string();
        assert!(c.is_unresolved());

        c.display_name = "Ada".to_string();
        assert!(!c.is_unresolved());
    }

    #[test]
    fn projection_drops_internal_fields() {
        let assignee = candidate("review").into_assignee();
        let json = serde_json::to_value(&assignee).expect("serialize assignee");
        assert!(json.get("occurred_at_us").is_none());
        assert!(json.get("stage_label").is_none());
        assert!(json.get("origin").is_none());
        assert_eq!(json["actor_id"], "u-1");
        assert_eq!(json["kind"], "assigned");
    }
}
