//! Property tests comparing the pipeline against a naive reference model.

use std::collections::HashMap;

use anyhow::Result;
use baton_core::model::actor::ActorId;
use baton_core::resolve::{CollapsePolicy, ResolveOptions, resolve_assignments};
use baton_core::signal::record::{ActionDetail, ActionRecord, AssignedEntry, AttachmentRecord};
use baton_core::signal::types::ActionType;
use baton_core::source::{ActionLog, AttachmentStore, Profile, ProfileDirectory, TaskDirectory};
use proptest::prelude::*;

const CREATOR: &str = "creator-1";
const CURRENT_STAGE: &str = "review";
const ACTORS: &[&str] = &["creator-1", "u-1", "u-2", "u-3", ""];
const STAGES: &[&str] = &["", "review", "REVIEW", "intake"];

#[derive(Debug, Clone)]
struct Fixture {
    actions: Vec<ActionRecord>,
    attachments: Vec<AttachmentRecord>,
}

impl TaskDirectory for Fixture {
    fn creator(&self, _task_id: &str) -> Result<ActorId> {
        Ok(ActorId::new(CREATOR))
    }

    fn current_stage(&self, _task_id: &str) -> Result<String> {
        Ok(CURRENT_STAGE.to_string())
    }
}

impl ActionLog for Fixture {
    fn records(&self, _task_id: &str, kinds: &[ActionType]) -> Result<Vec<ActionRecord>> {
        let mut out: Vec<ActionRecord> = self
            .actions
            .iter()
            .filter(|r| kinds.contains(&r.action))
            .cloned()
            .collect();
        out.sort_by_key(|r| std::cmp::Reverse(r.occurred_at_us));
        Ok(out)
    }
}

impl AttachmentStore for Fixture {
    fn attachments(&self, _task_id: &str) -> Result<Vec<AttachmentRecord>> {
        Ok(self.attachments.clone())
    }
}

impl ProfileDirectory for Fixture {
    fn resolve(&self, _actor_id: &ActorId) -> Result<Option<Profile>> {
        Ok(None)
    }
}

/// One raw action, timestamps assigned by position so they are unique.
fn arb_actions() -> impl Strategy<Value = Vec<ActionRecord>> {
    let event = (0..ACTORS.len(), 0..ActionType::ALL.len(), 0..STAGES.len());
    prop::collection::vec(event, 0..24).prop_map(|events| {
        events
            .into_iter()
            .enumerate()
            .map(|(pos, (actor_idx, action_idx, stage_idx))| {
                let ts = 1 + 10 * i64::try_from(pos).unwrap_or(i64::MAX);
                let action = ActionType::ALL[action_idx];
                let stage = STAGES[stage_idx];
                let detail = match action {
                    ActionType::Taken => ActionDetail {
                        stage: Some(stage.to_string()),
                        ..ActionDetail::default()
                    },
                    ActionType::Assigned => ActionDetail {
                        to: Some(ACTORS[actor_idx].to_string()),
                        assign_stage: Some(stage.to_string()),
                        ..ActionDetail::default()
                    },
                    ActionType::Handover | ActionType::SendNext => ActionDetail::default(),
                };
                ActionRecord {
                    actor: ACTORS[actor_idx].to_string(),
                    action,
                    occurred_at_us: ts,
                    detail,
                }
            })
            .collect()
    })
}

fn arb_attachments() -> impl Strategy<Value = Vec<AttachmentRecord>> {
    let entry = (0..ACTORS.len(), 0..STAGES.len());
    let record = (
        prop::option::of(0..ACTORS.len()),
        prop::collection::vec(entry, 0..3),
        1_i64..300,
    );
    prop::collection::vec(record, 0..4).prop_map(|records| {
        records
            .into_iter()
            .map(|(taken_idx, entries, created_at_us)| AttachmentRecord {
                taken_by: taken_idx.map(|idx| ACTORS[idx].to_string()),
                assigned_to: entries
                    .into_iter()
                    .map(|(actor_idx, stage_idx)| AssignedEntry {
                        id: Some(ACTORS[actor_idx].to_string()),
                        role: Some(STAGES[stage_idx].to_string()),
                        ..AssignedEntry::default()
                    })
                    .collect(),
                created_at_us,
            })
            .collect()
    })
}

/// Naive reference: boundary, staleness, per-actor dedup, stage scoping,
/// exclusions, most-recent pick, written as plain scans over the action
/// log alone.
fn reference_winner(actions: &[ActionRecord], exclude: Option<&str>) -> Option<String> {
    let boundary = actions
        .iter()
        .filter(|r| r.action.is_transition())
        .map(|r| r.occurred_at_us)
        .max()
        .unwrap_or(0);

    let mut best: HashMap<String, (i64, String)> = HashMap::new();
    for record in actions {
        let (actor, stage) = match record.action {
            ActionType::Taken => (
                record.actor.clone(),
                record.detail.stage.clone().unwrap_or_default(),
            ),
            ActionType::Assigned => (
                record.detail.to.clone().unwrap_or_else(|| record.actor.clone()),
                record.detail.assign_stage.clone().unwrap_or_default(),
            ),
            ActionType::Handover | ActionType::SendNext => continue,
        };
        let actor = if actor.is_empty() {
            "unknown".to_string()
        } else {
            actor
        };
        if actor == CREATOR || record.occurred_at_us <= boundary {
            continue;
        }
        let entry = best.entry(actor).or_insert((i64::MIN, String::new()));
        if record.occurred_at_us > entry.0 {
            *entry = (record.occurred_at_us, stage);
        }
    }

    best.into_iter()
        .filter(|(actor, (_, stage))| {
            Some(actor.as_str()) != exclude
                && (stage.is_empty() || stage.eq_ignore_ascii_case(CURRENT_STAGE))
        })
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then_with(|| b.0.cmp(&a.0)))
        .map(|(actor, _)| actor)
}

proptest! {
    #[test]
    fn matches_reference_model_on_action_log(actions in arb_actions()) {
        let fixture = Fixture { actions: actions.clone(), attachments: Vec::new() };
        let result = resolve_assignments(&fixture, "t-1", &ResolveOptions::default());
        let expected = reference_winner(&actions, None);

        prop_assert_eq!(
            result.first().map(|a| a.actor_id.as_str().to_string()),
            expected
        );
    }

    #[test]
    fn input_order_never_changes_the_result(actions in arb_actions()) {
        let forward = Fixture { actions: actions.clone(), attachments: Vec::new() };
        let mut reversed_actions = actions;
        reversed_actions.reverse();
        let reversed = Fixture { actions: reversed_actions, attachments: Vec::new() };

        let options = ResolveOptions::default();
        prop_assert_eq!(
            resolve_assignments(&forward, "t-1", &options),
            resolve_assignments(&reversed, "t-1", &options)
        );
    }

    #[test]
    fn creator_and_excluded_actor_never_surface(
        actions in arb_actions(),
        attachments in arb_attachments(),
    ) {
        let fixture = Fixture { actions, attachments };
        let options = ResolveOptions {
            exclude: Some(ActorId::new("u-2")),
            policy: CollapsePolicy::KeepAll,
        };
        let result = resolve_assignments(&fixture, "t-1", &options);
        for assignee in &result {
            prop_assert_ne!(assignee.actor_id.as_str(), CREATOR);
            prop_assert_ne!(assignee.actor_id.as_str(), "u-2");
        }
    }

    #[test]
    fn default_policy_returns_at_most_one(
        actions in arb_actions(),
        attachments in arb_attachments(),
    ) {
        let fixture = Fixture { actions, attachments };
        let result = resolve_assignments(&fixture, "t-1", &ResolveOptions::default());
        prop_assert!(result.len() <= 1);
    }

    #[test]
    fn keep_all_is_ordered_and_deduplicated(
        actions in arb_actions(),
        attachments in arb_attachments(),
    ) {
        let fixture = Fixture { actions, attachments };
        let options = ResolveOptions {
            exclude: None,
            policy: CollapsePolicy::KeepAll,
        };
        let result = resolve_assignments(&fixture, "t-1", &options);

        let mut seen = std::collections::HashSet::new();
        for assignee in &result {
            prop_assert!(seen.insert(assignee.actor_id.clone()), "duplicate actor in result");
        }
    }
}
