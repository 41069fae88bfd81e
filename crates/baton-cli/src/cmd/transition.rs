//! `bt handover` / `bt advance` — record transition-class events.
//!
//! Transitions never produce assignment candidates; they move the
//! staleness boundary forward so older signals stop resolving.

use crate::agent;
use crate::cmd::occurred_at_us;
use crate::output::{CliError, OutputMode, render, render_error};
use crate::project;
use baton_core::signal::record::{ActionDetail, ActionRecord};
use baton_core::signal::types::ActionType;
use clap::Args;
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug)]
pub struct HandoverArgs {
    /// Task ID being handed over.
    pub id: String,

    /// Event time as RFC 3339 (defaults to now).
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

#[derive(Args, Debug)]
pub struct AdvanceArgs {
    /// Task ID being sent to its next stage.
    pub id: String,

    /// Event time as RFC 3339 (defaults to now).
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
struct TransitionOutput {
    ok: bool,
    task_id: String,
    action: String,
}

fn run_transition(
    task_id: &str,
    at: Option<&str>,
    action: ActionType,
    agent_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let actor = match agent::require_agent(agent_flag) {
        Ok(a) => a,
        Err(e) => {
            render_error(
                output,
                &CliError::with_details(
                    &e.message,
                    "Set --agent, BATON_AGENT, AGENT, or USER (interactive only)",
                    e.code,
                ),
            )?;
            anyhow::bail!(e.message);
        }
    };

    let store = project::open_project_store(project_root, output)?;
    if !store.task_exists(task_id)? {
        let msg = format!("task '{task_id}' not found");
        render_error(
            output,
            &CliError::with_details(&msg, "Create the task with 'bt create'", "task_not_found"),
        )?;
        anyhow::bail!(msg);
    }

    let record = ActionRecord {
        actor,
        action,
        occurred_at_us: occurred_at_us(at)?,
        detail: ActionDetail::default(),
    };
    store.append_action(task_id, &record)?;

    let result = TransitionOutput {
        ok: true,
        task_id: task_id.to_string(),
        action: action.to_string(),
    };
    render(output, &result, |r, w| match r.action.as_str() {
        "task.handover" => writeln!(w, "✓ {}: handed over", r.task_id),
        _ => writeln!(w, "✓ {}: sent to next stage", r.task_id),
    })?;

    Ok(())
}

pub fn run_handover(
    args: &HandoverArgs,
    agent_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    run_transition(
        &args.id,
        args.at.as_deref(),
        ActionType::Handover,
        agent_flag,
        output,
        project_root,
    )
}

pub fn run_advance(
    args: &AdvanceArgs,
    agent_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    run_transition(
        &args.id,
        args.at.as_deref(),
        ActionType::SendNext,
        agent_flag,
        output,
        project_root,
    )
}
