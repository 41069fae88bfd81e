//! `bt assign` — record that the acting agent assigned a task to someone.
//!
//! `bt assign <id> <assignee>` appends `task.assigned` with the target in
//! the detail payload; `--ids` repeats the assignment across tasks.

use crate::agent;
use crate::cmd::occurred_at_us;
use crate::output::{CliError, OutputMode, render, render_error};
use crate::project;
use baton_core::db::SqliteStore;
use baton_core::signal::record::{ActionDetail, ActionRecord};
use baton_core::signal::types::ActionType;
use clap::Args;
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Task ID to assign.
    pub id: String,

    /// Actor to assign the task to.
    #[arg(value_name = "ASSIGNEE")]
    pub assignee: String,

    /// Stage this assignment applies to (unscoped when omitted).
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Additional task IDs to assign the same actor to.
    #[arg(long = "ids", value_name = "ID", num_args = 1..)]
    pub additional_ids: Vec<String>,

    /// Signal time as RFC 3339 (defaults to now).
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssignOutput {
    ok: bool,
    task_id: String,
    assignee: String,
    actor: String,
}

fn assign_one(
    store: &SqliteStore,
    task_id: &str,
    args: &AssignArgs,
    actor: &str,
    output: OutputMode,
) -> anyhow::Result<()> {
    if !store.task_exists(task_id)? {
        let msg = format!("task '{task_id}' not found");
        render_error(
            output,
            &CliError::with_details(&msg, "Create the task with 'bt create'", "task_not_found"),
        )?;
        anyhow::bail!(msg);
    }

    let record = ActionRecord {
        actor: actor.to_string(),
        action: ActionType::Assigned,
        occurred_at_us: occurred_at_us(args.at.as_deref())?,
        detail: ActionDetail {
            to: Some(args.assignee.clone()),
            assign_stage: args.stage.clone(),
            ..ActionDetail::default()
        },
    };
    store.append_action(task_id, &record)?;

    let result = AssignOutput {
        ok: true,
        task_id: task_id.to_string(),
        assignee: args.assignee.clone(),
        actor: actor.to_string(),
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ {}: assigned to {}", r.task_id, r.assignee)
    })?;

    Ok(())
}

fn assign_task_ids(args: &AssignArgs) -> impl Iterator<Item = &str> {
    std::iter::once(args.id.as_str()).chain(args.additional_ids.iter().map(String::as_str))
}

pub fn run_assign(
    args: &AssignArgs,
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

    let mut failures = Vec::new();
    for task_id in assign_task_ids(args) {
        if let Err(e) = assign_one(&store, task_id, args, &actor, output) {
            failures.push(format!("{task_id}: {e}"));
        }
    }
    if failures.is_empty() {
        Ok(())
    } else if failures.len() == 1 {
        anyhow::bail!("{}", failures[0]);
    } else {
        anyhow::bail!("{} task(s) failed", failures.len());
    }
}
