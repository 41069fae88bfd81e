//! `bt take` — record that the acting agent took a task.

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
pub struct TakeArgs {
    /// Task ID to take.
    pub id: String,

    /// Stage this take applies to (unscoped when omitted).
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Signal time as RFC 3339 (defaults to now).
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
struct TakeOutput {
    ok: bool,
    task_id: String,
    actor: String,
}

pub fn run_take(
    args: &TakeArgs,
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
    if !store.task_exists(&args.id)? {
        let msg = format!("task '{}' not found", args.id);
        render_error(
            output,
            &CliError::with_details(&msg, "Create the task with 'bt create'", "task_not_found"),
        )?;
        anyhow::bail!(msg);
    }

    let record = ActionRecord {
        actor: actor.clone(),
        action: ActionType::Taken,
        occurred_at_us: occurred_at_us(args.at.as_deref())?,
        detail: ActionDetail {
            stage: args.stage.clone(),
            ..ActionDetail::default()
        },
    };
    store.append_action(&args.id, &record)?;

    let result = TakeOutput {
        ok: true,
        task_id: args.id.clone(),
        actor,
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ {}: taken by {}", r.task_id, r.actor)
    })?;

    Ok(())
}
