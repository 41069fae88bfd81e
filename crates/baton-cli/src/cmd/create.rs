//! `bt create` — register a new task with its creator and starting stage.

use crate::agent;
use crate::cmd::occurred_at_us;
use crate::output::{CliError, OutputMode, render, render_error};
use crate::project;
use clap::Args;
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Task ID to register.
    pub id: String,

    /// Title of the new task.
    #[arg(short, long)]
    pub title: String,

    /// Stage the task starts in.
    #[arg(short, long, default_value = "intake")]
    pub stage: String,

    /// Creation time as RFC 3339 (defaults to now).
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateOutput {
    ok: bool,
    task_id: String,
    title: String,
    stage: String,
    creator: String,
}

pub fn run_create(
    args: &CreateArgs,
    agent_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let creator = match agent::require_agent(agent_flag) {
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
    let at_us = occurred_at_us(args.at.as_deref())?;
    store.create_task(&args.id, &args.title, &creator, &args.stage, at_us)?;

    let result = CreateOutput {
        ok: true,
        task_id: args.id.clone(),
        title: args.title.clone(),
        stage: args.stage.clone(),
        creator,
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ {}: created in stage '{}'", r.task_id, r.stage)
    })?;

    Ok(())
}
