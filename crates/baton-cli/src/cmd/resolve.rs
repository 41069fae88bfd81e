//! `bt resolve` — compute the active assignee set for one or more tasks.
//!
//! The read side of the tool: every signal recorded by the other commands
//! feeds this one. Resolution itself never fails; a task with no live
//! signals simply resolves to an empty set.

use crate::agent;
use crate::output::{CliError, OutputMode, render, render_error};
use crate::project;
use baton_core::config;
use baton_core::db::SqliteStore;
use baton_core::model::actor::ActorId;
use baton_core::model::candidate::Assignee;
use baton_core::resolve::{CollapsePolicy, ResolveOptions, resolve_assignments};
use baton_core::source::TaskDirectory;
use clap::Args;
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Task ID to resolve.
    pub id: String,

    /// Additional task IDs to resolve in the same invocation.
    #[arg(long = "ids", value_name = "ID", num_args = 1..)]
    pub additional_ids: Vec<String>,

    /// Keep every live assignee instead of collapsing to the most recent.
    #[arg(long)]
    pub all: bool,

    /// Exclude the acting agent from the result.
    #[arg(long)]
    pub exclude_me: bool,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    task_id: String,
    stage: String,
    assignees: Vec<Assignee>,
}

fn resolve_one(
    store: &SqliteStore,
    task_id: &str,
    options: &ResolveOptions,
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

    let stage = store.current_stage(task_id)?;
    let assignees = resolve_assignments(store, task_id, options);

    let result = ResolveOutput {
        task_id: task_id.to_string(),
        stage,
        assignees,
    };
    render(output, &result, |r, w| {
        if r.assignees.is_empty() {
            return writeln!(w, "{}: no active assignee", r.task_id);
        }
        writeln!(w, "{} (stage '{}'):", r.task_id, r.stage)?;
        for a in &r.assignees {
            if a.display_name.is_empty() {
                writeln!(w, "  {} ({})", a.actor_id, a.kind.as_str())?;
            } else {
                writeln!(
                    w,
                    "  {} {} <{}> ({})",
                    a.actor_id,
                    a.display_name,
                    a.email,
                    a.kind.as_str()
                )?;
            }
        }
        Ok(())
    })?;

    Ok(())
}

pub fn run_resolve(
    args: &ResolveArgs,
    agent_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let exclude = if args.exclude_me {
        match agent::require_agent(agent_flag) {
            Ok(a) => Some(ActorId::new(a)),
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
        }
    } else {
        None
    };

    let root = project::require_project_root(project_root, output)?;
    let policy = if args.all {
        CollapsePolicy::KeepAll
    } else {
        config::load_project_config(&root)?.resolve.collapse
    };
    let store = SqliteStore::open(&config::db_path(&root))?;

    let options = ResolveOptions { exclude, policy };
    let mut failures = Vec::new();
    for task_id in std::iter::once(args.id.as_str()).chain(args.additional_ids.iter().map(String::as_str))
    {
        if let Err(e) = resolve_one(&store, task_id, &options, output) {
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
