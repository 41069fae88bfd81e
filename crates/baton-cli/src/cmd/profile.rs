//! `bt profile` — upsert an actor's directory profile.
//!
//! Profiles feed identity resolution: once an actor has a profile, resolved
//! assignees carry its display name, email, and default role.

use crate::cmd::occurred_at_us;
use crate::output::{OutputMode, render};
use crate::project;
use baton_core::source::Profile;
use clap::Args;
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Actor ID the profile belongs to.
    pub actor_id: String,

    /// Display name.
    #[arg(short, long)]
    pub name: String,

    /// Email address.
    #[arg(short, long)]
    pub email: String,

    /// Default role (used when a signal carries none).
    #[arg(short, long)]
    pub role: Option<String>,

    /// Update time as RFC 3339 (defaults to now).
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProfileOutput {
    ok: bool,
    actor_id: String,
    name: String,
}

pub fn run_profile(
    args: &ProfileArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let store = project::open_project_store(project_root, output)?;
    let profile = Profile {
        name: args.name.clone(),
        email: args.email.clone(),
        role: args.role.clone(),
    };
    store.upsert_profile(&args.actor_id, &profile, occurred_at_us(args.at.as_deref())?)?;

    let result = ProfileOutput {
        ok: true,
        actor_id: args.actor_id.clone(),
        name: args.name.clone(),
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ {}: profile saved ({})", r.actor_id, r.name)
    })?;

    Ok(())
}
