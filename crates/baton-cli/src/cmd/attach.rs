//! `bt attach` — record an attachment with its ownership metadata.
//!
//! Attachments are the second signal source: a `--taken-by` actor and any
//! number of `--assign` entries, each written as `ID[:ROLE][@RFC3339]`.
//! A leading `:` leaves the entry's actor id empty (resolution maps it to
//! the unknown sentinel).

use crate::cmd::occurred_at_us;
use crate::output::{CliError, OutputMode, render, render_error};
use crate::project;
use anyhow::{Context, Result};
use baton_core::signal::record::{AssignedEntry, AttachmentRecord};
use chrono::DateTime;
use clap::Args;
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Task ID the attachment belongs to.
    pub id: String,

    /// Actor that took the task via this attachment.
    #[arg(long, value_name = "ACTOR")]
    pub taken_by: Option<String>,

    /// Assignment entry as `ID[:ROLE][@RFC3339]` (repeatable).
    #[arg(long = "assign", value_name = "ENTRY")]
    pub assignments: Vec<String>,

    /// Attachment creation time as RFC 3339 (defaults to now).
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
struct AttachOutput {
    ok: bool,
    task_id: String,
    assigned: usize,
}

/// Parse one `ID[:ROLE][@RFC3339]` entry spec.
fn parse_assign_spec(spec: &str) -> Result<AssignedEntry> {
    let (head, assigned_at_us) = match spec.split_once('@') {
        Some((head, raw_ts)) => {
            let ts = DateTime::parse_from_rfc3339(raw_ts)
                .with_context(|| format!("invalid timestamp in entry '{spec}': expected RFC 3339"))?
                .timestamp_micros();
            (head, Some(ts))
        }
        None => (spec, None),
    };

    let (id, role) = match head.split_once(':') {
        Some((id, role)) => (id, Some(role.to_string()).filter(|r| !r.is_empty())),
        None => (head, None),
    };

    Ok(AssignedEntry {
        id: Some(id.to_string()).filter(|i| !i.is_empty()),
        role,
        assigned_at_us,
        ..AssignedEntry::default()
    })
}

pub fn run_attach(args: &AttachArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = project::open_project_store(project_root, output)?;
    if !store.task_exists(&args.id)? {
        let msg = format!("task '{}' not found", args.id);
        render_error(
            output,
            &CliError::with_details(&msg, "Create the task with 'bt create'", "task_not_found"),
        )?;
        anyhow::bail!(msg);
    }

    let assigned_to = args
        .assignments
        .iter()
        .map(|spec| parse_assign_spec(spec))
        .collect::<Result<Vec<_>>>()?;

    let record = AttachmentRecord {
        taken_by: args.taken_by.clone(),
        assigned_to,
        created_at_us: occurred_at_us(args.at.as_deref())?,
    };
    store.add_attachment(&args.id, &record)?;

    let result = AttachOutput {
        ok: true,
        task_id: args.id.clone(),
        assigned: record.assigned_to.len(),
    };
    render(output, &result, |r, w| {
        writeln!(w, "✓ {}: attachment recorded ({} entries)", r.task_id, r.assigned)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::create::{CreateArgs, run_create};
    use crate::cmd::init::{InitArgs, run_init};
    use baton_core::source::AttachmentStore;

    fn setup_task() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        run_init(&InitArgs { force: false }, dir.path()).expect("init");
        run_create(
            &CreateArgs {
                id: "t-1".to_string(),
                title: "Fix login flow".to_string(),
                stage: "review".to_string(),
                at: None,
            },
            Some("creator-1"),
            OutputMode::Json,
            dir.path(),
        )
        .expect("create");
        dir
    }

    #[test]
    fn spec_with_id_only() {
        let entry = parse_assign_spec("u-2").expect("parse");
        assert_eq!(entry.id.as_deref(), Some("u-2"));
        assert!(entry.role.is_none());
        assert!(entry.assigned_at_us.is_none());
    }

    #[test]
    fn spec_with_role_and_timestamp() {
        let entry = parse_assign_spec("u-2:review@2024-03-01T12:00:00Z").expect("parse");
        assert_eq!(entry.id.as_deref(), Some("u-2"));
        assert_eq!(entry.role.as_deref(), Some("review"));
        assert_eq!(entry.assigned_at_us, Some(1_709_294_400_000_000));
    }

    #[test]
    fn spec_with_leading_colon_has_no_id() {
        let entry = parse_assign_spec(":review").expect("parse");
        assert!(entry.id.is_none());
        assert_eq!(entry.role.as_deref(), Some("review"));
    }

    #[test]
    fn spec_with_bad_timestamp_fails() {
        assert!(parse_assign_spec("u-2@yesterday").is_err());
    }

    #[test]
    fn attach_persists_record() {
        let dir = setup_task();
        run_attach(
            &AttachArgs {
                id: "t-1".to_string(),
                taken_by: Some("u-2".to_string()),
                assignments: vec!["u-3:review".to_string()],
                at: Some("2024-03-01T12:00:00Z".to_string()),
            },
            OutputMode::Json,
            dir.path(),
        )
        .expect("attach should succeed");

        let store = project::open_project_store(dir.path(), OutputMode::Json).expect("open");
        let records = store.attachments("t-1").expect("query");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].taken_by.as_deref(), Some("u-2"));
        assert_eq!(records[0].assigned_to.len(), 1);
        assert_eq!(records[0].assigned_to[0].id.as_deref(), Some("u-3"));
        assert_eq!(records[0].assigned_to[0].role.as_deref(), Some("review"));
    }

    #[test]
    fn attach_on_unknown_task_fails() {
        let dir = setup_task();
        let result = run_attach(
            &AttachArgs {
                id: "t-9".to_string(),
                taken_by: None,
                assignments: vec![],
                at: None,
            },
            OutputMode::Json,
            dir.path(),
        );
        assert!(result.is_err());
    }
}
