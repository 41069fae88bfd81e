//! Project discovery and store access shared by command handlers.

use crate::output::{CliError, OutputMode, render_error};
use baton_core::config;
use baton_core::db::SqliteStore;
use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a directory containing `.baton/`.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(config::BATON_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Locate the enclosing project root, rendering a structured error when
/// there is none so callers can simply `?`.
///
/// # Errors
///
/// Returns an error if no enclosing project is found.
pub fn require_project_root(start: &Path, output: OutputMode) -> anyhow::Result<PathBuf> {
    find_project_root(start).ok_or_else(|| {
        let msg = "Not a baton project: .baton directory not found";
        render_error(
            output,
            &CliError::with_details(
                msg,
                "Run 'bt init' to create a new baton project",
                "not_a_project",
            ),
        )
        .ok();
        anyhow::anyhow!(msg)
    })
}

/// Locate the enclosing project and open its store.
///
/// # Errors
///
/// Returns an error if no project is found or the store cannot be opened.
pub fn open_project_store(start: &Path, output: OutputMode) -> anyhow::Result<SqliteStore> {
    let root = require_project_root(start, output)?;
    SqliteStore::open(&config::db_path(&root))
}
