use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::resolve::CollapsePolicy;

/// Per-project state directory name.
pub const BATON_DIR: &str = ".baton";
/// Config file name inside [`BATON_DIR`].
pub const CONFIG_FILE: &str = "config.toml";
/// Database file name inside [`BATON_DIR`].
pub const DB_FILE: &str = "baton.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub resolve: ResolveConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default)]
    pub collapse: CollapsePolicy,
}

/// Path to the project's database file.
#[must_use]
pub fn db_path(project_root: &Path) -> PathBuf {
    project_root.join(BATON_DIR).join(DB_FILE)
}

/// Load the project config, falling back to defaults when the file is
/// absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(BATON_DIR).join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write a default config file, used by project initialization. Leaves an
/// existing file untouched.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_default_config(project_root: &Path) -> Result<PathBuf> {
    let dir = project_root.join(BATON_DIR);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        return Ok(path);
    }

    let content = toml::to_string_pretty(&ProjectConfig::default())
        .context("serialize default config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
