//! `bt init` — initialize a baton project.

use anyhow::Result;
use baton_core::config;
use baton_core::db::SqliteStore;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.baton/` already exists.
    #[arg(long)]
    pub force: bool,
}

/// Execute `bt init`. Creates the project skeleton:
///
/// ```text
/// .baton/
///   config.toml    (default project config template)
///   baton.db       (SQLite store at the latest schema)
/// ```
///
/// # Errors
///
/// Returns an error if `.baton/` already exists and `--force` is not set,
/// or if any filesystem or database operation fails.
pub fn run_init(args: &InitArgs, project_root: &Path) -> Result<()> {
    let baton_dir = project_root.join(config::BATON_DIR);

    if baton_dir.exists() && !args.force {
        anyhow::bail!(".baton/ already exists. Use `bt init --force` to reinitialize.");
    }

    config::write_default_config(project_root)?;
    let db_path = config::db_path(project_root);
    drop(SqliteStore::open(&db_path)?);

    println!("✓ Initialized .baton/ project structure.");
    println!();
    println!("  Store:  .baton/{}", config::DB_FILE);
    println!("  Config: .baton/{}", config::CONFIG_FILE);
    println!();
    println!("Next steps:");
    println!("  Set your agent identity (required for mutations):");
    println!("    export AGENT=your-name        # short form");
    println!("    export BATON_AGENT=your-name  # explicit override");
    println!();
    println!("  Create your first task:");
    println!("    bt create t-1 --title \"My first task\" --stage intake");

    Ok(())
}
