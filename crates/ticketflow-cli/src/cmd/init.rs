use anyhow::{Context as _, Result};
use clap::Args;
use std::path::Path;
use ticketflow_core::FileStorage;

use crate::output::{OutputMode, render_success};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if the project directory already exists.
    #[arg(long)]
    pub force: bool,
}

const CONFIG_TOML: &str = "[dashboard]\n\
    recent_limit = 5\n\
    \n\
    [tickets]\n\
    seed_examples = true\n";

const GITIGNORE: &str = "storage.json.lock\nstorage.json.tmp\n";

/// Execute `tf init`. Creates the project skeleton:
///
/// ```text
/// .ticketflow/
///   config.toml   (default project config template)
///   .gitignore    (lock and temp files)
/// ```
///
/// `storage.json` is created on the first write.
///
/// # Errors
///
/// Returns an error if the directory already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(args: &InitArgs, project_dir: &Path, output: OutputMode) -> Result<()> {
    if project_dir.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use `tf init --force` to reinitialize.",
            project_dir.display()
        );
    }

    std::fs::create_dir_all(project_dir).with_context(|| {
        format!(
            "Failed to create project directory: {}",
            project_dir.display()
        )
    })?;

    let config_path = project_dir.join("config.toml");
    std::fs::write(&config_path, CONFIG_TOML)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let gitignore_path = project_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write {}", gitignore_path.display()))?;

    tracing::info!(dir = %project_dir.display(), "initialized project");
    render_success(
        output,
        &format!(
            "Initialized ticketflow in {} (data: {})",
            project_dir.display(),
            FileStorage::FILE_NAME
        ),
    )
}
