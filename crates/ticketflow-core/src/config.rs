use crate::dashboard::DEFAULT_RECENT_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Name of the per-project directory holding config and storage.
pub const PROJECT_DIR_NAME: &str = ".ticketflow";

/// Environment override for the project directory.
pub const PROJECT_DIR_ENV: &str = "TICKETFLOW_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub tickets: TicketsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketsConfig {
    /// Start a fresh install with the three example tickets.
    #[serde(default = "default_true")]
    pub seed_examples: bool,
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            seed_examples: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Locate the project directory.
///
/// `TICKETFLOW_DIR` wins; otherwise the nearest `.ticketflow/` walking up
/// from `start`; otherwise `start/.ticketflow` (created lazily on first write).
#[must_use]
pub fn resolve_project_dir(start: &Path) -> PathBuf {
    if let Some(dir) = env::var_os(PROJECT_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    find_project_dir(start).unwrap_or_else(|| start.join(PROJECT_DIR_NAME))
}

/// Walk up from `start` looking for an existing `.ticketflow/` directory.
#[must_use]
pub fn find_project_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(PROJECT_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load `config.toml` from the project directory. A missing file is the default config.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig> {
    let path = project_dir.join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config from the platform config directory.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("ticketflow/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Merge project and user config and resolve the output mode.
///
/// # Errors
///
/// Returns an error if either config file is unreadable or malformed.
pub fn resolve_config(project_dir: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_dir)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_json,
        user.output.clone(),
        env_format,
        std::io::stdout().is_terminal(),
    );

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

/// Normalize an output mode name, accepting legacy aliases.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

fn resolve_output(
    cli_json: bool,
    user_output: Option<String>,
    env_format: Option<String>,
    is_tty: bool,
) -> String {
    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if is_tty {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_true() -> bool {
    true
}

const fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let cfg = load_project_config(dir.path()).expect("load should succeed");
        assert_eq!(cfg.dashboard.recent_limit, 5);
        assert!(cfg.tickets.seed_examples);
    }

    #[test]
    fn partial_project_config_fills_defaults() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join("config.toml"),
            "[tickets]\nseed_examples = false\n",
        )
        .expect("write config");

        let cfg = load_project_config(dir.path()).expect("load");
        assert!(!cfg.tickets.seed_examples);
        assert_eq!(cfg.dashboard.recent_limit, 5);
    }

    #[test]
    fn malformed_project_config_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("config.toml"), "[dashboard\n").expect("write");
        let err = load_project_config(dir.path()).expect_err("parse must fail");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        let output = resolve_output(
            true,
            Some("pretty".to_string()),
            Some("text".to_string()),
            true,
        );
        assert_eq!(output, "json");
    }

    #[test]
    fn env_beats_user_config() {
        let output = resolve_output(false, Some("json".to_string()), Some("text".to_string()), true);
        assert_eq!(output, "text");
    }

    #[test]
    fn legacy_aliases_are_normalized() {
        let pretty = resolve_output(false, Some("table".to_string()), Some("human".to_string()), false);
        assert_eq!(pretty, "pretty");

        let text = resolve_output(false, Some("table".to_string()), None, true);
        assert_eq!(text, "text");
    }

    #[test]
    fn tty_decides_when_nothing_is_configured() {
        assert_eq!(resolve_output(false, None, None, true), "pretty");
        assert_eq!(resolve_output(false, None, None, false), "text");
    }

    #[test]
    fn find_project_dir_walks_up() {
        let root = TempDir::new().expect("tempdir");
        std::fs::create_dir(root.path().join(PROJECT_DIR_NAME)).expect("mkdir");
        let nested = root.path().join("a/b/c");
        std::fs::create_dir_all(&nested).expect("mkdir nested");

        assert_eq!(
            find_project_dir(&nested),
            Some(root.path().join(PROJECT_DIR_NAME))
        );
    }

    #[test]
    fn find_project_dir_none_without_marker() {
        let root = TempDir::new().expect("tempdir");
        let found = find_project_dir(root.path());
        // A stray .ticketflow above the temp dir would be found; only assert
        // it is not inside this tree.
        assert!(found.is_none_or(|dir| !dir.starts_with(root.path())));
    }
}
