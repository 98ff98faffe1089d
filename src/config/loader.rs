//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PSNAV_CONFIG";
/// Environment variable overriding the shell executable.
pub const SHELL_ENV: &str = "PSNAV_SHELL";
/// Environment variable selecting a JSON fixture catalog.
pub const CATALOG_ENV: &str = "PSNAV_CATALOG";

const DEFAULT_SHELL: &str = "pwsh";
const DEFAULT_POLL_INTERVAL_MS: u64 = 30;
const MAX_POLL_INTERVAL_MS: u64 = 1000;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error message
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message with location
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; unset fields fall back to defaults.
/// Corresponds to `~/.config/psnav/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Executable used to query modules and help.
    #[serde(default)]
    pub shell: Option<String>,

    /// Collapse module families (`Az.*`) while the filter is empty.
    #[serde(default)]
    pub group_families: Option<bool>,

    /// Idle sleep between key polls, in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    /// JSON catalog to browse instead of a live shell.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Executable used to query modules and help.
    pub shell: String,
    /// Collapse module families while the filter is empty.
    pub group_families: bool,
    /// Always within 1..=1000.
    pub poll_interval_ms: u64,
    /// JSON catalog replacing the live shell, if any.
    pub catalog: Option<PathBuf>,
    /// Where tracing output is written.
    pub log_file_path: PathBuf,
}

impl ResolvedConfig {
    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            group_families: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            catalog: None,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// `~/.local/state/psnav/psnav.log` on Linux; falls back to the current
/// directory when no state directory exists for the platform.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("psnav").join("psnav.log"),
        None => PathBuf::from("psnav.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path (`~/.config/psnav/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("psnav").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` (CLI `--config`)
/// 2. `PSNAV_CONFIG` environment variable
/// 3. Default path
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        shell: config.shell.unwrap_or(defaults.shell),
        group_families: config.group_families.unwrap_or(defaults.group_families),
        poll_interval_ms: config
            .poll_interval_ms
            .unwrap_or(defaults.poll_interval_ms)
            .clamp(1, MAX_POLL_INTERVAL_MS),
        catalog: config.catalog.or(defaults.catalog),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply `PSNAV_SHELL` and `PSNAV_CATALOG`.
///
/// Empty values are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(shell) = std::env::var(SHELL_ENV) {
        if !shell.trim().is_empty() {
            config.shell = shell;
        }
    }

    if let Ok(catalog) = std::env::var(CATALOG_ENV) {
        if !catalog.trim().is_empty() {
            config.catalog = Some(PathBuf::from(catalog));
        }
    }

    config
}

/// Overrides collected from command-line flags.
///
/// Only flags the user actually passed are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--shell`
    pub shell: Option<String>,
    /// `--catalog`
    pub catalog: Option<PathBuf>,
    /// `--group`
    pub group_families: Option<bool>,
}

/// Apply CLI overrides (highest precedence).
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(shell) = overrides.shell {
        config.shell = shell;
    }

    if let Some(catalog) = overrides.catalog {
        config.catalog = Some(catalog);
    }

    if let Some(group) = overrides.group_families {
        config.group_families = group;
    }

    config
}

/// Run the whole chain: defaults → file → environment → CLI.
///
/// # Errors
///
/// Returns error if a config file exists but cannot be read or parsed.
pub fn resolve(
    config_path: Option<PathBuf>,
    overrides: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let merged = merge_config(file);
    let with_env = apply_env_overrides(merged);
    Ok(apply_cli_overrides(with_env, overrides))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
