//! Configuration file loading with precedence handling.

use crate::model::IconId;
use crate::state::{Animation, SearchBarOptions};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default animation length when the config does not override it.
pub const DEFAULT_ANIMATION_MS: u64 = 250;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/searchbar/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Hint shown in the empty input field.
    #[serde(default)]
    pub hint: Option<String>,

    /// Prompt shown while collapsed.
    #[serde(default)]
    pub placeholder: Option<String>,

    /// Start in speech mode.
    #[serde(default)]
    pub speech_mode: Option<bool>,

    /// Show the navigation icon.
    #[serde(default)]
    pub nav_button_enabled: Option<bool>,

    /// Search icon id.
    #[serde(default)]
    pub search_icon: Option<IconId>,

    /// Navigation icon id.
    #[serde(default)]
    pub nav_icon: Option<IconId>,

    /// Overflow menu items.
    #[serde(default)]
    pub menu: Option<Vec<String>>,

    /// Animate transitions.
    #[serde(default)]
    pub animations_enabled: Option<bool>,

    /// Animation catalog: resource name to duration in milliseconds.
    ///
    /// ```toml
    /// [animations]
    /// fade_in_left = 300
    /// fade_out = 150
    /// ```
    ///
    /// When present, it replaces the default catalog entirely, so leaving a
    /// name out makes that animation unavailable.
    #[serde(default)]
    pub animations: Option<HashMap<String, u64>>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Path of the saved widget state.
    #[serde(default)]
    pub state_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Hint shown in the empty input field.
    pub hint: Option<String>,
    /// Prompt shown while collapsed.
    pub placeholder: Option<String>,
    /// Start in speech mode.
    pub speech_mode: bool,
    /// Show the navigation icon.
    pub nav_button_enabled: bool,
    /// Search icon id.
    pub search_icon: IconId,
    /// Navigation icon id.
    pub nav_icon: IconId,
    /// Overflow menu items.
    pub menu: Vec<String>,
    /// Animate transitions.
    pub animations_enabled: bool,
    /// Animation catalog: resource name to duration in milliseconds.
    pub animations: HashMap<String, u64>,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Path of the saved widget state.
    pub state_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            hint: Some("Search".to_string()),
            placeholder: Some("Search".to_string()),
            speech_mode: false,
            nav_button_enabled: false,
            search_icon: IconId::UNSET,
            nav_icon: IconId::UNSET,
            menu: Vec::new(),
            animations_enabled: true,
            animations: default_animations(),
            log_file_path: default_log_path(),
            state_file_path: default_state_path(),
        }
    }
}

impl ResolvedConfig {
    /// Widget options derived from this config.
    pub fn search_bar_options(&self) -> SearchBarOptions {
        SearchBarOptions {
            hint: self.hint.clone(),
            placeholder: self.placeholder.clone(),
            speech_mode: self.speech_mode,
            nav_button_enabled: self.nav_button_enabled,
            search_icon: self.search_icon,
            nav_icon: self.nav_icon,
            menu: self.menu.clone(),
            animations_enabled: self.animations_enabled,
        }
    }

    /// Animation resources that can be loaded, with their durations.
    ///
    /// Names that do not match a known [`Animation`] are ignored.
    pub fn animation_catalog(&self) -> HashMap<Animation, Duration> {
        Animation::ALL
            .into_iter()
            .filter_map(|animation| {
                self.animations
                    .get(animation.name())
                    .map(|ms| (animation, Duration::from_millis(*ms)))
            })
            .collect()
    }
}

/// Every animation resource at [`DEFAULT_ANIMATION_MS`].
pub fn default_animations() -> HashMap<String, u64> {
    Animation::ALL
        .into_iter()
        .map(|a| (a.name().to_string(), DEFAULT_ANIMATION_MS))
        .collect()
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/searchbar/searchbar.log` on Unix-like systems,
/// or the platform equivalent. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("searchbar").join("searchbar.log")
    } else {
        PathBuf::from("searchbar.log")
    }
}

/// Resolve default saved-state path, next to the log file.
pub fn default_state_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("searchbar").join("widget.state")
    } else {
        PathBuf::from("searchbar.state")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
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

/// Resolve default config file path.
///
/// Returns `~/.config/searchbar/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("searchbar").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SEARCHBAR_CONFIG` environment variable
/// 3. Default path `~/.config/searchbar/config.toml`
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

    if let Ok(env_path) = std::env::var("SEARCHBAR_CONFIG") {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(
                "SEARCHBAR_CONFIG is set but empty".to_string(),
            ));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SEARCHBAR_HINT`: Override the input hint
/// - `SEARCHBAR_NO_ANIMATIONS`: Any non-empty value disables animations
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(hint) = std::env::var("SEARCHBAR_HINT") {
        config.hint = Some(hint);
    }

    if let Ok(value) = std::env::var("SEARCHBAR_NO_ANIMATIONS") {
        if !value.is_empty() {
            config.animations_enabled = false;
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        hint: config.hint.or(defaults.hint),
        placeholder: config.placeholder.or(defaults.placeholder),
        speech_mode: config.speech_mode.unwrap_or(defaults.speech_mode),
        nav_button_enabled: config
            .nav_button_enabled
            .unwrap_or(defaults.nav_button_enabled),
        search_icon: config.search_icon.unwrap_or(defaults.search_icon),
        nav_icon: config.nav_icon.unwrap_or(defaults.nav_icon),
        menu: config.menu.unwrap_or(defaults.menu),
        animations_enabled: config
            .animations_enabled
            .unwrap_or(defaults.animations_enabled),
        animations: config.animations.unwrap_or(defaults.animations),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        state_file_path: config.state_file_path.unwrap_or(defaults.state_file_path),
    }
}

/// Overrides collected from command-line flags.
///
/// `None` (or `false` for switches) means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--hint`
    pub hint: Option<String>,
    /// `--placeholder`
    pub placeholder: Option<String>,
    /// `--speech`
    pub speech_mode: bool,
    /// `--nav`
    pub nav_button_enabled: bool,
    /// `--no-animations`
    pub no_animations: bool,
    /// `--state-file`
    pub state_file_path: Option<PathBuf>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(hint) = cli.hint {
        config.hint = Some(hint);
    }
    if let Some(placeholder) = cli.placeholder {
        config.placeholder = Some(placeholder);
    }
    if cli.speech_mode {
        config.speech_mode = true;
    }
    if cli.nav_button_enabled {
        config.nav_button_enabled = true;
    }
    if cli.no_animations {
        config.animations_enabled = false;
    }
    if let Some(path) = cli.state_file_path {
        config.state_file_path = path;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
