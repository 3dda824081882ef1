//! Collapsible search bar - Entry Point

use clap::Parser;
use searchbar::config::CliOverrides;
use searchbar::model::AppError;
use std::path::PathBuf;
use tracing::info;

/// Collapsible search bar - terminal demo host
#[derive(Parser, Debug)]
#[command(name = "searchbar")]
#[command(version)]
#[command(about = "Collapsible search bar with animated expand and collapse")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hint shown in the empty input field
    #[arg(long)]
    pub hint: Option<String>,

    /// Prompt shown while collapsed
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Start in speech mode (leading icon is a microphone)
    #[arg(long)]
    pub speech: bool,

    /// Show the navigation icon
    #[arg(long)]
    pub nav: bool,

    /// Switch transitions instantly
    #[arg(long)]
    pub no_animations: bool,

    /// Where the widget state is saved on exit
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Ignore any saved state on startup
    #[arg(long)]
    pub fresh: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            hint: self.hint.clone(),
            placeholder: self.placeholder.clone(),
            speech_mode: self.speech,
            nav_button_enabled: self.nav,
            no_animations: self.no_animations,
            state_file_path: self.state_file.clone(),
        }
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = searchbar::config::load_config_with_precedence(args.config.clone())?;
        let merged = searchbar::config::merge_config(config_file);
        let with_env = searchbar::config::apply_env_overrides(merged);
        searchbar::config::apply_cli_overrides(with_env, args.overrides())
    };

    // Held until exit so buffered log lines are flushed.
    let _log_guard = searchbar::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    searchbar::view::run(&config, args.fresh)?;

    Ok(())
}
