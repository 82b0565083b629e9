//! Preference command implementation
//!
//! Shows, creates and validates the alert preference configuration.

use crate::cli::args::{OutputFormat, PrefsCommands};
use crate::cli::output::{print_output, Message};
use crate::commands::load_config;
use crate::config::{Config, ConfigFile};
use crate::error::{ConfigError, Result};
use std::path::PathBuf;

/// Execute preference commands
pub fn run_prefs(
    command: &PrefsCommands,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        PrefsCommands::Show => {
            let config = load_config(config_path)?;
            print_output(&config.preferences, format)?;
        }
        PrefsCommands::Init { force } => {
            let path = config_path
                .map(PathBuf::from)
                .unwrap_or_else(ConfigFile::user_path);
            ConfigFile::save(&Config::default(), &path, *force)?;
            print_output(
                &Message {
                    message: format!("Wrote default configuration to {}", path.display()),
                    success: true,
                },
                format,
            )?;
        }
        PrefsCommands::Validate => {
            let path = resolve_existing(config_path)?;
            let config = ConfigFile::load(&path)?;
            let warnings = config.validate()?;
            for warning in &warnings {
                eprintln!("warning: {}", warning);
            }
            print_output(
                &Message {
                    message: format!(
                        "{} is valid ({} threshold channel(s), {} warning(s))",
                        path.display(),
                        config.preferences.thresholds.len(),
                        warnings.len()
                    ),
                    success: true,
                },
                format,
            )?;
        }
    }
    Ok(())
}

/// The explicit path, or the first default location that exists
fn resolve_existing(config_path: Option<&str>) -> std::result::Result<PathBuf, ConfigError> {
    match config_path {
        Some(path) => Ok(PathBuf::from(path)),
        None => ConfigFile::default_paths()
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| ConfigError::FileNotFound(ConfigFile::user_path().display().to_string())),
    }
}
