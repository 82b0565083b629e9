//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Threshold and data-quality alerting for oceanographic measurements
///
/// Evaluate readings against configured bands and watch the resulting
/// notification feed.
#[derive(Parser, Debug)]
#[command(name = "tidewatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TIDEWATCH_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a single reading and show the resulting notifications
    Check(CheckArgs),

    /// Run a live session with simulated readings and heartbeat updates
    Simulate(SimulateArgs),

    /// Show, create or validate alert preferences
    Prefs(PrefsArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Measurement channel, e.g. temperature
    #[arg(short, long)]
    pub attribute: String,

    /// Numeric value of the reading
    #[arg(long, allow_negative_numbers = true)]
    pub value: f64,

    /// Display title (defaults to the capitalised channel name)
    #[arg(long)]
    pub title: Option<String>,

    /// Formatted value shown in messages, e.g. "32°C"
    #[arg(long)]
    pub display: Option<String>,

    /// Data quality score in percent
    #[arg(short, long)]
    pub quality: Option<f64>,
}

/// Arguments for the simulate command
#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Session length in seconds
    #[arg(short, long, default_value = "60")]
    pub duration: u64,

    /// Seconds between simulated readings
    #[arg(short, long, default_value = "5")]
    pub interval: u64,

    /// Heartbeat period in seconds (overrides the config file)
    #[arg(long)]
    pub heartbeat: Option<u64>,

    /// Disable heartbeat notifications
    #[arg(long)]
    pub no_heartbeat: bool,

    /// Expiry delay for non-critical notifications in milliseconds
    #[arg(long)]
    pub expiry_ms: Option<u64>,

    /// Maximum notifications kept in the feed
    #[arg(long)]
    pub max_notifications: Option<usize>,
}

/// Arguments for preference commands
#[derive(Parser, Debug)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: PrefsCommands,
}

/// Preference subcommands
#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Show the effective preferences
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for scripting
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "tidewatch", &mut std::io::stdout());
}
