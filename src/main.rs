//! tidewatch - oceanographic alerting tool
//!
//! A command-line tool for checking measurement readings against alert
//! thresholds and watching a live notification feed.

use clap::Parser;
use tidewatch::cli::args::{generate_completions, Cli, Commands};
use tidewatch::cli::logger_builder;
use tidewatch::commands::{load_config, run_check, run_prefs, run_simulate};
use tidewatch::error::{AppError, ConfigError};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; --verbose raises the filter to debug
    logger_builder(cli.verbose).init();

    // Run the appropriate command
    let result = run(&cli).await;

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), AppError> {
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Check(args) => run_check(args, &load_config(config_path)?, cli.format),

        Commands::Simulate(args) => run_simulate(args, config_path, cli.format).await,

        Commands::Prefs(args) => run_prefs(&args.command, config_path, cli.format),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Run 'tidewatch prefs init' to create a default configuration,");
            eprintln!("      or pass --config with the path to an existing file.");
        }
        AppError::Config(ConfigError::TomlError(_)) => {
            eprintln!();
            eprintln!("Hint: Run 'tidewatch prefs validate' for details on the file.");
        }
        AppError::UnknownAttribute(_) => {
            eprintln!();
            eprintln!("Hint: Add a [preferences.thresholds.<name>] table to the config,");
            eprintln!("      or pass --quality to check data quality only.");
        }
        _ => {}
    }
}
