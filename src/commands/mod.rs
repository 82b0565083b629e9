//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod check;
pub mod prefs;
pub mod simulate;

pub use check::run_check;
pub use prefs::run_prefs;
pub use simulate::run_simulate;

use crate::config::{Config, ConfigBuilder};
use crate::error::Result;

/// Load the effective configuration
///
/// An explicit path must load; otherwise the default locations are searched.
pub fn load_config(path: Option<&str>) -> Result<Config> {
    let config = ConfigBuilder::new().with_file(path)?.build();
    for warning in config.validate()? {
        log::warn!("{}", warning);
    }
    Ok(config)
}
