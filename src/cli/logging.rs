//! Logger setup
//!
//! `RUST_LOG` is honoured; without it only warnings and errors are shown.
//! `--verbose` raises the default filter to debug.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Build the process logger
pub fn logger_builder(verbose: bool) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn enabled(verbose: bool, level: Level) -> bool {
        let logger = logger_builder(verbose).build();
        logger.enabled(&Metadata::builder().level(level).target("tidewatch").build())
    }

    #[test]
    fn test_verbose_enables_debug() {
        assert!(enabled(true, Level::Debug));
        assert!(!enabled(true, Level::Trace));
        assert_eq!(logger_builder(true).build().filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_warnings_always_enabled() {
        assert!(enabled(false, Level::Warn));
        assert!(enabled(false, Level::Error));
    }
}
