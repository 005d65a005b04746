//! Operational logging for the CLI.
//!
//! Logs always go to the configured file; `--verbose` mirrors them to stderr.

use bookcheck_logging::LogDestination;
use log::LevelFilter;

use super::config::AppConfig;

pub fn initialize(config: &AppConfig) {
    let (destination, level) = if config.verbose {
        (LogDestination::Both(config.log_file.clone()), LevelFilter::Debug)
    } else {
        (LogDestination::File(config.log_file.clone()), LevelFilter::Info)
    };

    if !bookcheck_logging::initialize(destination, level) {
        eprintln!("Warning: operational logging is disabled");
    }
}
