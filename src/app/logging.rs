//! Logging configuration and initialization
//!
//! Logs go to stderr. Stdout carries only emitted values and the result line.

use crate::app::config::AppConfig;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the application
pub fn init_logging(config: &AppConfig, configured_level: Option<&str>) {
    let log_level = config.log_level(configured_level);
    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2) // Show target module for -vv and above
        .with_line_number(config.verbose >= 3) // Show line numbers for -vvv
        .try_init();

    if initialized.is_ok() {
        debug!("flowrun started with verbosity level: {}", config.verbose);
        trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
    }
}
