//! Application module
//!
//! This module contains application-level functionality including:
//! - Configuration handling
//! - Logging setup
//! - Running a flow from parsed command-line input
//! - Fatal error reporting

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod runtime;

// Re-export main application functions
pub use config::AppConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
pub use runtime::run_flow;
