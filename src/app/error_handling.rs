//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use crate::error::FlowError;
use tracing::error;

/// Report a fatal error on stderr and exit
///
/// In verbose mode the error's cause chain is printed as well. Every failure
/// exits with status 1.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    let exit_code = if let Some(flow_err) = error.downcast_ref::<FlowError>() {
        eprintln!("Error running flow: {flow_err}");

        if verbose >= 1 {
            eprintln!("\nContext Chain:\n{}", flow_err.developer_message());
        }

        flow_err.exit_code()
    } else {
        eprintln!("Error running flow: {error}");

        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }

        1
    };

    std::process::exit(exit_code)
}
