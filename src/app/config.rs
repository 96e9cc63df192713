//! Application configuration
//!
//! This module handles process-wide settings that come from the command line.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Working directory
    pub working_dir: PathBuf,
}

impl AppConfig {
    /// Create a new application configuration rooted at the current directory
    pub fn new(verbose: u8) -> Result<Self> {
        let working_dir =
            std::env::current_dir().context("Failed to get current directory")?;

        Ok(Self {
            verbose,
            working_dir,
        })
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Get the log filter based on verbosity, falling back to `configured`
    /// when no `-v` was given
    pub fn log_level(&self, configured: Option<&str>) -> String {
        match self.verbose {
            0 => configured.unwrap_or("warn").to_string(),
            1 => "debug".to_string(),
            2 => "trace".to_string(),
            _ => "trace,tokio=debug".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            working_dir: PathBuf::from("."),
        }
    }
}
