use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod loader;

pub use loader::{ConfigLoader, CONFIG_FILE_NAME};

pub const DEFAULT_FLOWS_DIR: &str = "flows";
pub const DEFAULT_ENTRY_POINT: &str = "executor";
pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_NODE: &str = "node";

/// Settings for resolving and running flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Directory, relative to the working directory, that flow paths resolve against
    pub flows_dir: PathBuf,
    /// Name of the function every flow must expose
    pub entry_point: String,
    /// Interpreter command for Python flows
    pub python: String,
    /// Interpreter command for JavaScript flows
    pub node: String,
    pub log_level: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            flows_dir: PathBuf::from(DEFAULT_FLOWS_DIR),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            python: DEFAULT_PYTHON.to_string(),
            node: DEFAULT_NODE.to_string(),
            log_level: None,
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_env_from(|key| std::env::var(key).ok());
    }

    /// Apply `FLOWRUN_*` overrides using the given lookup. Empty values are ignored.
    pub fn merge_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("FLOWRUN_FLOWS_DIR") {
            self.flows_dir = PathBuf::from(dir);
        }

        if let Some(entry) = get("FLOWRUN_ENTRY_POINT") {
            self.entry_point = entry;
        }

        if let Some(python) = get("FLOWRUN_PYTHON") {
            self.python = python;
        }

        if let Some(node) = get("FLOWRUN_NODE") {
            self.node = node;
        }

        if let Some(level) = get("FLOWRUN_LOG_LEVEL") {
            self.log_level = Some(level);
        }
    }

    pub fn with_flows_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.flows_dir = dir.into();
        self
    }

    /// Base directory flow paths are resolved against
    pub fn base_dir(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.flows_dir)
    }
}
