//! Common test utilities and helpers

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch working directory with a `flows/` folder
pub struct FlowWorkspace {
    temp_dir: TempDir,
}

impl FlowWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        fs::create_dir(temp_dir.path().join("flows")).expect("create flows dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn flows_dir(&self) -> PathBuf {
        self.path().join("flows")
    }

    /// Write a flow file under `flows/`, creating parent directories
    pub fn with_flow(self, name: &str, content: &str) -> Self {
        let path = self.flows_dir().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create flow parent dir");
        }
        fs::write(path, content).expect("write flow");
        self
    }

    /// Write `flowrun.toml` in the working directory
    pub fn with_config(self, content: &str) -> Self {
        fs::write(self.path().join("flowrun.toml"), content).expect("write config");
        self
    }

    /// The flowrun binary, run from this workspace with a clean environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("flowrun").expect("flowrun binary");
        cmd.current_dir(self.path());
        for var in [
            "FLOWRUN_FLOWS_DIR",
            "FLOWRUN_ENTRY_POINT",
            "FLOWRUN_PYTHON",
            "FLOWRUN_NODE",
            "FLOWRUN_LOG_LEVEL",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }
}

/// Whether `program --version` runs successfully
pub fn interpreter_available(program: &str) -> bool {
    std::process::Command::new(program)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Skip the calling test when `program` is not installed
macro_rules! require_interpreter {
    ($program:expr) => {
        if !$crate::common::interpreter_available($program) {
            eprintln!("skipping: {} is not available", $program);
            return;
        }
    };
}
