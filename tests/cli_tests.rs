//! Integration tests for the CLI interface
//!
//! Covers argument handling and failures that happen before any interpreter runs

mod common;

use common::FlowWorkspace;
use predicates::prelude::*;

#[test]
fn test_no_arguments_prints_usage_and_exits_one() {
    let workspace = FlowWorkspace::new();
    workspace
        .command()
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:"))
        .stderr(predicate::str::contains("<FILE_PATH>"));
}

#[test]
fn test_help_flag() {
    let workspace = FlowWorkspace::new();
    workspace
        .command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--flows-dir"));
}

#[test]
fn test_version_flag() {
    let workspace = FlowWorkspace::new();
    workspace
        .command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flowrun"));
}

#[test]
fn test_too_many_arguments_is_usage_error() {
    let workspace = FlowWorkspace::new();
    workspace
        .command()
        .args(["a.py", "1", "2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_flow_file() {
    let workspace = FlowWorkspace::new();
    workspace
        .command()
        .arg("missing.py")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error running flow"))
        .stderr(predicate::str::contains("Failed to load flow"))
        .stderr(predicate::str::contains("missing.py"));
}

#[test]
fn test_missing_flows_directory() {
    let workspace = FlowWorkspace::new();
    workspace
        .command()
        .args(["--flows-dir", "nowhere", "flow.py"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_unsupported_flow_type() {
    let workspace = FlowWorkspace::new().with_flow("task.rb", "def executor(a, e); end\n");
    workspace
        .command()
        .arg("task.rb")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported flow type '.rb'"));
}

#[test]
fn test_interpreter_unavailable() {
    let workspace = FlowWorkspace::new()
        .with_flow("flow.py", "async def executor(arg, emit):\n    return arg\n");
    workspace
        .command()
        .env("FLOWRUN_PYTHON", "definitely-not-a-python-12345")
        .arg("flow.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("definitely-not-a-python-12345"))
        .stderr(predicate::str::contains("is not available"));
}

#[test]
fn test_invalid_config_file() {
    let workspace = FlowWorkspace::new().with_config("flows_dir = [");
    workspace
        .command()
        .arg("flow.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let workspace = FlowWorkspace::new();
    workspace
        .command()
        .args(["-v", "missing.py"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Context Chain"));
}
