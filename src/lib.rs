//! # flowrun
//!
//! Loads a flow module from the `flows` directory and runs its `executor`.
//!
//! ## Usage
//!
//! ```bash
//! flowrun <file-path> [arg]
//! ```
//!
//! ## Modules
//!
//! - `app` - Application config, logging setup and fatal error reporting
//! - `config` - Runner configuration from `flowrun.toml` and `FLOWRUN_*` variables
//! - `error` - Error taxonomy with numeric codes
//! - `flow` - Argument decoding, flow loading, the host protocol and the invoker
//! - `subprocess` - Subprocess abstraction layer for testing
pub mod app;
pub mod config;
pub mod error;
pub mod flow;
pub mod subprocess;
