use super::script::{OutputRelay, ScriptFlow, StderrRelay};
use super::{FlowUnit, UnitLoader};
use crate::config::RunnerConfig;
use crate::error::{ErrorCode, FlowError, Result};
use crate::subprocess::{ProcessCommand, ProcessCommandBuilder, SubprocessManager};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const PYTHON_HOST: &str = include_str!("hosts/python_host.py");
const NODE_HOST: &str = include_str!("hosts/node_host.mjs");

/// Environment variable through which hosts receive the flow path
pub const UNIT_PATH_ENV: &str = "FLOWRUN_UNIT_PATH";

/// Interpreter family a flow file runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRuntime {
    Python,
    JavaScript,
}

impl FlowRuntime {
    /// Detect the runtime from the file extension
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" => Some(Self::Python),
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    pub fn interpreter<'a>(&self, config: &'a RunnerConfig) -> &'a str {
        match self {
            Self::Python => &config.python,
            Self::JavaScript => &config.node,
        }
    }

    /// Build the command that starts this runtime's host for `path`
    pub fn host_command(
        &self,
        config: &RunnerConfig,
        path: &Path,
        working_dir: &Path,
    ) -> ProcessCommand {
        let builder = ProcessCommandBuilder::new(self.interpreter(config))
            .env(UNIT_PATH_ENV, &path.to_string_lossy())
            .current_dir(working_dir);

        match self {
            Self::Python => builder
                .args(["-c", PYTHON_HOST])
                .env("PYTHONUNBUFFERED", "1")
                .env("PYTHONDONTWRITEBYTECODE", "1")
                .build(),
            Self::JavaScript => builder
                .args(["--input-type=module", "-e", NODE_HOST])
                .build(),
        }
    }
}

impl fmt::Display for FlowRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::JavaScript => write!(f, "javascript"),
        }
    }
}

/// Loads flow scripts by starting an interpreter host for them
pub struct FlowLoader {
    subprocess: SubprocessManager,
    config: RunnerConfig,
    working_dir: PathBuf,
    relay: Arc<dyn OutputRelay>,
}

impl FlowLoader {
    pub fn new(subprocess: SubprocessManager, config: RunnerConfig, working_dir: PathBuf) -> Self {
        Self {
            subprocess,
            config,
            working_dir,
            relay: Arc::new(StderrRelay),
        }
    }

    /// Send flow stderr somewhere other than our own stderr
    pub fn with_relay(mut self, relay: Arc<dyn OutputRelay>) -> Self {
        self.relay = relay;
        self
    }

    /// Check the path names a readable regular file
    async fn check_file(path: &Path) -> Result<()> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FlowError::load(ErrorCode::LOAD_NOT_FOUND, path, "file not found")
            } else {
                FlowError::load(ErrorCode::LOAD_GENERIC, path, "file is not accessible").with_source(e)
            }
        })?;

        if !metadata.is_file() {
            return Err(FlowError::load(
                ErrorCode::LOAD_NOT_A_FILE,
                path,
                "not a regular file",
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl UnitLoader for FlowLoader {
    async fn load(&self, path: &Path) -> Result<Box<dyn FlowUnit>> {
        Self::check_file(path).await?;

        let runtime = FlowRuntime::detect(path).ok_or_else(|| {
            let ext = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_else(|| "(none)".to_string());
            FlowError::load(
                ErrorCode::LOAD_UNSUPPORTED_TYPE,
                path,
                format!("unsupported flow type '{ext}' (expected .py, .js, .mjs or .cjs)"),
            )
        })?;

        debug!("Detected {} runtime for {}", runtime, path.display());

        let command = runtime.host_command(&self.config, path, &self.working_dir);
        let unit = ScriptFlow::start(
            self.subprocess.runner(),
            command,
            path,
            runtime,
            Arc::clone(&self.relay),
        )
        .await?;

        info!(
            "Loaded flow {} ({} callable attributes)",
            path.display(),
            unit.attributes().len()
        );
        Ok(Box::new(unit))
    }
}
