use super::RunnerConfig;
use crate::error::{ErrorCode, FlowError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "flowrun.toml";

/// Builds a [`RunnerConfig`] from defaults, an optional `flowrun.toml` in the
/// working directory, and the environment, in that order of precedence.
pub struct ConfigLoader {
    working_dir: PathBuf,
    read_env: bool,
}

impl ConfigLoader {
    pub fn new(working_dir: &Path) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            read_env: true,
        }
    }

    /// Skip `FLOWRUN_*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.working_dir.join(CONFIG_FILE_NAME)
    }

    pub async fn load(&self) -> Result<RunnerConfig> {
        let mut config = self.load_file().await?.unwrap_or_default();

        if self.read_env {
            config.merge_env_vars();
        }

        debug!("Runner configuration: {:?}", config);
        Ok(config)
    }

    async fn load_file(&self) -> Result<Option<RunnerConfig>> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Ok(None);
        }

        debug!("Reading configuration from {}", config_path.display());

        let content = fs::read_to_string(&config_path).await.map_err(|e| {
            FlowError::config_with_code(
                ErrorCode::CONFIG_READ_FAILED,
                format!("could not read {}", config_path.display()),
                &config_path,
            )
            .with_source(e)
        })?;

        let config = toml::from_str::<RunnerConfig>(&content).map_err(|e| {
            FlowError::config_with_code(
                ErrorCode::CONFIG_INVALID_TOML,
                format!("invalid {}: {}", config_path.display(), e.message()),
                &config_path,
            )
            .with_source(e)
        })?;

        Ok(Some(config))
    }
}
