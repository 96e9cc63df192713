use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

pub type Result<T> = std::result::Result<T, FlowError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The unified error type for flowrun
///
/// Every variant is terminal for the process. The variants differ only in
/// what gets reported, never in how they are handled.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Failed to load flow '{}': {message}", .path.display())]
    Load {
        code: u16,
        path: PathBuf,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Function '{entry_point}' not found in flow '{}'", .path.display())]
    MissingEntryPoint {
        code: u16,
        entry_point: String,
        path: PathBuf,
    },

    #[error("[E{code:04}] Execution error: {message}")]
    Execution {
        code: u16,
        message: String,
        exit_code: Option<i32>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Protocol error: {message}")]
    Protocol {
        code: u16,
        message: String,
        line: Option<String>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Internal error: {message}")]
    Internal { code: u16, message: String },
}

impl FlowError {
    pub fn config_with_code(code: u16, message: impl Into<String>, path: &Path) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path: Some(path.to_path_buf()),
            source: None,
        }
    }

    /// Create a load error for the flow at `path`
    pub fn load(code: u16, path: &Path, message: impl Into<String>) -> Self {
        Self::Load {
            code,
            path: path.to_path_buf(),
            message: message.into(),
            source: None,
        }
    }

    pub fn missing_entry_point(entry_point: impl Into<String>, path: &Path) -> Self {
        Self::MissingEntryPoint {
            code: ErrorCode::ENTRY_POINT_MISSING,
            entry_point: entry_point.into(),
            path: path.to_path_buf(),
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::execution_with_code(ErrorCode::EXEC_GENERIC, message)
    }

    pub fn execution_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Execution {
            code,
            message: message.into(),
            exit_code: None,
            source: None,
        }
    }

    /// Create a protocol error for a host message that could not be understood
    pub fn protocol(code: u16, message: impl Into<String>, line: Option<&str>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
            line: line.map(str::to_string),
            source: None,
        }
    }

    pub fn internal(code: u16, message: impl Into<String>) -> Self {
        Self::Internal {
            code,
            message: message.into(),
        }
    }

    /// Attach a source error to variants that carry one
    pub fn with_source(mut self, err: impl Into<BoxedSource>) -> Self {
        match &mut self {
            Self::Config { source, .. }
            | Self::Load { source, .. }
            | Self::Execution { source, .. }
            | Self::Protocol { source, .. } => *source = Some(err.into()),
            Self::MissingEntryPoint { .. } | Self::Internal { .. } => {}
        }
        self
    }

    /// Record the host process exit code on an execution error
    pub fn with_exit_code(mut self, code: Option<i32>) -> Self {
        if let Self::Execution { exit_code, .. } = &mut self {
            *exit_code = code;
        }
        self
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Load { code, .. }
            | Self::MissingEntryPoint { code, .. }
            | Self::Execution { code, .. }
            | Self::Protocol { code, .. }
            | Self::Internal { code, .. } => *code,
        }
    }

    /// Process exit code for this error. Every failure is reported the same way.
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// Developer-facing message including the source chain
    pub fn developer_message(&self) -> String {
        let mut message = format!("{self} ({})", describe_error_code(self.code()));
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(&format!("\n  caused by: {err}"));
            source = err.source();
        }
        message
    }
}
