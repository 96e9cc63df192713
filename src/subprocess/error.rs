use crate::error::{ErrorCode, FlowError};

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Failed to spawn {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to capture {0} of child process")]
    PipeUnavailable(&'static str),

    #[error("Mock expectation not met: {0}")]
    MockExpectationNotMet(String),
}

/// Convert ProcessError to FlowError
///
/// Load-stage failures are mapped explicitly by the loader, which knows the
/// flow path. Anything reaching this conversion happened mid-invocation.
impl From<ProcessError> for FlowError {
    fn from(err: ProcessError) -> Self {
        let code = match &err {
            ProcessError::Io(_) => ErrorCode::EXEC_READ_FAILED,
            _ => ErrorCode::EXEC_GENERIC,
        };
        FlowError::execution_with_code(code, err.to_string()).with_source(err)
    }
}
