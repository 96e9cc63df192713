use async_trait::async_trait;
use futures::stream::Stream;
use std::collections::HashMap;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::io::AsyncWrite;

use super::error::ProcessError;

#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

impl ProcessCommand {
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitStatus::Success => write!(f, "exit code 0"),
            ExitStatus::Error(code) => write!(f, "exit code {code}"),
            ExitStatus::Signal(sig) => write!(f, "signal {sig}"),
        }
    }
}

pub type ProcessStreamItem = Result<String, ProcessError>;
pub type ProcessStreamFut = Pin<Box<dyn Stream<Item = ProcessStreamItem> + Send>>;
pub type ProcessStdin = Box<dyn AsyncWrite + Send + Unpin>;
pub type ProcessStatusFut =
    Pin<Box<dyn futures::Future<Output = Result<ExitStatus, ProcessError>> + Send>>;

/// A running child process with every stdio stream piped.
///
/// `stdin` is `None` once the caller has taken it. Dropping the session kills
/// the child.
pub struct ProcessSession {
    pub stdin: Option<ProcessStdin>,
    pub stdout: ProcessStreamFut,
    pub stderr: ProcessStreamFut,
    pub status: ProcessStatusFut,
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn spawn(&self, command: ProcessCommand) -> Result<ProcessSession, ProcessError>;
}

pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Normalize a line by removing trailing newlines
    fn normalize_line(mut line: String) -> String {
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        line
    }

    /// Create a line stream from a buffered reader. The stream ends after the
    /// first read error.
    fn create_line_stream<R>(reader: tokio::io::BufReader<R>) -> ProcessStreamFut
    where
        R: tokio::io::AsyncRead + Send + Unpin + 'static,
    {
        use tokio::io::AsyncBufReadExt;

        Box::pin(futures::stream::unfold(
            Some(reader),
            |state| async move {
                let mut reader = state?;
                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) => None, // EOF
                    Ok(_) => Some((Ok(Self::normalize_line(line)), Some(reader))),
                    Err(e) => Some((Err(ProcessError::Io(e)), None)),
                }
            },
        )) as ProcessStreamFut
    }

    /// Convert process exit status to our ExitStatus enum
    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            ExitStatus::Signal(signal)
        } else {
            ExitStatus::Error(1)
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Spawning subprocess: {}", command.program);
        tracing::trace!("Arguments: {} bytes", command.args.iter().map(String::len).sum::<usize>());

        if !command.env.is_empty() {
            tracing::trace!("Extra environment variables: {:?}", command.env);
        }

        if let Some(ref dir) = command.working_dir {
            tracing::trace!("Working directory: {:?}", dir);
        }
    }

    /// Configure the command with environment, working directory and pipes
    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);

        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(std::process::Stdio::piped());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn spawn(&self, command: ProcessCommand) -> Result<ProcessSession, ProcessError> {
        Self::log_command_start(&command);

        let mut child = Self::configure_command(&command).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProcessError::CommandNotFound(command.program.clone())
            } else {
                ProcessError::SpawnFailed {
                    command: command.display(),
                    source: e,
                }
            }
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or(ProcessError::PipeUnavailable("stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or(ProcessError::PipeUnavailable("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(ProcessError::PipeUnavailable("stderr"))?;

        let program = command.program.clone();
        let status = Box::pin(async move {
            let status = child.wait().await.map_err(ProcessError::Io)?;
            let status = Self::parse_exit_status(status);
            tracing::debug!("Subprocess {} finished with {}", program, status);
            Ok(status)
        });

        Ok(ProcessSession {
            stdin: Some(Box::new(stdin)),
            stdout: Self::create_line_stream(tokio::io::BufReader::new(stdout)),
            stderr: Self::create_line_stream(tokio::io::BufReader::new(stderr)),
            status,
        })
    }
}
