//! Flow units backed by an interpreter host process.

use super::argument::FlowArgument;
use super::emit::Emitter;
use super::loader::FlowRuntime;
use super::protocol::{ExecuteRequest, FailureStage, HostMessage};
use super::FlowUnit;
use crate::error::{ErrorCode, FlowError, Result};
use crate::subprocess::runner::{
    ProcessStatusFut, ProcessStdin, ProcessStreamFut, ProcessStreamItem,
};
use crate::subprocess::{
    ExitStatus, ProcessCommand, ProcessError, ProcessRunner, ProcessSession,
};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};

/// How long a finished host gets to flush the rest of its stderr
const STDERR_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Destination for the lines a flow writes to stderr
pub trait OutputRelay: Send + Sync {
    fn relay(&self, line: &str);
}

/// Copies flow output to our own stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrRelay;

impl OutputRelay for StderrRelay {
    fn relay(&self, line: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }
}

/// A flow module imported by a running host process
pub struct ScriptFlow {
    path: PathBuf,
    runtime: FlowRuntime,
    attributes: Vec<String>,
    host: HostChannel,
}

impl ScriptFlow {
    /// Start the host for `path` and wait until it reports the module loaded.
    ///
    /// Everything the host writes to stderr goes to `relay`.
    pub async fn start(
        runner: Arc<dyn ProcessRunner>,
        command: ProcessCommand,
        path: &Path,
        runtime: FlowRuntime,
        relay: Arc<dyn OutputRelay>,
    ) -> Result<Self> {
        let session = runner.spawn(command).await.map_err(|e| match e {
            ProcessError::CommandNotFound(program) => FlowError::load(
                ErrorCode::LOAD_INTERPRETER_UNAVAILABLE,
                path,
                format!("{runtime} interpreter '{program}' is not available"),
            ),
            other => FlowError::load(
                ErrorCode::LOAD_GENERIC,
                path,
                format!("could not start the {runtime} host"),
            )
            .with_source(other),
        })?;

        let mut host = HostChannel::new(session, relay);

        match host.next_message().await? {
            Some(HostMessage::Loaded { attributes }) => {
                trace!("Flow attributes: {:?}", attributes);
                Ok(Self {
                    path: path.to_path_buf(),
                    runtime,
                    attributes,
                    host,
                })
            }
            Some(HostMessage::Error {
                stage: FailureStage::Load,
                message,
            }) => {
                host.close().await;
                Err(FlowError::load(ErrorCode::LOAD_IMPORT_FAILED, path, message))
            }
            Some(other) => {
                host.close().await;
                Err(unexpected_message(&other, "loading"))
            }
            None => {
                let status = host.wait().await?;
                Err(FlowError::load(
                    ErrorCode::LOAD_HOST_EXITED,
                    path,
                    format!("{runtime} host exited with {status} before the module loaded"),
                ))
            }
        }
    }

    pub fn runtime(&self) -> FlowRuntime {
        self.runtime
    }
}

#[async_trait]
impl FlowUnit for ScriptFlow {
    fn path(&self) -> &Path {
        &self.path
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    async fn close(self: Box<Self>) {
        let ScriptFlow { mut host, .. } = *self;
        host.close().await;
    }

    async fn call(
        self: Box<Self>,
        entry_point: &str,
        argument: &FlowArgument,
        emit: &dyn Emitter,
    ) -> Result<Option<Value>> {
        let ScriptFlow {
            mut host, runtime, ..
        } = *self;

        let request = ExecuteRequest {
            entry: entry_point.to_string(),
            argument: argument.wire_value(),
            present: argument.is_present(),
        };
        host.send(&request).await?;

        loop {
            match host.next_message().await? {
                Some(HostMessage::Emit { data }) => emit.emit(data),
                Some(HostMessage::Result { value }) => {
                    host.close().await;
                    if value.is_null() {
                        debug!("Flow returned nothing");
                        return Ok(None);
                    }
                    debug!("Flow returned a value");
                    return Ok(Some(value));
                }
                Some(HostMessage::Error {
                    stage: FailureStage::Execution,
                    message,
                }) => {
                    host.close().await;
                    return Err(FlowError::execution_with_code(
                        ErrorCode::EXEC_RAISED,
                        message,
                    ));
                }
                Some(other) => {
                    host.close().await;
                    return Err(unexpected_message(&other, "invocation"));
                }
                None => {
                    let status = host.wait().await?;
                    return Err(FlowError::execution_with_code(
                        ErrorCode::EXEC_HOST_EXITED,
                        format!("{runtime} host exited with {status} before reporting a result"),
                    )
                    .with_exit_code(status.code()));
                }
            }
        }
    }
}

fn unexpected_message(message: &HostMessage, phase: &str) -> FlowError {
    FlowError::protocol(
        ErrorCode::PROTOCOL_UNEXPECTED,
        format!("unexpected '{}' message during {phase}", message.kind()),
        None,
    )
}

/// Stdio of a host process, read from a single task.
///
/// Host stderr is relayed as it arrives and is polled ahead of stdout.
struct HostChannel {
    stdin: Option<ProcessStdin>,
    stdout: ProcessStreamFut,
    stderr: Option<ProcessStreamFut>,
    status: ProcessStatusFut,
    relay: Arc<dyn OutputRelay>,
}

impl HostChannel {
    fn new(session: ProcessSession, relay: Arc<dyn OutputRelay>) -> Self {
        Self {
            stdin: session.stdin,
            stdout: session.stdout,
            stderr: Some(session.stderr),
            status: session.status,
            relay,
        }
    }

    /// Next protocol message, or `None` once the host closed its stdout
    async fn next_message(&mut self) -> Result<Option<HostMessage>> {
        loop {
            tokio::select! {
                biased;

                line = next_line(&mut self.stderr), if self.stderr.is_some() => {
                    match line {
                        Some(Ok(line)) => self.relay.relay(&line),
                        Some(Err(_)) | None => self.stderr = None,
                    }
                }
                line = self.stdout.next() => {
                    match line {
                        Some(Ok(line)) if line.trim().is_empty() => continue,
                        Some(Ok(line)) => {
                            trace!("Host message: {}", line);
                            return HostMessage::parse(&line).map(Some);
                        }
                        Some(Err(e)) => return Err(e.into()),
                        None => {
                            self.drain_stderr().await;
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }

    /// Write the request line and close stdin
    async fn send(&mut self, request: &ExecuteRequest) -> Result<()> {
        let line = request.to_line()?;
        let Some(mut stdin) = self.stdin.take() else {
            return Err(FlowError::internal(
                ErrorCode::INTERNAL_GENERIC,
                "flow host stdin was already closed",
            ));
        };

        // A host that died shows up as EOF on stdout, which reports better
        let delivered = async {
            stdin.write_all(line.as_bytes()).await?;
            stdin.flush().await?;
            stdin.shutdown().await
        }
        .await;

        if let Err(e) = delivered {
            warn!("Could not deliver invocation request to flow host: {}", e);
        }
        Ok(())
    }

    /// Close stdin and relay the host's remaining stderr.
    ///
    /// The host exits once stdin is closed after its final message, which
    /// ends stderr.
    async fn close(&mut self) {
        drop(self.stdin.take());
        self.drain_stderr().await;
    }

    /// Relay stderr until EOF or until the grace period runs out
    async fn drain_stderr(&mut self) {
        let Some(mut stderr) = self.stderr.take() else {
            return;
        };
        let relay = Arc::clone(&self.relay);

        let drained = tokio::time::timeout(STDERR_DRAIN_GRACE, async {
            while let Some(Ok(line)) = stderr.next().await {
                relay.relay(&line);
            }
        })
        .await;

        if drained.is_err() {
            debug!("Flow host kept stderr open; stopped relaying");
        }
    }

    async fn wait(self) -> Result<ExitStatus> {
        drop(self.stdin);
        Ok(self.status.await?)
    }
}

async fn next_line(stream: &mut Option<ProcessStreamFut>) -> Option<ProcessStreamItem> {
    match stream {
        Some(stream) => stream.next().await,
        None => None,
    }
}

/// Relay that keeps lines in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRelay {
    lines: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingRelay {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl OutputRelay for RecordingRelay {
    fn relay(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
