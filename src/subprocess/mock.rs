use async_trait::async_trait;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessRunner, ProcessSession};

/// Scripted stand-in for a real child process.
///
/// Output is fixed up front, so a scripted session cannot react to what is
/// written to its stdin. Everything written to stdin is recorded and can be
/// inspected with [`MockProcessRunner::stdin_written`].
#[derive(Clone)]
pub struct MockProcessRunner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    call_history: Arc<Mutex<Vec<ProcessCommand>>>,
    stdin_log: Arc<Mutex<Vec<u8>>>,
}

#[derive(Clone)]
struct MockExpectation {
    program: String,
    stdout: Vec<String>,
    stderr: Vec<String>,
    status: ExitStatus,
    not_found: bool,
}

pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: MockExpectation,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(Vec::new())),
            call_history: Arc::new(Mutex::new(Vec::new())),
            stdin_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn expect_command(&mut self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: MockExpectation {
                program: program.to_string(),
                stdout: Vec::new(),
                stderr: Vec::new(),
                status: ExitStatus::Success,
                not_found: false,
            },
        }
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        let history = self.call_history.lock().unwrap();
        let count = history.iter().filter(|cmd| cmd.program == program).count();
        count == times
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.call_history.lock().unwrap().clone()
    }

    /// Everything written to the stdin of spawned sessions, as UTF-8
    pub fn stdin_written(&self) -> String {
        String::from_utf8_lossy(&self.stdin_log.lock().unwrap()).to_string()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn spawn(&self, command: ProcessCommand) -> Result<ProcessSession, ProcessError> {
        self.call_history.lock().unwrap().push(command.clone());

        let expectation = self
            .expectations
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.program == command.program)
            .cloned()
            .ok_or_else(|| {
                ProcessError::MockExpectationNotMet(format!(
                    "No expectation found for command: {} {:?}",
                    command.program, command.args
                ))
            })?;

        if expectation.not_found {
            return Err(ProcessError::CommandNotFound(command.program));
        }

        let stdout = expectation.stdout.into_iter().map(Ok::<_, ProcessError>);
        let stderr = expectation.stderr.into_iter().map(Ok::<_, ProcessError>);
        let status = expectation.status;

        Ok(ProcessSession {
            stdin: Some(Box::new(RecordingStdin {
                log: Arc::clone(&self.stdin_log),
            })),
            stdout: Box::pin(futures::stream::iter(stdout)),
            stderr: Box::pin(futures::stream::iter(stderr)),
            status: Box::pin(async move { Ok(status) }),
        })
    }
}

impl MockCommandConfig {
    pub fn returns_stdout_line(mut self, line: &str) -> Self {
        self.expectation.stdout.push(line.to_string());
        self
    }

    pub fn returns_stderr_line(mut self, line: &str) -> Self {
        self.expectation.stderr.push(line.to_string());
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        self.expectation.status = if code == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Error(code)
        };
        self
    }

    /// Simulate the program not being installed
    pub fn not_found(mut self) -> Self {
        self.expectation.not_found = true;
        self
    }

    pub fn finish(self) {
        self.runner
            .expectations
            .lock()
            .unwrap()
            .push(self.expectation);
    }
}

impl Default for MockProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

struct RecordingStdin {
    log: Arc<Mutex<Vec<u8>>>,
}

impl AsyncWrite for RecordingStdin {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.log.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
