//! Sinks for values a flow emits while it runs.

use super::render::render_value;
use serde_json::Value;
use std::io::Write;
use tokio::sync::mpsc;

/// One-way sink for progress data emitted by a flow.
///
/// Emitting never fails from the flow's point of view and nothing is
/// acknowledged back to it.
pub trait Emitter: Send + Sync {
    fn emit(&self, data: Value);
}

/// Prints each emitted value as an `emitter <value>` line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutEmitter;

impl Emitter for StdoutEmitter {
    fn emit(&self, data: Value) {
        let mut stdout = std::io::stdout().lock();
        let written = writeln!(stdout, "emitter {}", render_value(&data));
        if let Err(e) = written.and_then(|_| stdout.flush()) {
            tracing::debug!("Dropped emitted value: {}", e);
        }
    }
}

/// Forwards emitted values into an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    sender: mpsc::UnboundedSender<Value>,
}

impl ChannelEmitter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Value>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Emitter for ChannelEmitter {
    fn emit(&self, data: Value) {
        // Receiver gone means nobody is listening anymore
        let _ = self.sender.send(data);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmitter;

impl Emitter for NullEmitter {
    fn emit(&self, _data: Value) {}
}
