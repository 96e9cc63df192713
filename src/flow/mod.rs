//! Loading flow modules and invoking their entry point.
//!
//! A flow is a script in the flows directory that exposes an entry point
//! (`executor` by default) taking `(argument, emit)`. The [`Invoker`] resolves
//! the script, loads it through a [`UnitLoader`], checks the entry point
//! exists and awaits a single call to it.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

pub mod argument;
pub mod emit;
pub mod invoker;
pub mod loader;
pub mod protocol;
pub mod render;
pub mod script;

pub use argument::FlowArgument;
pub use emit::{ChannelEmitter, Emitter, NullEmitter, StdoutEmitter};
pub use invoker::{InvocationRequest, InvocationState, Invoker};
pub use loader::{FlowLoader, FlowRuntime};
pub use render::render_value;
pub use script::{OutputRelay, ScriptFlow, StderrRelay};

/// A loaded flow module
#[async_trait]
pub trait FlowUnit: Send {
    /// Absolute path the unit was loaded from
    fn path(&self) -> &Path;

    /// Names of the callable attributes the module exposes
    fn attributes(&self) -> &[String];

    fn has_attribute(&self, name: &str) -> bool {
        self.attributes().iter().any(|a| a == name)
    }

    /// Release the unit without calling it.
    ///
    /// Output the unit produced while loading is flushed before this returns.
    async fn close(self: Box<Self>) {}

    /// Call `entry_point(argument, emit)` and wait for it to settle.
    ///
    /// A unit is called at most once. `Ok(None)` means the entry point
    /// returned nothing.
    async fn call(
        self: Box<Self>,
        entry_point: &str,
        argument: &FlowArgument,
        emit: &dyn Emitter,
    ) -> Result<Option<Value>>;
}

/// Turns a flow file into a [`FlowUnit`]
#[async_trait]
pub trait UnitLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<Box<dyn FlowUnit>>;
}
