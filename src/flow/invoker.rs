use super::argument::FlowArgument;
use super::emit::Emitter;
use super::UnitLoader;
use crate::error::{ErrorCode, FlowError, Result};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What to run: a flow path relative to the flows directory and its raw argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub relative_path: PathBuf,
    pub raw_argument: Option<String>,
}

impl InvocationRequest {
    pub fn new(relative_path: impl Into<PathBuf>, raw_argument: Option<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            raw_argument,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    NotStarted,
    Loading,
    Invoking,
    Completed,
    Failed,
}

impl InvocationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn can_transition_to(&self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (self, next),
            (NotStarted, Loading)
                | (Loading, Invoking)
                | (Loading, Failed)
                | (Invoking, Completed)
                | (Invoking, Failed)
        )
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not-started",
            Self::Loading => "loading",
            Self::Invoking => "invoking",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs one flow: resolve, load, check the entry point, call it.
///
/// An invoker is single use. A second `invoke` fails without loading anything.
pub struct Invoker {
    loader: Arc<dyn UnitLoader>,
    base_dir: PathBuf,
    entry_point: String,
    state: InvocationState,
}

impl Invoker {
    pub fn new(
        loader: Arc<dyn UnitLoader>,
        base_dir: impl Into<PathBuf>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            base_dir: base_dir.into(),
            entry_point: entry_point.into(),
            state: InvocationState::NotStarted,
        }
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Absolute location of a flow path
    pub fn resolve(&self, relative_path: &Path) -> PathBuf {
        self.base_dir.join(relative_path)
    }

    /// Load the requested flow and await its entry point.
    ///
    /// Returns the entry point's result, `None` when it returned nothing.
    pub async fn invoke(
        &mut self,
        request: &InvocationRequest,
        emit: &dyn Emitter,
    ) -> Result<Option<Value>> {
        if self.state != InvocationState::NotStarted {
            return Err(FlowError::internal(
                ErrorCode::INTERNAL_INVALID_TRANSITION,
                format!("invoker already used (state: {})", self.state),
            ));
        }

        let outcome = self.run(request, emit).await;
        if let Err(e) = &outcome {
            warn!("Flow invocation failed while {}: {}", self.state, e);
            self.state = InvocationState::Failed;
        }
        outcome
    }

    async fn run(
        &mut self,
        request: &InvocationRequest,
        emit: &dyn Emitter,
    ) -> Result<Option<Value>> {
        self.transition(InvocationState::Loading)?;

        let path = self.resolve(&request.relative_path);
        let argument = FlowArgument::parse(request.raw_argument.as_deref());
        info!("Loading flow {}", path.display());
        debug!("Flow argument: {:?}", argument);

        let unit = self.loader.load(&path).await?;

        if !unit.has_attribute(&self.entry_point) {
            unit.close().await;
            return Err(FlowError::missing_entry_point(&self.entry_point, &path));
        }

        self.transition(InvocationState::Invoking)?;
        info!("Invoking {} in {}", self.entry_point, path.display());

        let result = unit.call(&self.entry_point, &argument, emit).await?;

        self.transition(InvocationState::Completed)?;
        Ok(result)
    }

    fn transition(&mut self, next: InvocationState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(FlowError::internal(
                ErrorCode::INTERNAL_INVALID_TRANSITION,
                format!("cannot move from {} to {}", self.state, next),
            ));
        }
        debug!("Invocation state: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}
