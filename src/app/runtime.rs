//! Wiring a flow invocation together from configuration

use crate::app::config::AppConfig;
use crate::config::RunnerConfig;
use crate::error::Result;
use crate::flow::{Emitter, FlowLoader, InvocationRequest, Invoker};
use crate::subprocess::SubprocessManager;
use serde_json::Value;
use std::sync::Arc;

/// Run one flow with the production process runner
pub async fn run_flow(
    app: &AppConfig,
    runner: &RunnerConfig,
    request: &InvocationRequest,
    emit: &dyn Emitter,
) -> Result<Option<Value>> {
    run_flow_with(SubprocessManager::production(), app, runner, request, emit).await
}

/// Run one flow using the given subprocess manager
pub async fn run_flow_with(
    subprocess: SubprocessManager,
    app: &AppConfig,
    runner: &RunnerConfig,
    request: &InvocationRequest,
    emit: &dyn Emitter,
) -> Result<Option<Value>> {
    let loader = FlowLoader::new(subprocess, runner.clone(), app.working_dir.clone());
    let mut invoker = Invoker::new(
        Arc::new(loader),
        runner.base_dir(&app.working_dir),
        runner.entry_point.clone(),
    );

    invoker.invoke(request, emit).await
}
