//! Container lifecycle executor

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ContainerAction, ExecError};
use crate::registry::ServerDescriptor;

/// Default container management program
pub const DEFAULT_PROGRAM: &str = "docker";

/// Runs a lifecycle action against a container
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Returns combined stdout/stderr on success
    async fn run(&self, action: ContainerAction, container: &str) -> Result<String, ExecError>;
}

/// `ProcessExecutor` that shells out to the docker CLI (or a compatible one)
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument list for an action
    pub fn args(action: ContainerAction, container: &str) -> Vec<String> {
        match action {
            ContainerAction::Start => vec!["start".into(), container.into()],
            ContainerAction::Stop => vec!["stop".into(), container.into()],
            ContainerAction::Restart => vec!["restart".into(), container.into()],
            ContainerAction::Status => vec![
                "inspect".into(),
                "--format".into(),
                "{{.State.Status}}".into(),
                container.into(),
            ],
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

#[async_trait]
impl ProcessExecutor for DockerCli {
    async fn run(&self, action: ContainerAction, container: &str) -> Result<String, ExecError> {
        let args = Self::args(action, container);
        debug!(program = %self.program, ?args, "running container command");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ExecError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            Err(ExecError::ProcessFailed {
                code: output.status.code(),
                output: combined,
            })
        }
    }
}

/// Validate the request and hand it to the process executor
pub async fn run_container_action(
    executor: &dyn ProcessExecutor,
    target: &ServerDescriptor,
    action: &str,
) -> Result<String, ExecError> {
    let Some(container) = target.container.as_deref() else {
        return Err(ExecError::NoContainer);
    };
    let action: ContainerAction = action
        .parse()
        .map_err(|_| ExecError::UnknownAction(action.to_string()))?;

    debug!(server = %target.name, %action, container, "running container action");
    let outcome = executor.run(action, container).await;
    if let Err(e) = &outcome {
        warn!(server = %target.name, %action, container, "container action failed: {}", e);
    }
    outcome
}
