//! Command executors
//!
//! Each outbound request runs as its own tokio task and yields exactly one
//! `CommandResult`. Executors never see session state; the result is handed
//! back to the event loop through a delivery callback.

mod container;
mod control;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use rcondeck_utils::DeckError;

use crate::registry::ServerDescriptor;

pub use container::{run_container_action, DockerCli, ProcessExecutor, DEFAULT_PROGRAM};
pub use control::{
    run_control_command, ControlClient, ControlConnection, RconConnector, NO_RESPONSE,
};

/// Lifecycle verbs understood by the container executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
    Status,
}

impl ContainerAction {
    pub const ALL: [ContainerAction; 4] = [Self::Start, Self::Stop, Self::Restart, Self::Status];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Status => "status",
        }
    }

    /// Status text shown while the action runs
    pub fn progress_status(&self) -> &'static str {
        match self {
            Self::Start => "Starting container...",
            Self::Stop => "Stopping container...",
            Self::Restart => "Restarting container...",
            Self::Status => "Checking status...",
        }
    }

    /// Log verb used when the action is launched
    pub fn progress_verb(&self) -> &'static str {
        match self {
            Self::Start => "Starting container",
            Self::Stop => "Stopping container",
            Self::Restart => "Restarting container",
            Self::Status => "Checking status",
        }
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerAction {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DeckError::UnknownAction(s.to_string()))
    }
}

/// Which executor handles a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Rcon,
    Container,
}

/// One outbound action
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub kind: CommandKind,
    pub target: Arc<ServerDescriptor>,
    /// Command text for RCON, action name for containers
    pub payload: String,
}

impl CommandRequest {
    pub fn rcon(target: Arc<ServerDescriptor>, command: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Rcon,
            target,
            payload: command.into(),
        }
    }

    pub fn container(target: Arc<ServerDescriptor>, action: ContainerAction) -> Self {
        Self {
            kind: CommandKind::Container,
            target,
            payload: action.to_string(),
        }
    }
}

/// Request-local failure carried inside a result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error("failed to connect to {address}: {reason}")]
    Connect { address: String, reason: String },

    #[error("{0}")]
    Execute(String),

    #[error("no container configured")]
    NoContainer,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("failed to run {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{}", describe_process_failure(.code, .output))]
    ProcessFailed { code: Option<i32>, output: String },
}

fn describe_process_failure(code: &Option<i32>, output: &str) -> String {
    let status = match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    };
    let output = output.trim_end();
    if output.is_empty() {
        status
    } else {
        format!("{}: {}", status, output)
    }
}

/// Result of one request, matched exhaustively by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Rcon {
        server: String,
        command: String,
        outcome: Result<String, ExecError>,
    },
    Container {
        server: String,
        action: String,
        outcome: Result<String, ExecError>,
    },
}

impl CommandResult {
    pub fn server_name(&self) -> &str {
        match self {
            Self::Rcon { server, .. } | Self::Container { server, .. } => server,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Rcon { .. } => CommandKind::Rcon,
            Self::Container { .. } => CommandKind::Container,
        }
    }

    /// Command text or action name
    pub fn label(&self) -> &str {
        match self {
            Self::Rcon { command, .. } => command,
            Self::Container { action, .. } => action,
        }
    }
}

/// Task factory for both executor kinds
#[derive(Clone)]
pub struct Executors {
    control: Arc<dyn ControlClient>,
    process: Arc<dyn ProcessExecutor>,
}

impl Executors {
    pub fn new(control: Arc<dyn ControlClient>, process: Arc<dyn ProcessExecutor>) -> Self {
        Self { control, process }
    }

    /// Run a request to completion
    pub async fn execute(&self, request: CommandRequest) -> CommandResult {
        let CommandRequest {
            kind,
            target,
            payload,
        } = request;

        match kind {
            CommandKind::Rcon => CommandResult::Rcon {
                server: target.name.clone(),
                outcome: run_control_command(self.control.as_ref(), &target, &payload).await,
                command: payload,
            },
            CommandKind::Container => CommandResult::Container {
                server: target.name.clone(),
                outcome: run_container_action(self.process.as_ref(), &target, &payload).await,
                action: payload,
            },
        }
    }

    /// Run a request on its own task and hand the result to `deliver`
    pub fn spawn<F>(&self, request: CommandRequest, deliver: F) -> JoinHandle<()>
    where
        F: FnOnce(CommandResult) + Send + 'static,
    {
        let executors = self.clone();
        tokio::spawn(async move {
            let server = request.target.name.clone();
            let kind = request.kind;
            let result = executors.execute(request).await;
            debug!(server = %server, ?kind, ok = outcome_ok(&result), "executor finished");
            deliver(result);
        })
    }
}

fn outcome_ok(result: &CommandResult) -> bool {
    match result {
        CommandResult::Rcon { outcome, .. } | CommandResult::Container { outcome, .. } => {
            outcome.is_ok()
        }
    }
}
