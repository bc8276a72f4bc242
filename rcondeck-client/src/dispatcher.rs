//! Event dispatcher
//!
//! The reducer at the center of the dashboard. It consumes one `DeckEvent`
//! at a time, mutates `SessionState`, and tells the caller whether an
//! executor should be launched. It never performs IO itself, so it can be
//! driven directly from tests.
//!
//! Results are not correlated with the request that produced them: each one
//! is logged under the server name it carries, in arrival order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::executor::{CommandRequest, CommandResult, ContainerAction, ExecError, NO_RESPONSE};
use crate::registry::{ServerDescriptor, ServerRegistry};
use crate::session::SessionState;

/// Status shown while an RCON command is in flight
pub const STATUS_SENDING: &str = "Sending…";
pub const STATUS_OK: &str = "OK";
pub const STATUS_COMMAND_FAILED: &str = "Command failed";

/// Log line for actions attempted with nothing selected
pub const NO_ACTIVE_SERVER: &str = "ERROR: no active server selected";

/// Substitute for empty successful container output
pub const CONTAINER_SUCCESS: &str = "success";

/// Input vocabulary of the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEvent {
    Resize { width: u16, height: u16 },
    SelectNext,
    SubmitCommand(String),
    Container(ContainerAction),
    Quit,
    Completed(CommandResult),
    Tick(Instant),
}

/// What the caller should do after an event
#[derive(Debug, Clone)]
pub enum Transition {
    Continue,
    Launch(CommandRequest),
    Quit,
}

pub struct Dispatcher {
    registry: Arc<ServerRegistry>,
    state: SessionState,
    status_ttl: Option<Duration>,
    quitting: bool,
}

impl Dispatcher {
    /// Create the session, selecting the first registered server
    pub fn new(registry: Arc<ServerRegistry>, status_ttl: Option<Duration>) -> Self {
        let mut state = SessionState::new();
        state.log.push("Ready.");

        if let Some(first) = registry.get(0) {
            state.active_server = Some(first.name.clone());
            state.selection_index = 0;
            state.log.push(format!("Active server: {}", first.name));
        }

        Self {
            registry,
            state,
            status_ttl,
            quitting: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn registry(&self) -> &ServerRegistry {
        &self.registry
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Descriptor of the active server, if any
    pub fn active_server(&self) -> Option<&Arc<ServerDescriptor>> {
        self.state
            .active_server
            .as_deref()
            .and_then(|name| self.registry.lookup(name))
    }

    /// Apply an event using the current time for status stamps
    pub fn dispatch(&mut self, event: DeckEvent) -> Transition {
        self.dispatch_at(event, Instant::now())
    }

    /// Apply an event at a given instant
    pub fn dispatch_at(&mut self, event: DeckEvent, now: Instant) -> Transition {
        if self.quitting {
            debug!(?event, "ignoring event after quit");
            return Transition::Quit;
        }

        match event {
            DeckEvent::Resize { width, height } => {
                self.state.viewport.width = width;
                self.state.viewport.height = height;
                Transition::Continue
            }
            DeckEvent::SelectNext => {
                self.select_next();
                Transition::Continue
            }
            DeckEvent::SubmitCommand(text) => self.submit_command(text, now),
            DeckEvent::Container(action) => self.container_action(action, now),
            DeckEvent::Quit => {
                info!("quit requested");
                self.quitting = true;
                Transition::Quit
            }
            DeckEvent::Completed(result) => {
                self.apply_result(result, now);
                Transition::Continue
            }
            DeckEvent::Tick(at) => {
                if let Some(ttl) = self.status_ttl {
                    self.state.expire_status(at, ttl);
                }
                Transition::Continue
            }
        }
    }

    fn select_next(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        let count = self.registry.len();

        let index = (self.state.selection_index + 1) % count;
        if let Some(server) = self.registry.get(index) {
            self.state.selection_index = index;
            self.state.active_server = Some(server.name.clone());
            self.state.log.push(format!("Active server: {}", server.name));
            debug!(server = %server.name, index, "switched active server");
        }
    }

    fn submit_command(&mut self, text: String, now: Instant) -> Transition {
        if text.is_empty() {
            return Transition::Continue;
        }

        let Some(server) = self.active_server().cloned() else {
            self.state.log.push(NO_ACTIVE_SERVER);
            return Transition::Continue;
        };

        self.state.log.push(format!("[{}] > {}", server.name, text));
        self.state.set_progress_status(STATUS_SENDING, now);
        debug!(server = %server.name, command = %text, "launching rcon command");
        Transition::Launch(CommandRequest::rcon(server, text))
    }

    fn container_action(&mut self, action: ContainerAction, now: Instant) -> Transition {
        let Some(server) = self.active_server().cloned() else {
            self.state.log.push(NO_ACTIVE_SERVER);
            return Transition::Continue;
        };

        let Some(container) = server.container.as_deref() else {
            self.state
                .log
                .push(format!("[{}] WARN: {}", server.name, ExecError::NoContainer));
            return Transition::Continue;
        };

        self.state.log.push(format!(
            "[{}] {}: {}",
            server.name,
            action.progress_verb(),
            container
        ));
        self.state.set_progress_status(action.progress_status(), now);
        debug!(server = %server.name, %action, container, "launching container action");
        Transition::Launch(CommandRequest::container(server, action))
    }

    fn apply_result(&mut self, result: CommandResult, now: Instant) {
        debug!(
            server = result.server_name(),
            kind = ?result.kind(),
            label = result.label(),
            "command completed"
        );
        match result {
            CommandResult::Rcon {
                server, outcome, ..
            } => match outcome {
                Ok(output) => {
                    let prefix = format!("[{}] < ", server);
                    self.push_output(&prefix, &output, NO_RESPONSE);
                    self.state.set_status(STATUS_OK, now);
                }
                Err(e) => {
                    self.state.log.push(format!("[{}] ERROR: {}", server, e));
                    self.state.set_status(STATUS_COMMAND_FAILED, now);
                }
            },
            CommandResult::Container {
                server,
                action,
                outcome,
            } => match outcome {
                Ok(output) => {
                    let prefix = format!("[{}] {}: ", server, action);
                    self.push_output(&prefix, &output, CONTAINER_SUCCESS);
                    self.state.set_status(format!("{} OK", action), now);
                }
                Err(e) => {
                    self.state
                        .log
                        .push(format!("[{}] {} ERROR: {}", server, action, e));
                    self.state.set_status(format!("{} failed", action), now);
                }
            },
        }
    }

    /// Log output under `prefix`, one log line per output line
    fn push_output(&mut self, prefix: &str, output: &str, empty: &str) {
        let output = output.trim_end();
        if output.is_empty() {
            self.state.log.push(format!("{}{}", prefix, empty));
            return;
        }

        let indent = " ".repeat(prefix.chars().count());
        for (i, line) in output.lines().enumerate() {
            let line = line.trim_end();
            if i == 0 {
                self.state.log.push(format!("{}{}", prefix, line));
            } else {
                self.state.log.push(format!("{}{}", indent, line));
            }
        }
    }
}
