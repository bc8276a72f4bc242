//! Control-protocol executor

use async_trait::async_trait;
use tracing::{debug, warn};

use rcondeck_protocol::{ClientSettings, RconClient};
use rcondeck_utils::{DeckError, Result};

use super::ExecError;
use crate::registry::ServerDescriptor;

/// Text reported for an empty successful response
pub const NO_RESPONSE: &str = "(no response)";

/// Opens authenticated control connections
#[async_trait]
pub trait ControlClient: Send + Sync {
    async fn connect(&self, address: &str, secret: &str) -> Result<Box<dyn ControlConnection>>;
}

/// A single authenticated connection
#[async_trait]
pub trait ControlConnection: Send {
    async fn execute(&mut self, command: &str) -> Result<String>;

    /// Release the connection
    async fn close(&mut self);
}

/// `ControlClient` backed by the Source RCON client
#[derive(Debug, Clone, Copy, Default)]
pub struct RconConnector {
    settings: ClientSettings,
}

impl RconConnector {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ControlClient for RconConnector {
    async fn connect(&self, address: &str, secret: &str) -> Result<Box<dyn ControlConnection>> {
        let client = RconClient::connect_with(address, secret, self.settings).await?;
        Ok(Box::new(RconConnection {
            client: Some(client),
        }))
    }
}

struct RconConnection {
    client: Option<RconClient>,
}

#[async_trait]
impl ControlConnection for RconConnection {
    async fn execute(&mut self, command: &str) -> Result<String> {
        match self.client.as_mut() {
            Some(client) => Ok(client.execute(command).await?),
            None => Err(DeckError::ConnectionClosed),
        }
    }

    async fn close(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close().await {
                debug!("rcon close failed: {}", e);
            }
        }
    }
}

/// Connect, run one command, and release the connection
pub async fn run_control_command(
    client: &dyn ControlClient,
    target: &ServerDescriptor,
    command: &str,
) -> std::result::Result<String, ExecError> {
    debug!(server = %target.name, command, "sending rcon command");

    let mut connection = client
        .connect(&target.address, &target.secret)
        .await
        .map_err(|e| {
            warn!(server = %target.name, address = %target.address, "rcon connect failed: {}", e);
            ExecError::Connect {
                address: target.address.clone(),
                reason: e.to_string(),
            }
        })?;

    let outcome = connection.execute(command).await;
    connection.close().await;

    match outcome {
        Ok(output) if output.trim_end().is_empty() => Ok(NO_RESPONSE.to_string()),
        Ok(output) => Ok(output),
        Err(e) => {
            warn!(server = %target.name, command, "rcon command failed: {}", e);
            Err(ExecError::Execute(e.to_string()))
        }
    }
}
