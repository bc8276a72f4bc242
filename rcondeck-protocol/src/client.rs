//! Async RCON client
//!
//! A client owns one TCP connection. It authenticates during `connect` and
//! then runs commands one at a time; each command waits for the response
//! packet carrying its own id.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, trace};

use crate::codec::RconCodec;
use crate::error::RconError;
use crate::packet::{Packet, PacketType, AUTH_FAILED_ID};
use crate::MAX_COMMAND_LEN;

/// Default dial and io timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeouts applied by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    /// Bound on establishing the TCP connection
    pub dial_timeout: Duration,
    /// Bound on each packet read or write
    pub io_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            dial_timeout: DEFAULT_TIMEOUT,
            io_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Authenticated RCON connection
#[derive(Debug)]
pub struct RconClient {
    framed: Framed<TcpStream, RconCodec>,
    next_id: i32,
    settings: ClientSettings,
}

impl RconClient {
    /// Connect and authenticate with default timeouts
    pub async fn connect(address: &str, password: &str) -> Result<Self, RconError> {
        Self::connect_with(address, password, ClientSettings::default()).await
    }

    /// Connect and authenticate with explicit timeouts
    pub async fn connect_with(
        address: &str,
        password: &str,
        settings: ClientSettings,
    ) -> Result<Self, RconError> {
        debug!(address, "dialing rcon server");
        let stream = timeout(settings.dial_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| RconError::timeout("connect", settings.dial_timeout))??;
        stream.set_nodelay(true)?;

        let mut client = Self {
            framed: Framed::new(stream, RconCodec::new()),
            next_id: 0,
            settings,
        };
        client.authenticate(password).await?;
        debug!(address, "rcon authentication succeeded");
        Ok(client)
    }

    /// Execute a command and return the response body
    pub async fn execute(&mut self, command: &str) -> Result<String, RconError> {
        if command.is_empty() {
            return Err(RconError::EmptyCommand);
        }
        if command.len() > MAX_COMMAND_LEN {
            return Err(RconError::CommandTooLong {
                len: command.len(),
                max: MAX_COMMAND_LEN,
            });
        }

        let id = self.allocate_id();
        self.send(Packet::exec(id, command)).await?;

        let response = self.recv().await?;
        if response.kind != PacketType::RESPONSE_VALUE {
            return Err(RconError::UnexpectedType {
                expected: PacketType::RESPONSE_VALUE.0,
                actual: response.kind.0,
            });
        }
        if response.id != id {
            return Err(RconError::UnexpectedId {
                expected: id,
                actual: response.id,
            });
        }

        Ok(response.body_text())
    }

    /// Shut down the write half and drop the connection
    pub async fn close(mut self) -> Result<(), RconError> {
        self.framed.get_mut().shutdown().await?;
        Ok(())
    }

    async fn authenticate(&mut self, password: &str) -> Result<(), RconError> {
        let id = self.allocate_id();
        self.send(Packet::auth(id, password)).await?;

        let mut response = self.recv().await?;
        // Some servers send an empty RESPONSE_VALUE ahead of the auth result
        if response.kind == PacketType::RESPONSE_VALUE && response.body.is_empty() {
            response = self.recv().await?;
        }

        if response.kind != PacketType::AUTH_RESPONSE {
            return Err(RconError::UnexpectedType {
                expected: PacketType::AUTH_RESPONSE.0,
                actual: response.kind.0,
            });
        }
        if response.id == AUTH_FAILED_ID {
            return Err(RconError::AuthFailed);
        }
        if response.id != id {
            return Err(RconError::UnexpectedId {
                expected: id,
                actual: response.id,
            });
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> i32 {
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id <= 0 {
            self.next_id = 1;
        }
        self.next_id
    }

    async fn send(&mut self, packet: Packet) -> Result<(), RconError> {
        trace!(id = packet.id, kind = %packet.kind, len = packet.body.len(), "send packet");
        timeout(self.settings.io_timeout, self.framed.send(packet))
            .await
            .map_err(|_| RconError::timeout("write", self.settings.io_timeout))?
    }

    async fn recv(&mut self) -> Result<Packet, RconError> {
        let packet = timeout(self.settings.io_timeout, self.framed.next())
            .await
            .map_err(|_| RconError::timeout("read", self.settings.io_timeout))?
            .ok_or(RconError::ConnectionClosed)??;
        trace!(id = packet.id, kind = %packet.kind, len = packet.body.len(), "recv packet");
        Ok(packet)
    }
}
