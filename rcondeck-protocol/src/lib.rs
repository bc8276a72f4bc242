//! rcondeck-protocol: Source RCON wire protocol
//!
//! This crate defines the RCON packet model, a `tokio-util` codec for framing
//! packets over TCP, and an async client that authenticates and executes
//! commands against a remote game server.

pub mod client;
pub mod codec;
pub mod error;
pub mod packet;

// Re-export main types at crate root
pub use client::{ClientSettings, RconClient};
pub use codec::RconCodec;
pub use error::RconError;
pub use packet::{Packet, PacketType};

/// Longest command body a server will accept
pub const MAX_COMMAND_LEN: usize = 1000;
