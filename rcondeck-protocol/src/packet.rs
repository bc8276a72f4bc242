//! RCON packet model

use std::fmt;

use bytes::Bytes;

/// Bytes taken by the id and type fields
pub const HEADER_SIZE: usize = 8;

/// Bytes taken by the two NUL terminators after the body
pub const TERMINATOR_SIZE: usize = 2;

/// Smallest legal value of the size field (empty body)
pub const MIN_PACKET_SIZE: usize = HEADER_SIZE + TERMINATOR_SIZE;

/// Largest size field accepted from the wire (64 KiB)
pub const MAX_PACKET_SIZE: usize = 64 * 1024;

/// Packet id the server answers with when authentication is rejected
pub const AUTH_FAILED_ID: i32 = -1;

/// Packet type field
///
/// The protocol reuses the value 2 for both `AUTH_RESPONSE` (server to
/// client) and `EXEC_COMMAND` (client to server), so this is a thin wrapper
/// rather than an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketType(pub i32);

impl PacketType {
    pub const AUTH: Self = Self(3);
    pub const AUTH_RESPONSE: Self = Self(2);
    pub const EXEC_COMMAND: Self = Self(2);
    pub const RESPONSE_VALUE: Self = Self(0);
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single RCON packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub kind: PacketType,
    pub body: Bytes,
}

impl Packet {
    pub fn new(id: i32, kind: PacketType, body: impl Into<Bytes>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// Authentication request carrying the password
    pub fn auth(id: i32, password: &str) -> Self {
        Self::new(id, PacketType::AUTH, Bytes::copy_from_slice(password.as_bytes()))
    }

    /// Command execution request
    pub fn exec(id: i32, command: &str) -> Self {
        Self::new(
            id,
            PacketType::EXEC_COMMAND,
            Bytes::copy_from_slice(command.as_bytes()),
        )
    }

    /// Value of the size field for this packet
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.body.len() + TERMINATOR_SIZE
    }

    /// Body decoded as text, lossy for non UTF-8 bytes
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_size_counts_header_and_terminators() {
        let packet = Packet::exec(1, "status");
        assert_eq!(packet.wire_size(), 8 + 6 + 2);
        let empty = Packet::new(1, PacketType::RESPONSE_VALUE, Bytes::new());
        assert_eq!(empty.wire_size(), MIN_PACKET_SIZE);
    }

    #[test]
    fn test_auth_and_exec_share_type_value() {
        assert_eq!(PacketType::AUTH_RESPONSE, PacketType::EXEC_COMMAND);
        assert_ne!(PacketType::AUTH, PacketType::EXEC_COMMAND);
        assert_eq!(Packet::auth(7, "pw").kind, PacketType(3));
    }

    #[test]
    fn test_body_text_lossy() {
        let packet = Packet::new(1, PacketType::RESPONSE_VALUE, vec![b'o', b'k', 0xff]);
        assert_eq!(packet.body_text(), "ok\u{fffd}");
    }
}
