//! Packet codec for RCON framing

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::RconError;
use crate::packet::{
    Packet, PacketType, HEADER_SIZE, MAX_PACKET_SIZE, MIN_PACKET_SIZE, TERMINATOR_SIZE,
};

/// Bytes taken by the little-endian size prefix
const SIZE_PREFIX: usize = 4;

/// Symmetric codec: both sides of the connection exchange `Packet`s
#[derive(Debug, Default, Clone, Copy)]
pub struct RconCodec;

impl RconCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RconCodec {
    type Item = Packet;
    type Error = RconError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Need at least 4 bytes for the size prefix
        if src.len() < SIZE_PREFIX {
            return Ok(None);
        }

        // Peek at size without consuming
        let raw = i32::from_le_bytes([src[0], src[1], src[2], src[3]]);
        if raw < MIN_PACKET_SIZE as i32 {
            return Err(RconError::PacketTooSmall {
                size: raw.max(0) as usize,
                min: MIN_PACKET_SIZE,
            });
        }
        let size = raw as usize;
        if size > MAX_PACKET_SIZE {
            return Err(RconError::PacketTooLarge {
                size,
                max: MAX_PACKET_SIZE,
            });
        }

        if src.len() < SIZE_PREFIX + size {
            src.reserve(SIZE_PREFIX + size - src.len());
            return Ok(None);
        }

        src.advance(SIZE_PREFIX);
        let id = src.get_i32_le();
        let kind = PacketType(src.get_i32_le());
        let body = src.split_to(size - HEADER_SIZE - TERMINATOR_SIZE).freeze();
        src.advance(TERMINATOR_SIZE);

        Ok(Some(Packet { id, kind, body }))
    }
}

impl Encoder<Packet> for RconCodec {
    type Error = RconError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let size = item.wire_size();
        if size > MAX_PACKET_SIZE {
            return Err(RconError::PacketTooLarge {
                size,
                max: MAX_PACKET_SIZE,
            });
        }

        dst.reserve(SIZE_PREFIX + size);
        dst.put_i32_le(size as i32);
        dst.put_i32_le(item.id);
        dst.put_i32_le(item.kind.0);
        dst.extend_from_slice(&item.body);
        dst.put_u8(0);
        dst.put_u8(0);
        Ok(())
    }
}
