//! # Tokio Codec Adapter
//!
//! [`tokio_util::codec`] framing for [`Packet`], so transports can drive the
//! protocol through `Framed` streams and sinks. Decoding shares the header
//! peek with the reassembler: incomplete input yields `Ok(None)` and the
//! bytes stay in the read buffer.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::core::packet::{Packet, PacketHeader};
use crate::core::stream::DEFAULT_MAX_CONTENT_LENGTH;
use crate::error::{ProtocolError, Result};

/// Codec for framing packets over a byte stream.
#[derive(Debug, Clone)]
pub struct PacketCodec {
    max_content_length: usize,
}

impl PacketCodec {
    pub fn new() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }

    pub fn with_max_content_length(max_content_length: usize) -> Self {
        Self { max_content_length }
    }
}

impl Default for PacketCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        let header = match PacketHeader::peek(&src[..]) {
            Ok(header) => header,
            Err(e) if e.is_incomplete() => return Ok(None),
            Err(e) => return Err(e),
        };
        let content_length = header.content_length();
        if content_length > self.max_content_length {
            return Err(ProtocolError::OversizedPacket(content_length));
        }
        let total = header.header_size() + content_length;
        if src.len() < total {
            // Reserve what the rest of this packet needs before returning.
            src.reserve(total - src.len());
            return Ok(None);
        }
        let _ = src.split_to(header.header_size());
        let content = src.split_to(content_length).to_vec();
        Ok(Some(Packet {
            component: header.component,
            command: header.command,
            error: header.error,
            qtype: header.qtype,
            id: header.id,
            content,
        }))
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, packet: Packet, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(&packet.encode());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_decoder_roundtrip() {
        let packet = Packet::new(0x0001, 0x0028, 0, 0, 1, vec![0xAA, 0xBB, 0xCC]);
        let mut codec = PacketCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(packet.clone(), &mut buf).unwrap();

        let decoded = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, packet);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decoder_waits_for_full_packet() {
        let packet = Packet::new(1, 2, 0, 0, 3, vec![9; 10]);
        let bytes = packet.encode();
        let mut codec = PacketCodec::new();
        let mut buf = BytesMut::new();

        buf.extend_from_slice(&bytes[..8]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(&bytes[8..]);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), packet);
    }

    #[test]
    fn test_decoder_rejects_oversized() {
        let packet = Packet::new(1, 2, 0, 0, 3, vec![0; 64]);
        let mut codec = PacketCodec::with_max_content_length(32);
        let mut buf = BytesMut::from(&packet.encode()[..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::OversizedPacket(64))
        ));
    }
}
