//! # Stream Reassembly
//!
//! Accumulates bytes delivered in arbitrary chunks from a transport and
//! yields only complete packets, preserving any trailing partial packet
//! across calls.
//!
//! One [`PacketReassembler`] is owned exclusively by one logical connection;
//! there is no shared state between connections and no locking inside.

use tracing::trace;

use crate::core::buffer::PacketBuffer;
use crate::core::packet::{Packet, PacketHeader};
use crate::error::{ProtocolError, Result};

/// Default ceiling on a single packet's declared content length (16 MB),
/// so a hostile peer cannot force an arbitrary allocation with one header.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Incremental packet extractor over a chunked byte stream.
pub struct PacketReassembler {
    buf: PacketBuffer,
    max_content_length: usize,
}

impl PacketReassembler {
    pub fn new() -> Self {
        Self::with_max_content_length(DEFAULT_MAX_CONTENT_LENGTH)
    }

    pub fn with_max_content_length(max_content_length: usize) -> Self {
        Self {
            buf: PacketBuffer::new(),
            max_content_length,
        }
    }

    /// Append one inbound chunk and extract every packet that is now
    /// complete. Unconsumed bytes, including a partial trailing header or
    /// content span, are retained for the next call.
    ///
    /// # Errors
    ///
    /// Fails when a header declares content beyond the configured ceiling.
    /// Framing-level `Incomplete` never escapes this method.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Packet>> {
        self.buf.feed(chunk);
        let mut packets = Vec::new();
        loop {
            match PacketHeader::peek(self.buf.unread()) {
                Ok(header) if header.content_length() > self.max_content_length => {
                    return Err(ProtocolError::OversizedPacket(header.content_length()));
                }
                Ok(_) => {}
                Err(ref e) if e.is_incomplete() => break,
                Err(e) => return Err(e),
            }
            match Packet::decode(&mut self.buf) {
                Ok(packet) => packets.push(packet),
                Err(ref e) if e.is_incomplete() => break,
                Err(e) => return Err(e),
            }
        }
        trace!(
            extracted = packets.len(),
            buffered = self.buf.remaining(),
            "reassembler push"
        );
        self.buf.compact();
        Ok(packets)
    }

    /// Unconsumed bytes currently held for the next chunk.
    pub fn buffered(&self) -> usize {
        self.buf.remaining()
    }
}

impl Default for PacketReassembler {
    fn default() -> Self {
        Self::new()
    }
}
