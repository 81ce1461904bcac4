//! # Packet Framing
//!
//! Fixed-header framing for the length-prefixed packet stream.
//!
//! ## Wire Format
//! ```text
//! [Length(2)] [Component(2)] [Command(2)] [Error(2)] [QType(2)] [Id(2)] [ExtLength(2)?] [Content(N)]
//! ```
//!
//! All fields big endian. `ExtLength` is present only when bit `0x10` of the
//! QType high byte is set; the total content length is then
//! `length | (ext_length << 16)`. The encoder sets the flag and the extra
//! field automatically for content larger than 65535 bytes.
//!
//! Header decoding never consumes content bytes, so callers can check buffer
//! sufficiency before committing to a full decode.

use crate::core::buffer::PacketBuffer;
use crate::core::tdf::{self, Tdf};
use crate::error::{ProtocolError, Result};

/// Size of the fixed portion of the header.
pub const HEADER_SIZE: usize = 12;

/// Header size when the extended-length field is present.
pub const EXT_HEADER_SIZE: usize = 14;

/// QType bit flagging the presence of the extended-length field
/// (bit `0x10` of the high byte).
pub const QTYPE_EXT_LENGTH: u16 = 0x1000;

/// Decoded packet header plus the reconstructed content length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub length: u16,
    pub component: u16,
    pub command: u16,
    pub error: u16,
    pub qtype: u16,
    pub id: u16,
    pub ext_length: u16,
}

impl PacketHeader {
    /// Parse a header from the start of `bytes` without consuming anything.
    ///
    /// Fails with [`ProtocolError::Incomplete`] when `bytes` is too short to
    /// hold the header itself; that is a signal to buffer more input, not a
    /// decode failure.
    pub fn peek(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ProtocolError::Incomplete {
                needed: HEADER_SIZE,
                available: bytes.len(),
            });
        }
        let qtype = u16::from_be_bytes([bytes[8], bytes[9]]);
        let ext_length = if qtype & QTYPE_EXT_LENGTH != 0 {
            if bytes.len() < EXT_HEADER_SIZE {
                return Err(ProtocolError::Incomplete {
                    needed: EXT_HEADER_SIZE,
                    available: bytes.len(),
                });
            }
            u16::from_be_bytes([bytes[12], bytes[13]])
        } else {
            0
        };
        Ok(Self {
            length: u16::from_be_bytes([bytes[0], bytes[1]]),
            component: u16::from_be_bytes([bytes[2], bytes[3]]),
            command: u16::from_be_bytes([bytes[4], bytes[5]]),
            error: u16::from_be_bytes([bytes[6], bytes[7]]),
            qtype,
            id: u16::from_be_bytes([bytes[10], bytes[11]]),
            ext_length,
        })
    }

    /// Read a header at the cursor, consuming exactly the header bytes.
    pub fn read(buf: &mut PacketBuffer) -> Result<Self> {
        let header = Self::peek(buf.unread())?;
        buf.skip(header.header_size())?;
        Ok(header)
    }

    /// Bytes this header occupies on the wire.
    pub fn header_size(&self) -> usize {
        if self.qtype & QTYPE_EXT_LENGTH != 0 {
            EXT_HEADER_SIZE
        } else {
            HEADER_SIZE
        }
    }

    /// Declared content length, reconstructed from both length fields.
    pub fn content_length(&self) -> usize {
        usize::from(self.length) | (usize::from(self.ext_length) << 16)
    }
}

/// A framed protocol packet. Immutable once produced by the decoder; the
/// content stays an opaque byte span until walked by the TDF decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub component: u16,
    pub command: u16,
    pub error: u16,
    pub qtype: u16,
    pub id: u16,
    pub content: Vec<u8>,
}

impl Packet {
    pub fn new(
        component: u16,
        command: u16,
        error: u16,
        qtype: u16,
        id: u16,
        content: Vec<u8>,
    ) -> Self {
        Self {
            component,
            command,
            error,
            qtype,
            id,
            content,
        }
    }

    /// Build a packet whose content is the serialized field sequence.
    pub fn with_values(
        component: u16,
        command: u16,
        error: u16,
        qtype: u16,
        id: u16,
        values: &[Tdf],
    ) -> Self {
        Self::new(component, command, error, qtype, id, tdf::encode_all(values))
    }

    /// Serialize header and content. The extension flag and field are
    /// emitted automatically when the content exceeds 65535 bytes.
    pub fn encode(&self) -> Vec<u8> {
        let content_length = self.content.len();
        debug_assert!(content_length <= 0xFFFF_FFFF);
        let mut qtype = self.qtype;
        if content_length > 0xFFFF {
            qtype |= QTYPE_EXT_LENGTH;
        }
        let mut buf = PacketBuffer::with_capacity(EXT_HEADER_SIZE + content_length);
        buf.write_u16(content_length as u16);
        buf.write_u16(self.component);
        buf.write_u16(self.command);
        buf.write_u16(self.error);
        buf.write_u16(qtype);
        buf.write_u16(self.id);
        // The field must be present whenever the flag is, even if the
        // caller set the flag on a small packet themselves.
        if qtype & QTYPE_EXT_LENGTH != 0 {
            buf.write_u16((content_length >> 16) as u16);
        }
        buf.write_bytes(&self.content);
        buf.into_vec()
    }

    /// Decode one packet at the cursor.
    ///
    /// Fails with [`ProtocolError::Incomplete`] — leaving the cursor where it
    /// was — when fewer bytes are buffered than the header plus its declared
    /// content length. Incomplete is recoverable: feed more bytes and retry.
    pub fn decode(buf: &mut PacketBuffer) -> Result<Self> {
        let header = PacketHeader::peek(buf.unread())?;
        let total = header.header_size() + header.content_length();
        if buf.remaining() < total {
            return Err(ProtocolError::Incomplete {
                needed: total,
                available: buf.remaining(),
            });
        }
        buf.skip(header.header_size())?;
        let content = buf.read_bytes(header.content_length())?;
        Ok(Self {
            component: header.component,
            command: header.command,
            error: header.error,
            qtype: header.qtype,
            id: header.id,
            content,
        })
    }

    /// Walk the content bytes into their ordered value sequence.
    pub fn decode_content(&self) -> Result<Vec<Tdf>> {
        tdf::decode_all(&self.content)
    }
}
