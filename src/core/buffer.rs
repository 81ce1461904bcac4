//! # Packet Buffer
//!
//! Growable byte buffer with a consuming read cursor and tail-appending
//! writes. All multi-byte values are big endian.
//!
//! This is the single primitive layer every codec in the crate is built on:
//! fixed-width integer and float access, the zigzag var-int codec, and the
//! length-prefixed NUL-terminated string codec.
//!
//! ## Var-int leniency
//! [`PacketBuffer::read_var_int`] never fails: on a short or overlong
//! sequence it returns the value accumulated so far. Peers rely on this
//! silent truncation, so corruption is caught by higher-level length checks
//! instead. [`PacketBuffer::read_var_int_strict`] turns both conditions into
//! explicit errors for tests and fuzzing.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{ProtocolError, Result};

/// Compact only once the consumed prefix is at least this large, so small
/// trailing remainders don't trigger a copy on every call.
const COMPACT_THRESHOLD: usize = 4096;

/// In-memory byte buffer with separate read and write ends.
///
/// Reads consume from an internal cursor; writes append at the tail. The
/// buffer can be fed incrementally from a stream, which is how the packet
/// reassembler uses it.
#[derive(Debug, Default)]
pub struct PacketBuffer {
    buf: BytesMut,
    pos: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            pos: 0,
        }
    }

    /// Append a chunk of bytes at the tail.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Number of unread bytes between the cursor and the tail.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unread portion of the buffer.
    pub fn unread(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    /// Current cursor position, in bytes consumed since the last compaction.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Advance the cursor without inspecting the bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        if self.remaining() < count {
            return Err(ProtocolError::Truncated {
                needed: count,
                available: self.remaining(),
            });
        }
        self.pos += count;
        Ok(())
    }

    /// Drop the consumed prefix once it has grown past the threshold. Keeps
    /// memory bounded for long-lived connection buffers.
    pub fn compact(&mut self) {
        if self.pos >= COMPACT_THRESHOLD {
            self.buf.advance(self.pos);
            self.pos = 0;
        }
    }

    /// Consume everything written so far. Used by the encode path, where the
    /// buffer starts empty and only ever grows.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf.freeze().to_vec()
    }

    fn take(&mut self, count: usize) -> Result<&[u8]> {
        if self.remaining() < count {
            return Err(ProtocolError::Truncated {
                needed: count,
                available: self.remaining(),
            });
        }
        let start = self.pos;
        self.pos += count;
        Ok(&self.buf[start..self.pos])
    }

    // ------------------------------------------------------------------
    // Fixed-width reads
    // ------------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let b = self.take(8)?;
        Ok(f64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read `count` raw bytes into an owned vector. The length is validated
    /// against the unread span before any allocation happens.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.take(count)?.to_vec())
    }

    // ------------------------------------------------------------------
    // Fixed-width writes
    // ------------------------------------------------------------------

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.put_f64(value);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    // ------------------------------------------------------------------
    // Var-int codec
    // ------------------------------------------------------------------

    /// Zigzag-encode `value` and append it as a base-128 continuation
    /// sequence, least significant group first. At most 10 bytes.
    pub fn write_var_int(&mut self, value: i64) {
        let mut zz = (value as u64) << 1;
        if value < 0 {
            zz = !zz;
        }
        while zz >= 0x80 {
            self.buf.put_u8((zz as u8) | 0x80);
            zz >>= 7;
        }
        self.buf.put_u8(zz as u8);
    }

    /// Lenient var-int read: the inverse of [`write_var_int`], except that a
    /// sequence cut short by the end of the buffer, or one whose tenth byte
    /// would overflow 64 bits, yields the value accumulated so far.
    ///
    /// [`write_var_int`]: PacketBuffer::write_var_int
    pub fn read_var_int(&mut self) -> i64 {
        zigzag_decode(self.read_raw_var_int())
    }

    fn read_raw_var_int(&mut self) -> u64 {
        let mut x: u64 = 0;
        let mut shift: u32 = 0;
        for i in 0..10 {
            let Some(byte) = self.peek_u8() else {
                return x;
            };
            self.pos += 1;
            if byte < 0x80 {
                // The tenth group carries only the top bit of a u64.
                if i == 9 && byte > 1 {
                    return x;
                }
                return x | (u64::from(byte) << shift);
            }
            x |= u64::from(byte & 0x7F) << shift;
            shift += 7;
        }
        x
    }

    /// Strict var-int read for tests and fuzz harnesses: surfaces the
    /// conditions the lenient reader swallows.
    pub fn read_var_int_strict(&mut self) -> Result<i64> {
        let mut x: u64 = 0;
        let mut shift: u32 = 0;
        for i in 0..10 {
            let byte = match self.peek_u8() {
                Some(byte) => byte,
                None => {
                    return Err(ProtocolError::Truncated {
                        needed: 1,
                        available: 0,
                    })
                }
            };
            self.pos += 1;
            if byte < 0x80 {
                if i == 9 && byte > 1 {
                    return Err(ProtocolError::VarIntOverflow);
                }
                return Ok(zigzag_decode(x | (u64::from(byte) << shift)));
            }
            x |= u64::from(byte & 0x7F) << shift;
            shift += 7;
        }
        Err(ProtocolError::VarIntOverflow)
    }

    // ------------------------------------------------------------------
    // String and blob codecs
    // ------------------------------------------------------------------

    /// Length-prefixed NUL-terminated string. The var-int length counts
    /// exactly one trailing NUL; if `value` already ends with one, no second
    /// terminator is emitted.
    pub fn write_string(&mut self, value: &str) {
        let bytes = value.as_bytes();
        if bytes.last() == Some(&0) {
            self.write_var_int(bytes.len() as i64);
            self.buf.put_slice(bytes);
        } else {
            self.write_var_int(bytes.len() as i64 + 1);
            self.buf.put_slice(bytes);
            self.buf.put_u8(0);
        }
    }

    /// Read a length-prefixed string. Exactly `length` bytes are consumed;
    /// a trailing NUL inside those bytes is stripped from the result, and no
    /// terminator beyond `length` is ever read.
    pub fn read_string(&mut self) -> Result<String> {
        let length =
            usize::try_from(self.read_var_int()).map_err(|_| ProtocolError::VarIntOverflow)?;
        let bytes = self.take(length)?;
        let content = match bytes.split_last() {
            Some((0, rest)) => rest,
            _ => bytes,
        };
        Ok(String::from_utf8_lossy(content).into_owned())
    }

    /// Length-prefixed raw bytes, no terminator.
    pub fn write_blob(&mut self, data: &[u8]) {
        self.write_var_int(data.len() as i64);
        self.buf.put_slice(data);
    }

    pub fn read_blob(&mut self) -> Result<Vec<u8>> {
        let length =
            usize::try_from(self.read_var_int()).map_err(|_| ProtocolError::VarIntOverflow)?;
        self.read_bytes(length)
    }
}

impl From<&[u8]> for PacketBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            buf: BytesMut::from(bytes),
            pos: 0,
        }
    }
}

impl From<Vec<u8>> for PacketBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(bytes.as_slice())
    }
}

fn zigzag_decode(zz: u64) -> i64 {
    ((zz >> 1) as i64) ^ -((zz & 1) as i64)
}
