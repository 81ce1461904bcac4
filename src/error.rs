//! # Error Types
//!
//! Comprehensive error handling for the Blaze wire protocol.
//!
//! This module defines all error variants that can occur during protocol
//! operations, from low-level I/O errors to decode-time corruption.
//!
//! ## Error Categories
//! - **Recoverable**: [`ProtocolError::Incomplete`] only signals that more
//!   bytes must be buffered before a packet can be framed. It is handled
//!   inside the stream reassembler and should never surface as a failure.
//! - **Decode Errors**: `Truncated`, `UnknownTdfType`, `UnknownListType` mean
//!   byte alignment inside the current content is lost; the packet must be
//!   dropped and the connection resynchronized or closed.
//! - **I/O / Transport Errors**: socket-level failures from the accept and
//!   read loops.
//!
//! No malformed input may ever panic the decoder — a remote peer must not be
//! able to crash the process.

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Dispatcher-related error messages
    pub const ERR_DISPATCHER_WRITE_LOCK: &str = "Failed to acquire write lock on dispatcher";
    pub const ERR_DISPATCHER_READ_LOCK: &str = "Failed to acquire read lock on dispatcher";

    /// Connection errors
    pub const ERR_CONNECTION_CLOSED: &str = "Connection closed";
}

/// Primary error type for all protocol operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Not enough buffered bytes to frame a full packet. Recoverable: wait
    /// for more input. Never propagated past the reassembler.
    #[error("Incomplete packet: need {needed} bytes, have {available}")]
    Incomplete { needed: usize, available: usize },

    /// A fixed-width read ran past the end of the buffer mid-value. The
    /// enclosing content is unrecoverable.
    #[error("Truncated value: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Unknown TDF type: {0:#04x}")]
    UnknownTdfType(u8),

    #[error("Unknown list element type: {0:#04x}")]
    UnknownListType(u8),

    /// Value tree nested deeper than the decoder is willing to recurse.
    /// Same unrecoverable-alignment consequence as `UnknownTdfType`.
    #[error("TDF nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Only produced by the strict varint reader; the default reader is
    /// lenient and returns a best-effort value instead.
    #[error("Var-int exceeds 64-bit range")]
    VarIntOverflow,

    #[error("Packet content too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl ProtocolError {
    /// True for the recoverable "buffer more bytes" signal.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ProtocolError::Incomplete { .. })
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
