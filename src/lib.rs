//! # blaze-protocol
//!
//! Packet framing and TDF serialization core for the Blaze game-backend
//! wire protocol.
//!
//! The crate implements the bit-exact wire contracts a legacy
//! online-services client expects: a length-framed binary packet transport
//! and the self-describing, recursively-typed TDF value format carried in
//! packet content, including the packed 4-character label/tag scheme and
//! the zigzag var-int codec.
//!
//! ## Layers
//! - [`core`]: byte cursor, tag codec, TDF model, packet framing, stream
//!   reassembly, and a tokio codec adapter
//! - [`protocol`]: packet routing and diagnostic name tables
//! - [`transport`]: TCP accept loops and connection drivers
//! - [`config`] / [`utils`]: configuration and logging setup
//!
//! ## Example
//! ```rust
//! use blaze_protocol::{Packet, PacketReassembler, Tdf};
//!
//! let packet = Packet::with_values(
//!     0x0001, // Authentication
//!     0x0028, // login
//!     0,
//!     0,
//!     1,
//!     &[Tdf::string("MAIL", "player@example.com")],
//! );
//! let wire = packet.encode();
//!
//! let mut reassembler = PacketReassembler::new();
//! let packets = reassembler.push(&wire).unwrap();
//! assert_eq!(packets[0].decode_content().unwrap().len(), 1);
//! ```
//!
//! ## Decode Safety
//! Malformed input surfaces as [`ProtocolError`] values, never panics, and
//! declared lengths are validated before allocation. An incomplete packet
//! is a buffering signal, not an error; see [`error`] for the taxonomy.

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use crate::core::buffer::PacketBuffer;
pub use crate::core::codec::PacketCodec;
pub use crate::core::packet::{Packet, PacketHeader};
pub use crate::core::stream::PacketReassembler;
pub use crate::core::tag::{label_to_tag, tag_to_label};
pub use crate::core::tdf::{ListItem, ListKind, Pair, Tdf, TdfStruct, TdfType, TdfValue, Triple};
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::Dispatcher;
