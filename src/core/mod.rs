//! # Core Protocol Components
//!
//! Low-level packet handling, framing, and the TDF binary value codec.
//!
//! This module is the foundation of the protocol: byte-level cursor
//! primitives, the label/tag packing scheme, the recursive TDF
//! encoder/decoder, packet framing, and stream reassembly.
//!
//! ## Components
//! - **Buffer**: big-endian cursor reads/writes, var-int and string codecs
//! - **Tag**: 24-bit label packing
//! - **Tdf**: the self-describing value model and its dispatcher
//! - **Packet**: header framing with the extended-length escape
//! - **Stream**: chunk reassembly into complete packets
//! - **Codec**: tokio codec adapter for framing over byte streams
//!
//! ## Security
//! - Declared content lengths are capped before allocation
//! - Length validation happens before any buffer copy
//! - Malformed input surfaces as errors, never panics

pub mod buffer;
pub mod codec;
pub mod packet;
pub mod stream;
pub mod tag;
pub mod tdf;
