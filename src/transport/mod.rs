//! # Transport Layer
//!
//! Socket listeners and connection drivers feeding the codec. The core
//! decode path never performs I/O; everything blocking lives here.

pub mod tcp;
