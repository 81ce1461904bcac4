//! # Protocol Layer
//!
//! Routing of decoded packets and the static diagnostic name tables.

pub mod components;
pub mod dispatcher;

pub use dispatcher::Dispatcher;
