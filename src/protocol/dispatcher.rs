use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::core::packet::Packet;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::components;

type HandlerFn = dyn Fn(&Packet) -> Result<Option<Packet>> + Send + Sync + 'static;

/// Routes decoded packets to handlers keyed by `(component, command)`.
///
/// A handler may return a response packet to be written back, or `None` for
/// notifications that expect no reply. Packets with no registered route are
/// logged and dropped; what any given command *means* is the application
/// layer's concern, not this crate's.
pub struct Dispatcher {
    handlers: Arc<RwLock<HashMap<(u16, u16), Box<HandlerFn>>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn register<F>(&self, component: u16, command: u16, handler: F) -> Result<()>
    where
        F: Fn(&Packet) -> Result<Option<Packet>> + Send + Sync + 'static,
    {
        let mut handlers = self
            .handlers
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_DISPATCHER_WRITE_LOCK.to_string()))?;

        handlers.insert((component, command), Box::new(handler));
        Ok(())
    }

    pub fn dispatch(&self, packet: &Packet) -> Result<Option<Packet>> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_DISPATCHER_READ_LOCK.to_string()))?;

        match handlers.get(&(packet.component, packet.command)) {
            Some(handler) => handler(packet),
            None => {
                warn!(descriptor = %components::describe(packet), "No handler registered");
                Ok(None)
            }
        }
    }
}
