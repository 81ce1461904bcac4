//! # Component and Command Names
//!
//! Static id-to-name tables used only for diagnostics. The core never
//! branches on these names; unknown ids render as hex.

use crate::core::packet::Packet;

/// Diagnostic name for a component id.
pub fn component_name(component: u16) -> Option<&'static str> {
    match component {
        0x0001 => Some("Authentication"),
        0x0004 => Some("GameManager"),
        0x0005 => Some("Redirector"),
        0x0007 => Some("Stats"),
        0x0009 => Some("Util"),
        0x000F => Some("Messaging"),
        0x0019 => Some("AssociationLists"),
        0x001C => Some("GameReporting"),
        0x7802 => Some("UserSessions"),
        _ => None,
    }
}

/// Diagnostic name for a command id within a component.
pub fn command_name(component: u16, command: u16) -> Option<&'static str> {
    match (component, command) {
        (0x0001, 0x000A) => Some("createAccount"),
        (0x0001, 0x0028) => Some("login"),
        (0x0001, 0x002D) => Some("logout"),
        (0x0001, 0x0032) => Some("silentLogin"),
        (0x0004, 0x0001) => Some("createGame"),
        (0x0004, 0x0002) => Some("destroyGame"),
        (0x0005, 0x0001) => Some("getServerInstance"),
        (0x0009, 0x0001) => Some("fetchClientConfig"),
        (0x0009, 0x0002) => Some("ping"),
        (0x0009, 0x0007) => Some("preAuth"),
        (0x0009, 0x0008) => Some("postAuth"),
        (0x0009, 0x000B) => Some("userSettingsSave"),
        _ => None,
    }
}

/// Render a one-line packet descriptor for connection logs.
pub fn describe(packet: &Packet) -> String {
    let component = component_name(packet.component)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{:#06x}", packet.component));
    let command = command_name(packet.component, packet.command)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{:#06x}", packet.command));
    format!(
        "{component}::{command} error={:#06x} qtype={:#06x} id={} content={}B",
        packet.error,
        packet.qtype,
        packet.id,
        packet.content.len()
    )
}
