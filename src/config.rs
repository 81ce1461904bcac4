//! # Configuration Management
//!
//! Centralized configuration for the protocol library.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Environment-variable overrides via `from_env()`
//! - Direct instantiation with defaults
//!
//! Defaults carry the legacy deployment's well-known ports and a content
//! length ceiling that keeps a hostile header from forcing an arbitrary
//! allocation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::stream::DEFAULT_MAX_CONTENT_LENGTH;
use crate::error::{ProtocolError, Result};

/// Well-known port of the redirector service.
pub const REDIRECTOR_PORT: u16 = 42127;

/// Well-known port of the main game service.
pub const GAME_PORT: u16 = 14219;

/// Main configuration structure containing all configurable settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    /// Server-specific configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listeners bind to.
    pub bind_address: String,
    pub redirector_port: u16,
    pub game_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            redirector_port: REDIRECTOR_PORT,
            game_port: GAME_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Ceiling on a single packet's declared content length.
    pub max_content_length: usize,
    /// Initial capacity of each connection's read buffer.
    pub read_buffer_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            read_buffer_capacity: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

impl NetworkConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("BLAZE_PROTOCOL_BIND_ADDRESS") {
            config.server.bind_address = addr;
        }

        if let Ok(port) = std::env::var("BLAZE_PROTOCOL_GAME_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.server.game_port = val;
            }
        }

        if let Ok(port) = std::env::var("BLAZE_PROTOCOL_REDIRECTOR_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.server.redirector_port = val;
            }
        }

        if let Ok(max) = std::env::var("BLAZE_PROTOCOL_MAX_CONTENT_LENGTH") {
            if let Ok(val) = max.parse::<usize>() {
                config.transport.max_content_length = val;
            }
        }

        if let Ok(level) = std::env::var("BLAZE_PROTOCOL_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Validate the configuration for common issues and misconfigurations.
    ///
    /// Returns a list of validation errors. Empty list means configuration
    /// is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.server.bind_address.is_empty() {
            errors.push("server.bind_address must not be empty".to_string());
        }

        if self.server.game_port == 0 {
            errors.push("server.game_port must be nonzero".to_string());
        }

        if self.server.redirector_port == 0 {
            errors.push("server.redirector_port must be nonzero".to_string());
        }

        if self.server.game_port == self.server.redirector_port {
            errors.push("server.game_port and server.redirector_port must differ".to_string());
        }

        // A ceiling below one plain-header packet makes every frame oversized.
        if self.transport.max_content_length < 0xFFFF {
            errors.push("transport.max_content_length must be at least 65535".to_string());
        }

        errors
    }
}
