use serde::Deserialize;

/// Top-level configuration settings for the relay.
///
/// Includes settings for both the listener and the message bus.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub bus: BusSettings,
}

/// Configuration settings for the server.
///
/// Defines the host and port the listener will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Configuration settings for the message bus.
///
/// The URL of the Redis instance shared by all relay processes.
#[derive(Debug, Deserialize, Clone)]
pub struct BusSettings {
    pub url: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub bus: Option<PartialBusSettings>,
}

/// Partial server settings.
///
/// Used when loading server configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Partial bus settings.
///
/// Used for bus configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialBusSettings {
    pub url: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the relay has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            bus: BusSettings {
                url: "redis://127.0.0.1:6379".to_string(),
            },
        }
    }
}
