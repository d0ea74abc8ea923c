//! Crate-wide error type.
//!
//! Failures that cross module boundaries are wrapped in [`RelayError`];
//! per-message problems (malformed frames, undecodable bus payloads) are
//! handled where they occur and never become one of these.

/// Error type for relay operations
#[derive(Debug)]
pub enum RelayError {
    /// Configuration could not be loaded or deserialized
    Config(config::ConfigError),
    /// The message bus refused a connection or a command
    Bus(redis::RedisError),
    /// An update could not be serialized for the bus
    Encode(serde_json::Error),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Config(e) => write!(f, "configuration error: {}", e),
            RelayError::Bus(e) => write!(f, "bus error: {}", e),
            RelayError::Encode(e) => write!(f, "encode error: {}", e),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<config::ConfigError> for RelayError {
    fn from(e: config::ConfigError) -> Self {
        RelayError::Config(e)
    }
}

impl From<redis::RedisError> for RelayError {
    fn from(e: redis::RedisError) -> Self {
        RelayError::Bus(e)
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::Encode(e)
    }
}
