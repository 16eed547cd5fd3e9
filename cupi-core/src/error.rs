//! Global error types for the CUPI client.
//!
//! Only failures that prevent an exchange with the server from completing
//! live here. HTTP status codes returned by the server are not errors: the
//! API crate reports them as outcome values.

use thiserror::Error;

/// Convenience type alias for Results using CuError.
pub type CuResult<T> = Result<T, CuError>;

/// Unified error type for the CUPI crates.
#[derive(Error, Debug)]
pub enum CuError {
    // -- Configuration errors --
    /// Failed to load or parse configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Network errors --
    /// HTTP transport failed (connection refused, DNS, TLS, body read).
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    // -- Input errors --
    /// A caller-supplied value cannot be expressed on the wire.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for CuError {
    fn from(e: serde_json::Error) -> Self {
        CuError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CuError {
    fn from(e: toml::de::Error) -> Self {
        CuError::Config(e.to_string())
    }
}

impl CuError {
    /// Whether this error came from the network layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, CuError::Http(_) | CuError::Timeout(_))
    }
}
