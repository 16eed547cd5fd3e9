//! CUPI Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other CUPI crates:
//! - Connection configuration (host, credentials, TLS, timeout)
//! - Global error type covering transport, I/O and configuration failures
//! - Structured logging with tracing
//! - Common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::{AppConfig, ServerConfig};
pub use error::{CuError, CuResult};
pub use logging::init_logging;
