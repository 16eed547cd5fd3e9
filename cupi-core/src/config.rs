//! Application configuration management.
//!
//! Holds the connection settings for a Unity Connection server (host,
//! credentials, TLS verification, timeout) and logging preferences.
//! Configuration is persisted as TOML on disk and may be overridden from
//! the environment.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{CuError, CuResult};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Unity Connection host name or IP address. May carry an explicit
    /// scheme and port ("http://127.0.0.1:8080") for lab or test servers.
    #[serde(default)]
    pub host: String,

    /// Account with access to the provisioning API.
    #[serde(default)]
    pub username: String,

    /// Password for `username`.
    #[serde(default)]
    pub password: String,

    /// Verify the server's TLS certificate. Unity Connection ships with a
    /// self-signed certificate, so this is off unless configured.
    #[serde(default)]
    pub verify_tls: bool,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_timeout() -> u64 {
    constants::DEFAULT_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            verify_tls: false,
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ServerConfig {
    /// Build a server config with default TLS and timeout settings.
    pub fn new(host: &str, username: &str, password: &str) -> Self {
        Self {
            host: host.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    /// Root URL of the provisioning API, e.g. `https://cuc.example.com/vmrest`.
    ///
    /// A bare host gets `https://`; a host that already names a scheme
    /// keeps it.
    pub fn base_url(&self) -> String {
        let trimmed = self.host.trim().trim_matches('"').trim().trim_end_matches('/');
        let origin = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        format!("{origin}{}", constants::API_PREFIX)
    }

    /// Check whether enough is configured to open a connection.
    pub fn is_configured(&self) -> bool {
        !self.host.trim().is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> CuResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> CuResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> CuResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CuError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path, e.g.
    /// `~/.config/cupi/config.toml` on Linux.
    pub fn default_config_path() -> CuResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| CuError::Config("could not determine config directory".into()))?;
        Ok(base.join(constants::APP_DIR_NAME).join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the
    /// platform data directory.
    pub fn effective_log_dir(&self) -> CuResult<PathBuf> {
        if !self.logging.directory.is_empty() {
            return Ok(PathBuf::from(&self.logging.directory));
        }
        let base = dirs::data_dir()
            .ok_or_else(|| CuError::Config("could not determine data directory".into()))?;
        Ok(base.join(constants::APP_DIR_NAME).join("logs"))
    }

    /// Copy of this config for writing back to disk. The password is
    /// blanked unless `keep_password`.
    pub fn to_saved(&self, keep_password: bool) -> Self {
        let mut saved = self.clone();
        if !keep_password {
            saved.server.password.clear();
        }
        saved
    }

    /// Check whether the server connection is configured.
    pub fn is_server_configured(&self) -> bool {
        self.server.is_configured()
    }

    /// Root URL of the provisioning API for the configured server.
    pub fn base_url(&self) -> String {
        self.server.base_url()
    }

    /// Overlay `CUPI_HOST`, `CUPI_USERNAME` and `CUPI_PASSWORD` from the
    /// process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overlay server settings from an arbitrary key lookup. Empty values
    /// are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(host) = get(constants::env::HOST) {
            self.server.host = host;
        }
        if let Some(username) = get(constants::env::USERNAME) {
            self.server.username = username;
        }
        if let Some(password) = get(constants::env::PASSWORD) {
            self.server.password = password;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.timeout_ms, 30_000);
        assert!(!config.server.verify_tls);
        assert_eq!(config.logging.level, "info");
        assert!(!config.is_server_configured());
    }

    #[test]
    fn test_base_url() {
        let server = ServerConfig::new("192.168.200.11", "admin", "secret");
        assert_eq!(server.base_url(), "https://192.168.200.11/vmrest");

        let server = ServerConfig::new("http://127.0.0.1:8080/", "admin", "secret");
        assert_eq!(server.base_url(), "http://127.0.0.1:8080/vmrest");

        let server = ServerConfig::new("  \"cuc.example.com\" ", "admin", "secret");
        assert_eq!(server.base_url(), "https://cuc.example.com/vmrest");
    }

    #[test]
    fn test_debug_redacts_password() {
        let server = ServerConfig::new("cuc", "admin", "hunter2");
        let rendered = format!("{server:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_overrides_ignore_empty_values() {
        let env: HashMap<&str, &str> = [
            ("CUPI_HOST", "cuc.lab"),
            ("CUPI_USERNAME", ""),
            ("CUPI_PASSWORD", "pw"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.server.username = "admin".into();
        config.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.host, "cuc.lab");
        assert_eq!(config.server.username, "admin");
        assert_eq!(config.server.password, "pw");
        assert!(config.is_server_configured());
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut config = AppConfig::default();
        config.server = ServerConfig::new("cuc.lab", "admin", "pw");
        config.server.timeout_ms = 5_000;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.server.host, "cuc.lab");
        assert_eq!(loaded.server.timeout_ms, 5_000);
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn test_saved_copy_can_drop_password() {
        let mut config = AppConfig::default();
        config.server = ServerConfig::new("cuc.lab", "admin", "from-flag");

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lab.toml");
        config.to_saved(false).save_to_file(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("from-flag"));
        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.server.host, "cuc.lab");
        assert_eq!(loaded.server.username, "admin");
        assert!(loaded.server.password.is_empty());

        assert_eq!(config.to_saved(true).server.password, "from-flag");
    }

    #[test]
    fn test_log_dir_override() {
        let mut config = AppConfig::default();
        config.logging.directory = "/var/log/cupi".into();
        assert_eq!(config.effective_log_dir().unwrap(), PathBuf::from("/var/log/cupi"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[server]\nhost = \"cuc\"\n").unwrap();
        assert_eq!(config.server.host, "cuc");
        assert_eq!(config.server.timeout_ms, 30_000);
        assert!(!config.logging.json_output);
    }
}
