//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "cupi";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory name used under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "cupi";

/// Rolling log file prefix.
pub const LOG_FILE_NAME: &str = "cupi.log";

/// Path prefix of the provisioning REST API on the server.
pub const API_PREFIX: &str = "/vmrest";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Environment variables that override the server section of the config file.
pub mod env {
    pub const HOST: &str = "CUPI_HOST";
    pub const USERNAME: &str = "CUPI_USERNAME";
    pub const PASSWORD: &str = "CUPI_PASSWORD";
}

/// Default schedule detail window: 08:30 to 17:00, in minutes past midnight.
pub mod schedule {
    pub const DEFAULT_START_MINUTES: u16 = 510;
    pub const DEFAULT_END_MINUTES: u16 = 1020;

    /// The server only accepts times on five-minute boundaries.
    pub const MINUTE_GRANULARITY: u16 = 5;
}

/// Default language code for greeting stream files (US English).
pub const DEFAULT_LANGUAGE: u32 = 1033;

/// Content type used when uploading greeting audio.
pub const AUDIO_CONTENT_TYPE: &str = "audio/wav";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_business_hours() {
        assert_eq!(schedule::DEFAULT_START_MINUTES, 8 * 60 + 30);
        assert_eq!(schedule::DEFAULT_END_MINUTES, 17 * 60);
        assert_eq!(schedule::DEFAULT_START_MINUTES % schedule::MINUTE_GRANULARITY, 0);
    }
}
