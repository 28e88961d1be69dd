//! Configuration settings
//!
//! Provides configuration loading from environment variables,
//! configuration files, and command-line overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Address of the handshake server used by the official app
pub const DEFAULT_PRIMARY_HOST: &str = "88.255.141.70";

/// Last app version known to work; corrected by the server during the handshake
pub const DEFAULT_APP_VERSION: &str = "3.0.6";

// Helper functions for serde defaults
fn default_true() -> bool {
    true
}

fn default_primary_host() -> String {
    DEFAULT_PRIMARY_HOST.to_string()
}

fn default_language() -> String {
    "tr".to_string()
}

fn default_session_ttl_ms() -> u64 {
    60_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    60
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_flag(name: &str, value: &str) -> crate::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(crate::Error::config(
            name,
            &format!("Expected a boolean, got '{}'", value),
        )),
    }
}

/// Main configuration settings for the client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Backend and session configuration
    #[serde(default)]
    pub backend: BackendSettings,
    /// Spoofed device identity overrides
    #[serde(default)]
    pub device: DeviceSettings,
    /// Network configuration
    #[serde(default)]
    pub network: NetworkSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Identity persistence configuration
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Backend endpoints and session window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Host the handshake starts against (IPv4 literal or base URL)
    #[serde(default = "default_primary_host")]
    pub primary_host: String,
    /// Value of the `LAN` query parameter
    #[serde(default = "default_language")]
    pub language: String,
    /// Session lifetime in milliseconds before a new handshake is required
    #[serde(default = "default_session_ttl_ms")]
    pub session_ttl_ms: u64,
    /// Adopt the server's app version on mismatch instead of failing the handshake
    #[serde(default = "default_true")]
    pub auto_correct_version: bool,
}

/// Fixed device identity fields; anything left unset is generated
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeviceSettings {
    /// Device GUID sent as `UID`
    #[serde(default)]
    pub guid: Option<String>,
    /// App version sent as `VER`
    #[serde(default)]
    pub app_version: Option<String>,
    /// Phone model embedded in the user agent
    #[serde(default)]
    pub phone_model: Option<String>,
    /// Android version embedded in the user agent
    #[serde(default)]
    pub os_version: Option<String>,
}

/// Network and proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// HTTPS proxy URL
    #[serde(default)]
    pub https_proxy: Option<String>,
    /// HTTP proxy URL
    #[serde(default)]
    pub http_proxy: Option<String>,
    /// All protocols proxy URL
    #[serde(default)]
    pub all_proxy: Option<String>,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Disable TLS certificate verification
    #[serde(default)]
    pub disable_tls_verification: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

/// Where the spoofed identity is kept between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Identity file path; defaults to the platform data directory
    #[serde(default)]
    pub identity_file: Option<PathBuf>,
    /// Write the identity back after each run
    #[serde(default = "default_true")]
    pub save_identity: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            primary_host: default_primary_host(),
            language: default_language(),
            session_ttl_ms: default_session_ttl_ms(),
            auto_correct_version: default_true(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            https_proxy: None,
            http_proxy: None,
            all_proxy: None,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            disable_tls_verification: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            identity_file: None,
            save_identity: default_true(),
        }
    }
}

impl BackendSettings {
    /// Session window as a [`Duration`]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_millis(self.session_ttl_ms)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables on top of the defaults
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            crate::Error::config("file", &format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Merge settings with environment variable overrides
    ///
    /// Every variable that is set wins over the current value, even when it
    /// repeats a built-in default. Empty variables count as unset.
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Some(host) = env_value("ANKARAKART_PRIMARY_HOST") {
            self.backend.primary_host = host;
        }

        if let Some(ttl) = env_value("ANKARAKART_SESSION_TTL_MS") {
            self.backend.session_ttl_ms = ttl.parse().map_err(|e| {
                crate::Error::config(
                    "ANKARAKART_SESSION_TTL_MS",
                    &format!("Invalid session TTL: {}", e),
                )
            })?;
        }

        if let Some(version) = env_value("ANKARAKART_APP_VERSION") {
            self.device.app_version = Some(version);
        }

        if let Some(path) = env_value("ANKARAKART_IDENTITY_FILE") {
            self.storage.identity_file = Some(PathBuf::from(path));
        }

        if let Some(proxy) = env_value("HTTPS_PROXY") {
            self.network.https_proxy = Some(proxy);
        }
        if let Some(proxy) = env_value("HTTP_PROXY") {
            self.network.http_proxy = Some(proxy);
        }
        if let Some(proxy) = env_value("ALL_PROXY") {
            self.network.all_proxy = Some(proxy);
        }

        if let Some(level) = env_value("LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(verbose) = env_value("VERBOSE") {
            self.logging.verbose = parse_flag("VERBOSE", &verbose)?;
        }

        Ok(self)
    }

    /// Get effective proxy URL based on priority
    pub fn get_proxy_url(&self) -> Option<String> {
        self.network
            .https_proxy
            .as_ref()
            .or(self.network.http_proxy.as_ref())
            .or(self.network.all_proxy.as_ref())
            .cloned()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.backend.primary_host.trim().is_empty() {
            return Err(crate::Error::config(
                "primary_host",
                "Primary host cannot be empty",
            ));
        }

        if self.backend.session_ttl_ms == 0 {
            return Err(crate::Error::config(
                "session_ttl_ms",
                "Invalid session TTL: cannot be 0",
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "log_level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        for (name, proxy_url) in [
            ("https_proxy", &self.network.https_proxy),
            ("http_proxy", &self.network.http_proxy),
            ("all_proxy", &self.network.all_proxy),
        ]
        .iter()
        {
            if let Some(url_str) = proxy_url
                && let Err(e) = url::Url::parse(url_str)
            {
                return Err(crate::Error::config(
                    *name,
                    &format!("Invalid proxy URL '{}': {}", url_str, e),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_TEST_MUTEX;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend.primary_host, "88.255.141.70");
        assert_eq!(settings.backend.language, "tr");
        assert_eq!(settings.backend.session_ttl_ms, 60_000);
        assert!(settings.backend.auto_correct_version);
        assert!(settings.device.guid.is_none());
        assert!(settings.storage.save_identity);
    }

    #[test]
    fn test_session_ttl_duration() {
        let settings = Settings::new();
        assert_eq!(settings.backend.session_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[backend]
primary_host = "http://127.0.0.1:8080"
session_ttl_ms = 5000
auto_correct_version = false

[device]
app_version = "3.1.0"
phone_model = "Nexus 5X"
        "#
        )
        .unwrap();

        let settings = Settings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.backend.primary_host, "http://127.0.0.1:8080");
        assert_eq!(settings.backend.session_ttl_ms, 5000);
        assert!(!settings.backend.auto_correct_version);
        assert_eq!(settings.backend.language, "tr");
        assert_eq!(settings.device.app_version.as_deref(), Some("3.1.0"));
        assert_eq!(settings.device.phone_model.as_deref(), Some("Nexus 5X"));
        assert!(settings.device.os_version.is_none());
    }

    #[test]
    fn test_env_var_override() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        unsafe {
            std::env::set_var("ANKARAKART_SESSION_TTL_MS", "1500");
            std::env::set_var("ANKARAKART_APP_VERSION", "3.2.0");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.backend.session_ttl_ms, 1500);
        assert_eq!(settings.device.app_version.as_deref(), Some("3.2.0"));

        unsafe {
            std::env::remove_var("ANKARAKART_SESSION_TTL_MS");
            std::env::remove_var("ANKARAKART_APP_VERSION");
        }
    }

    #[test]
    fn test_invalid_ttl_env_var() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        unsafe {
            std::env::set_var("ANKARAKART_SESSION_TTL_MS", "soon");
        }

        let result = Settings::from_env();

        unsafe {
            std::env::remove_var("ANKARAKART_SESSION_TTL_MS");
        }

        assert!(matches!(result, Err(crate::Error::Config { .. })));
    }

    #[test]
    fn test_env_equal_to_default_still_beats_file() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        let mut from_file = Settings::default();
        from_file.backend.primary_host = "10.9.9.9".to_string();
        from_file.backend.session_ttl_ms = 5000;
        from_file.logging.level = "debug".to_string();

        unsafe {
            std::env::set_var("ANKARAKART_PRIMARY_HOST", DEFAULT_PRIMARY_HOST);
            std::env::set_var("ANKARAKART_SESSION_TTL_MS", "60000");
            std::env::set_var("LOG_LEVEL", "info");
        }

        let merged = from_file.merge_with_env();

        unsafe {
            std::env::remove_var("ANKARAKART_PRIMARY_HOST");
            std::env::remove_var("ANKARAKART_SESSION_TTL_MS");
            std::env::remove_var("LOG_LEVEL");
        }

        let merged = merged.unwrap();
        assert_eq!(merged.backend.primary_host, DEFAULT_PRIMARY_HOST);
        assert_eq!(merged.backend.session_ttl_ms, 60_000);
        assert_eq!(merged.logging.level, "info");
    }

    #[test]
    fn test_verbose_env_var() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        unsafe {
            std::env::set_var("VERBOSE", "true");
        }
        let enabled = Settings::default().merge_with_env();

        unsafe {
            std::env::set_var("VERBOSE", "sometimes");
        }
        let invalid = Settings::default().merge_with_env();

        unsafe {
            std::env::remove_var("VERBOSE");
        }

        assert!(enabled.unwrap().logging.verbose);
        assert!(matches!(invalid, Err(crate::Error::Config { .. })));
    }

    #[test]
    fn test_empty_env_var_is_unset() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        unsafe {
            std::env::set_var("ANKARAKART_PRIMARY_HOST", "");
        }
        let settings = Settings::from_env();
        unsafe {
            std::env::remove_var("ANKARAKART_PRIMARY_HOST");
        }

        assert_eq!(settings.unwrap().backend.primary_host, DEFAULT_PRIMARY_HOST);
    }

    #[test]
    fn test_proxy_priority() {
        let mut settings = Settings::default();
        settings.network.https_proxy = Some("https://proxy1:8080".to_string());
        settings.network.http_proxy = Some("http://proxy2:8080".to_string());
        settings.network.all_proxy = Some("socks5://proxy3:1080".to_string());

        assert_eq!(settings.get_proxy_url().unwrap(), "https://proxy1:8080");

        settings.network.https_proxy = None;
        assert_eq!(settings.get_proxy_url().unwrap(), "http://proxy2:8080");

        settings.network.http_proxy = None;
        assert_eq!(settings.get_proxy_url().unwrap(), "socks5://proxy3:1080");
    }

    #[test]
    fn test_validation_success() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_ttl() {
        let mut settings = Settings::default();
        settings.backend.session_ttl_ms = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_empty_host() {
        let mut settings = Settings::default();
        settings.backend.primary_host = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_proxy_url() {
        let mut settings = Settings::default();
        settings.network.https_proxy = Some("invalid-url".to_string());
        assert!(settings.validate().is_err());
    }
}
