//! Configuration loading
//!
//! Settings are layered as built-in defaults, then the config file, then
//! environment variables, then command-line overrides. The result is
//! validated once, after every layer has been applied.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Command-line values that take precedence over every other source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--proxy`, used for every protocol
    pub proxy: Option<String>,
    /// `--disable-tls-verification`
    pub disable_tls_verification: bool,
    /// `--identity-file`
    pub identity_file: Option<PathBuf>,
    /// `--no-save-identity`
    pub no_save_identity: bool,
    /// `--verbose`
    pub verbose: bool,
}

impl CliOverrides {
    fn apply(&self, settings: &mut Settings) {
        if let Some(proxy) = &self.proxy {
            settings.network.https_proxy = Some(proxy.clone());
        }
        if self.disable_tls_verification {
            settings.network.disable_tls_verification = true;
        }
        if let Some(path) = &self.identity_file {
            settings.storage.identity_file = Some(path.clone());
        }
        if self.no_save_identity {
            settings.storage.save_identity = false;
        }
        if self.verbose {
            settings.logging.verbose = true;
        }
    }
}

/// Builds [`Settings`] from every configuration source
#[derive(Debug, Default)]
pub struct ConfigLoader {
    overrides: CliOverrides,
}

impl ConfigLoader {
    /// Loader without command-line overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that applies `overrides` last
    pub fn with_overrides(overrides: CliOverrides) -> Self {
        Self { overrides }
    }

    /// Config file to read when none was given on the command line
    ///
    /// `ANKARAKART_CONFIG` if it names an existing file, otherwise
    /// `<config dir>/ankarakart/config.toml` if that exists.
    pub fn get_config_path() -> Option<PathBuf> {
        if let Ok(config_path) = std::env::var("ANKARAKART_CONFIG") {
            let path = PathBuf::from(config_path);
            if path.exists() {
                debug!("Using config file from ANKARAKART_CONFIG: {:?}", path);
                return Some(path);
            }
            warn!("ANKARAKART_CONFIG points to non-existent file: {:?}", path);
        }

        let default_path = dirs::config_dir()?.join("ankarakart").join("config.toml");
        if default_path.exists() {
            debug!("Using default config file: {:?}", default_path);
            Some(default_path)
        } else {
            debug!("No config file found");
            None
        }
    }

    /// An explicit `--config` path wins over the discovered one
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::get_config_path(),
        }
    }

    /// Load and validate settings
    ///
    /// A missing file is not an error; its layer is skipped. A file that
    /// exists but does not parse is a `Config` error.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let mut settings = match config_file {
            Some(path) if path.exists() => {
                info!("Loading configuration from file: {:?}", path);
                Settings::from_file(path)?
            }
            Some(path) => {
                warn!("Configuration file not found: {:?}, using defaults", path);
                Settings::default()
            }
            None => Settings::default(),
        };

        settings = settings.merge_with_env()?;
        self.overrides.apply(&mut settings);
        settings.validate()?;

        debug!(
            host = %settings.backend.primary_host,
            ttl_ms = settings.backend.session_ttl_ms,
            proxy = ?settings.get_proxy_url(),
            "Configuration loaded"
        );

        Ok(settings)
    }
}
