//! File-based persistence of the spoofed device identity
//!
//! The official app registers one GUID per installation and keeps using it.
//! Storing the identity in a JSON file lets repeated runs look like the same
//! device, and keeps an app version the server corrected.

use crate::{Result, session::DeviceIdentity};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

/// JSON file holding a single [`DeviceIdentity`]
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Create a store backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored identity.
    ///
    /// A missing, unreadable or malformed file yields `None`; the caller then
    /// generates a fresh identity.
    pub async fn load(&self) -> Result<Option<DeviceIdentity>> {
        if !self.path.exists() {
            debug!("Identity file does not exist: {:?}", self.path);
            return Ok(None);
        }

        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read identity file {:?}: {}", self.path, e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<DeviceIdentity>(&content) {
            Ok(identity) => {
                debug!(
                    "Loaded identity {} from {:?}",
                    identity.device_guid, self.path
                );
                Ok(Some(identity))
            }
            Err(e) => {
                warn!("Ignoring malformed identity file {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    /// Write the identity, creating parent directories as needed
    pub async fn save(&self, identity: &DeviceIdentity) -> Result<()> {
        let content = serde_json::to_string_pretty(identity)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            error!("Failed to create identity directory {:?}: {}", parent, e);
            return Err(crate::Error::store(
                "directory_creation",
                &format!("Directory creation failed: {}", e),
            ));
        }

        match fs::write(&self.path, content).await {
            Ok(_) => {
                debug!("Identity saved to: {:?}", self.path);
                Ok(())
            }
            Err(e) => {
                error!("Failed to write identity file {:?}: {}", self.path, e);
                Err(crate::Error::store(
                    "file_write",
                    &format!("Write failed: {}", e),
                ))
            }
        }
    }
}

/// Default identity file, `<data dir>/ankarakart/identity.json`
pub fn default_identity_path() -> anyhow::Result<PathBuf> {
    let data_dir = if let Some(dir) = dirs::data_dir() {
        dir
    } else {
        warn!("Could not determine data directory, using current directory");
        std::env::current_dir()?.join(".ankarakart")
    };

    Ok(data_dir.join("ankarakart").join("identity.json"))
}
