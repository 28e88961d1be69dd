//! Spoofed device identity
//!
//! The backend only answers requests that look like they come from the
//! official Android app. A [`DeviceIdentity`] carries everything that makes a
//! request look that way: the installation GUID, the app version and the
//! phone model / Android version that end up in the user agent.

use crate::config::settings::{DEFAULT_APP_VERSION, DeviceSettings};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

const PHONE_MODELS: &[&str] = &[
    "Nexus 5X",
    "Nexus 6P",
    "Galaxy C9 Pro",
    "GM 5 Plus d",
    "H2849",
    "CoreBootDevice",
    "AndroidX86",
    "Switch",
    "Galaxy A51",
    "Tab4",
];

const OS_VERSIONS: &[&str] = &[
    "7.0.1", "8.0.0", "8.0.1", "7.1.2", "6.0.1", "6.0", "7.0", "7.1.1", "7.1",
];

/// Identity of the app installation the client pretends to be
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    /// Installation GUID, sent as `UID`
    pub device_guid: String,
    /// App version, sent as `VER`; the only field the server may correct
    pub app_version: String,
    /// Phone model embedded in the user agent
    pub phone_model: String,
    /// Android version embedded in the user agent
    pub os_version: String,
}

impl DeviceIdentity {
    /// Create an identity from explicit values
    pub fn new(
        device_guid: impl Into<String>,
        app_version: impl Into<String>,
        phone_model: impl Into<String>,
        os_version: impl Into<String>,
    ) -> Self {
        Self {
            device_guid: device_guid.into(),
            app_version: app_version.into(),
            phone_model: phone_model.into(),
            os_version: os_version.into(),
        }
    }

    /// Generate a fresh random identity for the given app version
    pub fn generate(app_version: impl Into<String>) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            device_guid: generate_guid(&mut rng),
            app_version: app_version.into(),
            phone_model: pick(&mut rng, PHONE_MODELS),
            os_version: pick(&mut rng, OS_VERSIONS),
        }
    }

    /// Build an identity from configured values, starting from `base` when given
    /// and generating whatever is still missing
    pub fn resolve(device: &DeviceSettings, base: Option<DeviceIdentity>) -> Self {
        let mut identity = base.unwrap_or_else(|| {
            DeviceIdentity::generate(
                device
                    .app_version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()),
            )
        });

        if let Some(guid) = &device.guid {
            identity.device_guid = guid.clone();
        }
        if let Some(app_version) = &device.app_version {
            identity.app_version = app_version.clone();
        }
        if let Some(phone_model) = &device.phone_model {
            identity.phone_model = phone_model.clone();
        }
        if let Some(os_version) = &device.os_version {
            identity.os_version = os_version.clone();
        }

        identity
    }

    /// User agent of the official app for this identity
    pub fn user_agent(&self) -> String {
        format!(
            "EGO Genel Mudurlugu-EGO Cepte-{} {} {}",
            self.app_version, self.phone_model, self.os_version
        )
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::generate(DEFAULT_APP_VERSION)
    }
}

/// `{UPPER-CASE UUID}-<nine digit number>`, the format the app registers with
fn generate_guid<R: Rng>(rng: &mut R) -> String {
    let uuid = uuid::Uuid::new_v4().to_string().to_uppercase();
    let suffix: u32 = rng.gen_range(111_111_111..=999_999_999);
    format!("{{{}}}-{}", uuid, suffix)
}

fn pick<R: Rng>(rng: &mut R, choices: &[&str]) -> String {
    choices.choose(rng).copied().unwrap_or_default().to_string()
}
