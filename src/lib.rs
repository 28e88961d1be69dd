//! AnkaraKart client
//!
//! Balance and usage queries for Ankara's AnkaraKart transit card, spoken to
//! the undocumented backend of the EGO Cepte mobile app.
//!
//! # Features
//!
//! - **App impersonation**: requests carry a spoofed device identity
//!   (installation GUID, phone model, Android version, app version)
//! - **Session handling**: the two-step `Connect`/`Start` handshake is repeated
//!   automatically once the session window has passed
//! - **Decoding**: Windows-1254, single-quoted response bodies are turned into
//!   ordinary JSON
//! - **Normalization**: Turkish vocabulary is translated and Istanbul local
//!   timestamps are converted to UTC
//!
//! # Architecture
//!
//! - [`session`]: device identity, request construction, HTTP transport and
//!   the handshake window
//! - [`query`]: card validation, the two card queries and normalization
//! - [`types`]: wire rows and normalized records
//! - [`utils`]: response codec, vocabulary, local time, identity persistence
//! - [`config`] and [`error`]: settings and the error type
//!
//! # Examples
//!
//! ```no_run
//! use ankarakart::{CardClient, RecordFormat, Settings};
//! use ankarakart::session::DeviceIdentity;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CardClient::new(Settings::default(), DeviceIdentity::generate("3.0.6"))?;
//!
//! let usage = client
//!     .get_card_usage("1234567890123456", RecordFormat::Normalized)
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&usage)?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod session;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use query::CardClient;
pub use session::SessionManager;
pub use types::{CardBalance, CardUsage, QueryOutput, RecordFormat};
