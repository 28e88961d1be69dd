//! Configuration management for the AnkaraKart client
//!
//! This module handles loading and managing configuration settings
//! for the library and the command-line client.

pub mod loader;
pub mod settings;

pub use loader::{CliOverrides, ConfigLoader};
pub use settings::Settings;

/// Serializes tests that read or modify process environment variables
#[cfg(test)]
pub(crate) static ENV_TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
