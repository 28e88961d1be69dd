//! Crate version information

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the crate version
pub fn get_version() -> &'static str {
    VERSION
}

/// Version line shown by `ankarakart --version`, including the default
/// app version the client reports to the backend
pub fn get_detailed_version() -> String {
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");

    format!(
        "{} ({}, app {})",
        get_version(),
        git_hash,
        crate::config::settings::DEFAULT_APP_VERSION
    )
}
