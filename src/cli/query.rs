//! Query mode CLI logic
//!
//! Loads configuration and the stored device identity, runs one card query
//! and prints the result as JSON on stdout.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    CardClient, Settings,
    config::{CliOverrides, ConfigLoader},
    error::format_error,
    query::CardClientGeneric,
    session::{BackendTransport, DeviceIdentity},
    types::RecordFormat,
    utils::{
        IdentityStore,
        identity_store::default_identity_path,
        version,
    },
};

/// Which query to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryKind {
    #[default]
    Balance,
    Usage,
}

/// Arguments for query mode
#[derive(Debug, Clone, Default)]
pub struct QueryArgs {
    pub kind: QueryKind,
    pub card: String,
    pub raw: bool,
    pub config: Option<String>,
    pub proxy: Option<String>,
    pub identity_file: Option<String>,
    pub no_save_identity: bool,
    pub disable_tls_verification: bool,
    pub verbose: bool,
}

impl QueryArgs {
    /// Flags that override configured values
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            proxy: self.proxy.clone(),
            disable_tls_verification: self.disable_tls_verification,
            identity_file: self.identity_file.as_ref().map(PathBuf::from),
            no_save_identity: self.no_save_identity,
            verbose: self.verbose,
        }
    }
}

/// Run query mode with the given arguments
pub async fn run_query_mode(args: QueryArgs) -> Result<()> {
    let config_loader = ConfigLoader::with_overrides(args.overrides());
    let config_path = ConfigLoader::resolve_path(args.config.as_deref().map(Path::new));

    let settings = match config_loader.load(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            std::process::exit(1);
        }
    };

    init_logging(&settings);
    debug!("ankarakart {}", version::get_detailed_version());

    let store = IdentityStore::new(identity_path(&settings)?);
    let stored = store.load().await.unwrap_or_else(|e| {
        warn!("Failed to load identity: {}. Generating a new one.", e);
        None
    });
    let identity = DeviceIdentity::resolve(&settings.device, stored);
    debug!(
        "Using device {} ({} {}, app {})",
        identity.device_guid, identity.phone_model, identity.os_version, identity.app_version
    );

    let save_identity = settings.storage.save_identity;
    let client = match CardClient::new(settings, identity) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            std::process::exit(1);
        }
    };

    let format = if args.raw {
        RecordFormat::Raw
    } else {
        RecordFormat::Normalized
    };
    let kind = args.kind;
    let result = execute(&client, kind, &args.card, format).await;

    if save_identity {
        let identity = client.session().identity().await;
        if let Err(e) = store.save(&identity).await {
            warn!("Failed to save identity: {}", e);
        }
    }

    match result {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            info!("{:?} query for card {} succeeded", kind, args.card);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e));
            std::process::exit(1);
        }
    }
}

/// Run one query and render its result as JSON
pub async fn execute<T: BackendTransport>(
    client: &CardClientGeneric<T>,
    kind: QueryKind,
    card: &str,
    format: RecordFormat,
) -> crate::Result<serde_json::Value> {
    let value = match kind {
        QueryKind::Balance => {
            serde_json::to_value(client.get_card_balance(card, format).await?)?
        }
        QueryKind::Usage => serde_json::to_value(client.get_card_usage(card, format).await?)?,
    };
    Ok(value)
}

fn identity_path(settings: &Settings) -> Result<PathBuf> {
    match &settings.storage.identity_file {
        Some(path) => Ok(path.clone()),
        None => default_identity_path(),
    }
}

/// Logging goes to stderr so stdout stays JSON-only.
///
/// Precedence: `--verbose` or `VERBOSE`, then `RUST_LOG`, then `logging.level`.
fn init_logging(settings: &Settings) {
    let env_filter = if settings.logging.verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(&settings.logging.level)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
