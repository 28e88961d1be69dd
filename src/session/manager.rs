//! # Session Management
//!
//! The backend only serves queries to a client that recently completed a
//! two-step handshake:
//!
//! 1. `Connect` against the primary host announces the device. The reply
//!    carries the service flag, the app version the server expects, and the
//!    secondary host the rest of the session talks to.
//! 2. `Start` against the secondary host opens the session.
//!
//! A session is good for a fixed window (60 seconds by default). The
//! [`SessionManager`] keeps the time of the last successful handshake and
//! repeats the handshake whenever a caller needs the session after the window
//! has passed.
//!
//! The freshness check and the handshake are not serialized: two callers that
//! both see a stale session each run their own handshake, and the last one to
//! finish wins.
//!
//! ## Examples
//!
//! ```no_run
//! use ankarakart::config::Settings;
//! use ankarakart::session::{DeviceIdentity, SessionManager};
//!
//! # tokio_test::block_on(async {
//! let settings = Settings::default();
//! let identity = DeviceIdentity::generate("3.0.6");
//! let manager = SessionManager::new(settings, identity)?;
//!
//! let host = manager.ensure_authorized().await?;
//! println!("Querying {}", host);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

use crate::{
    Error, Result,
    config::Settings,
    error::format_error_for_logging,
    session::{
        DeviceIdentity,
        network::{BackendTransport, HttpTransport},
        request::{BackendRequest, Function},
    },
    types::wire::{ConnectData, Envelope, StartData, is_affirmative},
    utils::codec,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Convenience type alias for SessionManager with the HTTP transport
pub type SessionManager = SessionManagerGeneric<HttpTransport>;

/// Handshake state shared by every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Host the `Connect` step is sent to
    pub primary_host: String,
    /// Host named by the last successful handshake
    pub secondary_host: Option<String>,
    /// Monotonic time of the last successful handshake
    pub last_authorized_at: Option<Instant>,
    /// Wall-clock time of the last successful handshake
    pub authorized_at: Option<DateTime<Utc>>,
    /// Session window
    pub ttl: Duration,
}

impl SessionState {
    /// Fresh state with no handshake yet
    pub fn new(primary_host: impl Into<String>, ttl: Duration) -> Self {
        Self {
            primary_host: primary_host.into(),
            secondary_host: None,
            last_authorized_at: None,
            authorized_at: None,
            ttl,
        }
    }

    /// Whether a query may be sent at `now` without a new handshake
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.secondary_host.is_some()
            && self
                .last_authorized_at
                .is_some_and(|at| now.saturating_duration_since(at) < self.ttl)
    }

    fn mark_stale(&mut self) {
        self.last_authorized_at = None;
        self.authorized_at = None;
    }
}

/// Owns the device identity and the handshake window
#[derive(Debug)]
pub struct SessionManagerGeneric<T: BackendTransport = HttpTransport> {
    /// Configuration settings
    settings: Arc<Settings>,
    /// Transport used for every backend call
    transport: Arc<T>,
    /// Identity presented to the backend; the app version may be corrected
    identity: RwLock<DeviceIdentity>,
    /// Handshake state
    state: RwLock<SessionState>,
}

impl SessionManagerGeneric<HttpTransport> {
    /// Creates a session manager talking HTTP, configured from `settings`.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built, e.g. for an invalid proxy URL.
    pub fn new(settings: Settings, identity: DeviceIdentity) -> Result<Self> {
        let transport = HttpTransport::from_settings(&settings)?;
        Ok(Self::with_transport(settings, identity, transport))
    }
}

impl<T: BackendTransport> SessionManagerGeneric<T> {
    /// Creates a session manager with a custom transport
    pub fn with_transport(settings: Settings, identity: DeviceIdentity, transport: T) -> Self {
        let state = SessionState::new(
            settings.backend.primary_host.clone(),
            settings.backend.session_ttl(),
        );

        Self {
            settings: Arc::new(settings),
            transport: Arc::new(transport),
            identity: RwLock::new(identity),
            state: RwLock::new(state),
        }
    }

    /// Settings the manager was created with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Transport used for backend calls
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of the identity, including a server-corrected app version
    pub async fn identity(&self) -> DeviceIdentity {
        self.identity.read().await.clone()
    }

    /// Snapshot of the handshake state
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Secondary host of the last successful handshake
    pub async fn secondary_host(&self) -> Option<String> {
        self.state.read().await.secondary_host.clone()
    }

    /// Whether queries can be sent without a new handshake
    pub async fn is_authorized(&self) -> bool {
        self.state.read().await.is_fresh(Instant::now())
    }

    /// Force the next query to run a new handshake
    pub async fn invalidate(&self) {
        debug!("Session invalidated");
        self.state.write().await.mark_stale();
    }

    /// Run the handshake if the session window has passed.
    ///
    /// Returns the secondary host queries must be sent to.
    pub async fn ensure_authorized(&self) -> Result<String> {
        {
            let state = self.state.read().await;
            if state.is_fresh(Instant::now())
                && let Some(host) = &state.secondary_host
            {
                return Ok(host.clone());
            }
        }

        debug!("Session is stale, running handshake");
        self.authorize().await
    }

    /// Run the two-step handshake unconditionally.
    ///
    /// On success the session window restarts and the secondary host is
    /// returned. On failure the session is left stale.
    pub async fn authorize(&self) -> Result<String> {
        match self.handshake().await {
            Ok(secondary) => Ok(secondary),
            Err(e) => {
                warn!(error = %format_error_for_logging(&e), "Handshake failed");
                self.state.write().await.mark_stale();
                Err(e)
            }
        }
    }

    async fn handshake(&self) -> Result<String> {
        let primary = self.state.read().await.primary_host.clone();
        info!("Connecting to primary host {}", primary);

        let body = self.call(&primary, Function::Connect, &[]).await?;
        let connect: ConnectData = decode(&body, Function::Connect)?;

        if !is_affirmative(&connect.status) {
            return Err(Error::auth(
                format!("Connect status is '{}': {}", connect.status, connect.message),
                Function::Connect.name().to_string(),
            ));
        }
        if !is_affirmative(&connect.servis) {
            return Err(Error::auth(
                format!("Service is unavailable (servis '{}')", connect.servis),
                Function::Connect.name().to_string(),
            ));
        }

        self.reconcile_version(&connect.version).await?;

        let server = connect.server.trim();
        let secondary = if server.is_empty() {
            primary.clone()
        } else {
            server.to_string()
        };

        debug!("Starting session on {}", secondary);
        let body = self.call(&secondary, Function::Start, &[]).await?;
        let start: StartData = decode(&body, Function::Start)?;

        if !is_affirmative(&start.status) {
            return Err(Error::auth(
                format!("Start status is '{}': {}", start.status, start.message),
                Function::Start.name().to_string(),
            ));
        }

        {
            let mut state = self.state.write().await;
            state.secondary_host = Some(secondary.clone());
            state.last_authorized_at = Some(Instant::now());
            state.authorized_at = Some(Utc::now());
        }

        info!("Session authorized on {}", secondary);
        Ok(secondary)
    }

    /// Apply the version policy to the server's expected app version
    async fn reconcile_version(&self, server_version: &str) -> Result<()> {
        let server_version = server_version.trim();
        if server_version.is_empty() {
            debug!("Server did not advertise an app version");
            return Ok(());
        }

        let mut identity = self.identity.write().await;
        if identity.app_version == server_version {
            return Ok(());
        }

        if !self.settings.backend.auto_correct_version {
            return Err(Error::auth(
                format!(
                    "Server expects app version {} but client reports {}",
                    server_version, identity.app_version
                ),
                Function::Connect.name().to_string(),
            ));
        }

        warn!(
            "Server expects app version {}, correcting from {}",
            server_version, identity.app_version
        );
        identity.app_version = server_version.to_string();
        Ok(())
    }

    /// Build a request for `function` with the current identity and send it to `host`
    pub async fn call(
        &self,
        host: &str,
        function: Function,
        form: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        let request = {
            let identity = self.identity.read().await;
            BackendRequest::build(
                host,
                function,
                &identity,
                &self.settings.backend.language,
                form,
            )?
        };

        self.transport.send(&request).await
    }
}

fn decode<D: serde::de::DeserializeOwned>(body: &[u8], function: Function) -> Result<D> {
    codec::parse::<Envelope<D>>(body)
        .map_err(|e| e.in_function(function.name()))?
        .into_first(function.name())
}
