//! HTTP transport and proxy support
//!
//! The session and query layers only talk to a [`BackendTransport`]; the
//! reqwest-backed [`HttpTransport`] is the production implementation.

use crate::{Result, config::Settings, session::request::BackendRequest};
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::{debug, error};

/// Sends a built request and returns the raw response body
#[async_trait::async_trait]
pub trait BackendTransport: Send + Sync {
    /// POST the request; non-success statuses are errors
    async fn send(&self, request: &BackendRequest) -> Result<Vec<u8>>;
}

/// Proxy and TLS options for the HTTP client
#[derive(Debug, Clone)]
pub struct ProxySpec {
    /// Proxy URL
    pub proxy_url: Option<String>,
    /// Disable TLS verification
    pub disable_tls_verification: bool,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl Default for ProxySpec {
    fn default() -> Self {
        Self {
            proxy_url: None,
            disable_tls_verification: false,
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ProxySpec {
    /// Derive proxy settings from the network section
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            proxy_url: settings.get_proxy_url(),
            disable_tls_verification: settings.network.disable_tls_verification,
            connect_timeout: Duration::from_secs(settings.network.connect_timeout),
            request_timeout: Duration::from_secs(settings.network.request_timeout),
        }
    }
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given proxy configuration
    pub fn new(proxy_spec: &ProxySpec) -> Result<Self> {
        let mut client_builder = Client::builder()
            .connect_timeout(proxy_spec.connect_timeout)
            .timeout(proxy_spec.request_timeout);

        if let Some(proxy_url) = &proxy_spec.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                crate::Error::proxy(proxy_url, &format!("Invalid proxy URL: {}", e))
            })?;
            client_builder = client_builder.proxy(proxy);
        }

        if proxy_spec.disable_tls_verification {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            crate::Error::proxy(
                "client_builder",
                &format!("Failed to create HTTP client: {}", e),
            )
        })?;

        Ok(Self { client })
    }

    /// Create a transport from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&ProxySpec::from_settings(settings))
    }
}

#[async_trait::async_trait]
impl BackendTransport for HttpTransport {
    async fn send(&self, request: &BackendRequest) -> Result<Vec<u8>> {
        let mut builder = self.client.post(request.url.clone());

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            error!("{} request to {} failed: {}", request.function, request.url, e);
            crate::Error::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("{} returned HTTP status {}", request.function, status);
            return Err(crate::Error::http_status(
                status.as_u16(),
                format!("{} returned HTTP {}", request.function, status),
            ));
        }

        let body = response.bytes().await?;
        debug!("{} returned {} bytes", request.function, body.len());

        Ok(body.to_vec())
    }
}
