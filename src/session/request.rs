//! Construction of backend requests
//!
//! Every call is an HTTP POST whose query string carries the session nonce and
//! the device identity, mimicking the official Android app.

use crate::{Result, session::DeviceIdentity};
use std::net::Ipv4Addr;
use url::Url;

/// Path shared by every endpoint below the host
const BASE_PATH: &str = "mbl/android";

/// Backend function, sent as the `FNC` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// First handshake step, against the primary host
    Connect,
    /// Second handshake step, against the secondary host
    Start,
    /// Card balance query
    CardBalance,
    /// Card usage history query
    CardUsage,
}

impl Function {
    /// Value of the `FNC` parameter
    pub fn name(&self) -> &'static str {
        match self {
            Function::Connect => "Connect",
            Function::Start => "Start",
            Function::CardBalance => "AnkaraKartBakiye",
            Function::CardUsage => "AnkaraKartKullanim",
        }
    }

    /// Script the function is served by
    pub fn endpoint(&self) -> &'static str {
        if self.is_handshake() {
            "connect.asp"
        } else {
            "action.asp"
        }
    }

    /// Whether this is one of the two handshake steps
    pub fn is_handshake(&self) -> bool {
        matches!(self, Function::Connect | Function::Start)
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully built request, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    /// Function being called
    pub function: Function,
    /// Endpoint URL including the query string
    pub url: Url,
    /// Headers in the order the app sends them
    pub headers: Vec<(String, String)>,
    /// Form-encoded body, if the function takes one
    pub body: Option<String>,
}

impl BackendRequest {
    /// Build a request for `function` against `host`.
    ///
    /// `Connect` always sends `UID=<guid>&UPS=TRUE` and `Start` sends no body;
    /// `form` is only used for query functions.
    pub fn build(
        host: &str,
        function: Function,
        identity: &DeviceIdentity,
        language: &str,
        form: &[(&str, &str)],
    ) -> Result<Self> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}",
            base_url(host),
            BASE_PATH,
            function.endpoint()
        ))?;

        url.query_pairs_mut()
            .append_pair("SID", &session_nonce())
            .append_pair("VER", &identity.app_version)
            .append_pair("LAN", language)
            .append_pair("UID", &identity.device_guid)
            .append_pair("FNC", function.name());

        let body = match function {
            Function::Connect => Some(encode_form(&[
                ("UID", identity.device_guid.as_str()),
                ("UPS", "TRUE"),
            ])),
            Function::Start => None,
            Function::CardBalance | Function::CardUsage if form.is_empty() => None,
            Function::CardBalance | Function::CardUsage => Some(encode_form(form)),
        };

        let headers = vec![
            ("User-Agent".to_string(), identity.user_agent()),
            ("Connection".to_string(), "keep-alive".to_string()),
            (
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ),
        ];

        tracing::debug!("Built {} request: {}", function, url);

        Ok(Self {
            function,
            url,
            headers,
            body,
        })
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Look up a query string parameter
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Bare IPv4 literals get an `http://` scheme; anything else is already a base URL
fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.parse::<Ipv4Addr>().is_ok() {
        format!("http://{}", host)
    } else {
        host.to_string()
    }
}

/// Random decimal fraction, as produced by the app for `SID`
fn session_nonce() -> String {
    rand::random::<f64>().to_string()
}

fn encode_form(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
