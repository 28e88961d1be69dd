//! Error classification for the AnkaraKart client
//!
//! Every failure surfaces as one [`Error`] variant. Nothing in the library
//! retries or swallows errors; [`Error::is_retryable`] is only a hint for
//! callers that implement their own retry policy.

use thiserror::Error;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input validation errors (card number, configuration values)
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Error message describing the validation failure
        message: String,
        /// The invalid value that caused the validation to fail
        value: Option<String>,
    },

    /// Handshake failures
    #[error("Authorization failed: {reason}")]
    Auth {
        /// The reason why the handshake failed
        reason: String,
        /// The handshake step that failed (`Connect` or `Start`)
        endpoint: Option<String>,
    },

    /// The backend reported the card as invalid
    #[error("Card {card_id} is invalid")]
    CardInvalid {
        /// The queried card number
        card_id: String,
    },

    /// Malformed or unexpected response bodies
    #[error("Protocol error: {reason}")]
    Protocol {
        /// What was wrong with the response
        reason: String,
        /// The backend function whose response was being decoded
        context: Option<String>,
    },

    /// A data query came back with a negative status flag
    #[error("Backend rejected {function}: {message}")]
    Rejected {
        /// The backend function (`FNC`) that was called
        function: String,
        /// The message returned alongside the status flag
        message: String,
    },

    /// Non-success HTTP responses
    #[error("Network error: {message}")]
    Network {
        /// Error message describing the network issue
        message: String,
        /// HTTP status code, when the server answered at all
        status: Option<u16>,
    },

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Proxy configuration errors
    #[error("Proxy error with config '{config}': {message}")]
    Proxy {
        /// The proxy configuration that caused the error
        config: String,
        /// Error message describing the proxy issue
        message: String,
    },

    /// Identity store errors
    #[error("Identity store error during {operation}: {details}")]
    Store {
        /// The store operation that failed
        operation: String,
        /// Detailed error description
        details: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error carrying the offending value
    pub fn validation_with_value<S: Into<String>>(field: S, message: S, value: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            value: Some(value.into()),
        }
    }

    /// Create a handshake error for the given step
    pub fn auth<S: Into<String>>(reason: S, endpoint: S) -> Self {
        Self::Auth {
            reason: reason.into(),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create an invalid card error
    pub fn card_invalid(card_id: impl Into<String>) -> Self {
        Self::CardInvalid {
            card_id: card_id.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol<S: Into<String>>(reason: S) -> Self {
        Self::Protocol {
            reason: reason.into(),
            context: None,
        }
    }

    /// Create a protocol error attributed to a backend function
    pub fn protocol_in<S: Into<String>>(reason: S, context: S) -> Self {
        Self::Protocol {
            reason: reason.into(),
            context: Some(context.into()),
        }
    }

    /// Attribute a protocol error to a backend function if it has no context yet
    pub fn in_function(self, function: &str) -> Self {
        match self {
            Self::Protocol {
                reason,
                context: None,
            } => Self::Protocol {
                reason,
                context: Some(function.to_string()),
            },
            other => other,
        }
    }

    /// Create a rejected query error
    pub fn rejected<S: Into<String>>(function: S, message: S) -> Self {
        Self::Rejected {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Create a network error for an HTTP status
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a proxy error
    pub fn proxy<S: Into<String>>(config: S, message: S) -> Self {
        Self::Proxy {
            config: config.into(),
            message: message.into(),
        }
    }

    /// Create an identity store error
    pub fn store<S: Into<String>>(operation: S, details: S) -> Self {
        Self::Store {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Network { status, .. } => status.is_none_or(|code| code >= 500),
            Error::Auth { .. } => true,
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Http(..) => "http",
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Io(..) => "io",
            Error::Validation { .. } => "validation",
            Error::Auth { .. } => "auth",
            Error::CardInvalid { .. } => "card_invalid",
            Error::Protocol { .. } => "protocol",
            Error::Rejected { .. } => "rejected",
            Error::Network { .. } => "network",
            Error::Config { .. } => "config",
            Error::Proxy { .. } => "proxy",
            Error::Store { .. } => "store",
        }
    }
}
