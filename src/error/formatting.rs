//! Error formatting utilities
//!
//! Renders errors with their cause chain for terminal output and as
//! structured JSON for log records.

use crate::Error;
use std::error::Error as StdError;

/// Format error for display
///
/// Appends nested error causes that are not already part of the message.
pub fn format_error(error: &Error) -> String {
    let formatted = match error {
        Error::Auth { reason, endpoint } => match endpoint {
            Some(endpoint) => format!("Authorization failed at {}: {}", endpoint, reason),
            None => format!("Authorization failed: {}", reason),
        },

        Error::Protocol { reason, context } => match context {
            Some(context) => format!("Malformed {} response: {}", context, reason),
            None => format!("Malformed response: {}", reason),
        },

        Error::Network { message, status } => match status {
            Some(code) => format!("Network error (HTTP {}): {}", code, message),
            None => format!("Network error: {}", message),
        },

        Error::Validation {
            field,
            message,
            value,
        } => match value {
            Some(val) => format!(
                "Validation failed for {} (value: '{}'): {}",
                field, val, message
            ),
            None => format!("Validation failed for {}: {}", field, message),
        },

        _ => error.to_string(),
    };

    let mut result = formatted;
    let mut source = error.source();

    while let Some(cause) = source {
        if !result.contains(&cause.to_string()) {
            result = format!("{} (caused by {})", result, cause);
        }
        source = cause.source();
    }

    result
}

/// Format error for logging with structured data
pub fn format_error_for_logging(error: &Error) -> serde_json::Value {
    let mut log_data = serde_json::json!({
        "message": format_error(error),
        "category": error.category(),
        "retryable": error.is_retryable(),
    });

    match error {
        Error::Auth {
            endpoint: Some(endpoint),
            ..
        } => {
            log_data["endpoint"] = serde_json::Value::String(endpoint.clone());
        }
        Error::Protocol {
            context: Some(context),
            ..
        } => {
            log_data["function"] = serde_json::Value::String(context.clone());
        }
        Error::Rejected { function, .. } => {
            log_data["function"] = serde_json::Value::String(function.clone());
        }
        Error::Network {
            status: Some(code), ..
        } => {
            log_data["status"] = serde_json::Value::Number((*code).into());
        }
        _ => {}
    }

    log_data
}
