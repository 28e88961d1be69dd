//! Normalized records returned to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current balance of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBalance {
    /// Card number
    pub card_number: String,
    /// When the backend last updated the balance
    pub last_updated: DateTime<Utc>,
    /// Balance, kept as the decimal string the backend sent
    pub credit: String,
    /// Backend result code
    pub result: String,
    /// Translated status message
    pub message: String,
}

/// One tap from the card's usage history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUsage {
    pub card_number: String,
    pub card_back_number: String,
    pub date: DateTime<Utc>,
    pub operation: String,
    pub car_type: String,
    /// Present for buses and any ride with a vehicle id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_number: Option<String>,
    /// Present alongside `car_number`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_line: Option<String>,
    pub credit_spent: String,
    pub credit_remaining: String,
}

/// Shape of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    /// Translated, UTC-timestamped records
    #[default]
    Normalized,
    /// Rows exactly as the backend sent them
    Raw,
}

/// Query result in the requested [`RecordFormat`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput<T> {
    Normalized(T),
    Raw(serde_json::Value),
}

impl<T> QueryOutput<T> {
    /// The normalized record, if this output is normalized
    pub fn normalized(self) -> Option<T> {
        match self {
            QueryOutput::Normalized(value) => Some(value),
            QueryOutput::Raw(_) => None,
        }
    }

    /// The raw rows, if this output is raw
    pub fn raw(self) -> Option<serde_json::Value> {
        match self {
            QueryOutput::Normalized(_) => None,
            QueryOutput::Raw(value) => Some(value),
        }
    }
}
