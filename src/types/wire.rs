//! Response shapes as the backend sends them
//!
//! Every body is `{"data": [{...}]}` with the interesting object first in
//! `data`. Fields the client does not use are ignored; string fields the
//! backend sometimes leaves out default to empty.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Affirmative value of the `status` and `servis` flags
pub const STATUS_TRUE: &str = "TRUE";

/// Balance `result` code meaning the card is not valid
pub const RESULT_CARD_INVALID: &str = "3";

/// Outer wrapper of every response
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Payload objects; only the first is meaningful
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    /// Take the first payload object, failing when `data` is empty
    pub fn into_first(self, function: &str) -> Result<T> {
        self.data.into_iter().next().ok_or_else(|| {
            Error::protocol_in("Response envelope has no data", function)
        })
    }
}

/// Payload of the `Connect` handshake step
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectData {
    /// Request status flag
    #[serde(default)]
    pub status: String,
    /// Service availability flag
    #[serde(default)]
    pub servis: String,
    /// App version the server expects
    #[serde(default)]
    pub version: String,
    /// Host for the rest of the session; empty means the primary host
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub message: String,
}

/// Payload of the `Start` handshake step
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartData {
    /// Request status flag
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Payload of a data query, rows kept generic so raw mode can pass them through
#[derive(Debug, Clone, Deserialize)]
pub struct QueryData<R> {
    /// Result rows
    #[serde(default = "Vec::new")]
    pub table: Vec<R>,
    /// Request status flag
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Balance row, as sent for `AnkaraKartBakiye`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCardBalance {
    /// Card number
    pub kart: String,
    /// Last update, `DD.MM.YYYY HH:mm:ss` Istanbul time
    pub tarih: String,
    /// Balance as a decimal string
    pub bakiye: String,
    /// Result code
    #[serde(default)]
    pub result: String,
    /// Turkish status message
    #[serde(default)]
    pub message: String,
}

/// Usage row, as sent for `AnkaraKartKullanim`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCardUsage {
    /// Card number
    pub kart_no: String,
    /// Number printed on the back of the card
    #[serde(default)]
    pub no_kart: String,
    /// Tap time, `DD/MM/YYYY HH:mm` Istanbul time
    pub tarih: String,
    /// Vehicle type
    #[serde(default)]
    pub arac: String,
    /// Vehicle id, empty for rail
    #[serde(default)]
    pub arac_no: String,
    /// Line
    #[serde(default)]
    pub hat: String,
    /// Amount charged
    #[serde(default)]
    pub dusen: String,
    /// Balance after the tap
    #[serde(default)]
    pub kalan: String,
    /// Operation kind
    #[serde(default)]
    pub islem: String,
}

/// Whether a status flag is affirmative
pub fn is_affirmative(flag: &str) -> bool {
    flag == STATUS_TRUE
}
