//! Card balance and usage queries
//!
//! Each query validates the card number, makes sure the session is fresh,
//! sends one request to the secondary host and decodes the single-quoted
//! response into normalized records, or hands the rows back untouched in
//! [`RecordFormat::Raw`].

use crate::{
    Error, Result,
    config::Settings,
    query::normalize,
    session::{
        DeviceIdentity, SessionManagerGeneric,
        network::{BackendTransport, HttpTransport},
        request::Function,
    },
    types::{
        CardBalance, CardUsage, QueryOutput, RawCardBalance, RawCardUsage, RecordFormat,
        wire::{Envelope, QueryData, RESULT_CARD_INVALID, is_affirmative},
    },
    utils::codec,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Length of an AnkaraKart number
pub const CARD_ID_LENGTH: usize = 16;

/// Convenience type alias for CardClient with the HTTP transport
pub type CardClient = CardClientGeneric<HttpTransport>;

/// Client for the card queries
#[derive(Debug)]
pub struct CardClientGeneric<T: BackendTransport = HttpTransport> {
    session: Arc<SessionManagerGeneric<T>>,
}

impl CardClientGeneric<HttpTransport> {
    /// Create a client talking HTTP with the given identity.
    ///
    /// ```no_run
    /// use ankarakart::{CardClient, RecordFormat, Settings};
    /// use ankarakart::session::DeviceIdentity;
    ///
    /// # tokio_test::block_on(async {
    /// let client = CardClient::new(Settings::default(), DeviceIdentity::default())?;
    /// let balance = client
    ///     .get_card_balance("1234567890123456", RecordFormat::Normalized)
    ///     .await?;
    /// println!("{}", serde_json::to_string_pretty(&balance)?);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// # });
    /// ```
    pub fn new(settings: Settings, identity: DeviceIdentity) -> Result<Self> {
        let session = SessionManagerGeneric::new(settings, identity)?;
        Ok(Self::from_session(Arc::new(session)))
    }
}

impl<T: BackendTransport> CardClientGeneric<T> {
    /// Create a client on top of an existing session manager
    pub fn from_session(session: Arc<SessionManagerGeneric<T>>) -> Self {
        Self { session }
    }

    /// Session manager backing this client
    pub fn session(&self) -> &SessionManagerGeneric<T> {
        &self.session
    }

    /// Fetch the current balance of a card
    pub async fn get_card_balance(
        &self,
        card_id: &str,
        format: RecordFormat,
    ) -> Result<QueryOutput<CardBalance>> {
        let rows = self.query(Function::CardBalance, card_id).await?;

        let row = rows.into_iter().next().ok_or_else(|| {
            Error::protocol_in("Balance table is empty", Function::CardBalance.name())
        })?;

        if row.get("result").and_then(Value::as_str) == Some(RESULT_CARD_INVALID) {
            info!("Backend reports card {} as invalid", card_id);
            return Err(Error::card_invalid(card_id));
        }

        match format {
            RecordFormat::Raw => Ok(QueryOutput::Raw(row)),
            RecordFormat::Normalized => {
                let raw: RawCardBalance = codec::from_value(row)
                    .map_err(|e| e.in_function(Function::CardBalance.name()))?;
                let balance = normalize::normalize_balance(&raw)
                    .map_err(|e| e.in_function(Function::CardBalance.name()))?;
                Ok(QueryOutput::Normalized(balance))
            }
        }
    }

    /// Fetch the recent usage history of a card, in server order
    pub async fn get_card_usage(
        &self,
        card_id: &str,
        format: RecordFormat,
    ) -> Result<QueryOutput<Vec<CardUsage>>> {
        let rows = self.query(Function::CardUsage, card_id).await?;
        debug!("Card {} has {} usage rows", card_id, rows.len());

        match format {
            RecordFormat::Raw => Ok(QueryOutput::Raw(Value::Array(rows))),
            RecordFormat::Normalized => {
                let raw: Vec<RawCardUsage> = codec::from_value(Value::Array(rows))
                    .map_err(|e| e.in_function(Function::CardUsage.name()))?;
                let usages = normalize::normalize_usages(&raw)
                    .map_err(|e| e.in_function(Function::CardUsage.name()))?;
                Ok(QueryOutput::Normalized(usages))
            }
        }
    }

    /// Validate, authorize, send and unwrap the table of a card query
    async fn query(&self, function: Function, card_id: &str) -> Result<Vec<Value>> {
        validate_card_id(card_id)?;

        let host = self.session.ensure_authorized().await?;
        debug!("Querying {} for card {} on {}", function, card_id, host);

        let body = self
            .session
            .call(&host, function, &[("KART", card_id)])
            .await?;

        let data: QueryData<Value> = codec::parse::<Envelope<QueryData<Value>>>(&body)
            .map_err(|e| e.in_function(function.name()))?
            .into_first(function.name())?;

        if !is_affirmative(&data.status) {
            return Err(Error::rejected(function.name().to_string(), data.message));
        }

        Ok(data.table)
    }
}

/// Check that a card number is exactly 16 ASCII digits
pub fn validate_card_id(card_id: &str) -> Result<()> {
    if card_id.len() == CARD_ID_LENGTH && card_id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(Error::validation_with_value(
            "card_id",
            "Card number must be exactly 16 digits",
            card_id,
        ))
    }
}
