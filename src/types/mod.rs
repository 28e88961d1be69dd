//! Type definitions for backend payloads and query results
//!
//! `wire` mirrors what the backend sends; `record` is what callers get back.

pub mod record;
pub mod wire;

pub use record::{CardBalance, CardUsage, QueryOutput, RecordFormat};
pub use wire::{ConnectData, Envelope, QueryData, RawCardBalance, RawCardUsage, StartData};
