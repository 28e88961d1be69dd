//! Card queries against an authorized session

pub mod client;
pub mod normalize;

pub use client::{CardClient, CardClientGeneric, validate_card_id};
