//! Mapping of backend rows to normalized records

use crate::{
    Result,
    types::{CardBalance, CardUsage, RawCardBalance, RawCardUsage},
    utils::{local_time, vocabulary},
};

/// Normalize a balance row: UTC timestamp, translated message
pub fn normalize_balance(raw: &RawCardBalance) -> Result<CardBalance> {
    Ok(CardBalance {
        card_number: raw.kart.clone(),
        last_updated: local_time::parse_balance_time(&raw.tarih)?,
        credit: raw.bakiye.clone(),
        result: raw.result.clone(),
        message: vocabulary::translate(&raw.message),
    })
}

/// Normalize a usage row.
///
/// Vehicle id and line are only kept for buses or when the row names a
/// vehicle; rail rides carry neither.
pub fn normalize_usage(raw: &RawCardUsage) -> Result<CardUsage> {
    let car_type = vocabulary::translate(&raw.arac);
    let has_vehicle = car_type == vocabulary::BUS || !raw.arac_no.is_empty();

    Ok(CardUsage {
        card_number: raw.kart_no.clone(),
        card_back_number: raw.no_kart.clone(),
        date: local_time::parse_usage_time(&raw.tarih)?,
        operation: vocabulary::translate(&raw.islem),
        car_number: has_vehicle.then(|| raw.arac_no.clone()),
        car_line: has_vehicle.then(|| raw.hat.clone()),
        car_type,
        credit_spent: raw.dusen.clone(),
        credit_remaining: raw.kalan.clone(),
    })
}

/// Normalize usage rows, keeping server order
pub fn normalize_usages(rows: &[RawCardUsage]) -> Result<Vec<CardUsage>> {
    rows.iter().map(normalize_usage).collect()
}
