//! Card issuer local time
//!
//! All timestamps from the backend are wall-clock times in Europe/Istanbul
//! without an offset. They are parsed here and converted to UTC.

use crate::{Error, Result};
use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Europe::Istanbul;

/// Balance timestamps, e.g. `01.02.2020 17:55:00`
pub const BALANCE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Usage timestamps, e.g. `01/02/2020 17:55`
pub const USAGE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Parse an Istanbul wall-clock timestamp with the given format into UTC
pub fn parse_local(value: &str, format: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), format).map_err(|e| {
        Error::protocol(format!("Unparseable timestamp '{}': {}", value, e))
    })?;

    // Ambiguous times (pre-2016 DST fall-back) resolve to the earlier instant
    match Istanbul.from_local_datetime(&naive) {
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => {
            Ok(local.with_timezone(&Utc))
        }
        LocalResult::None => across_gap(naive, value),
    }
}

/// A wall-clock time skipped by a spring-forward transition is read with the
/// offset in force before the gap, which places it just after the gap.
fn across_gap(naive: NaiveDateTime, value: &str) -> Result<DateTime<Utc>> {
    let before_gap = Istanbul
        .from_local_datetime(&(naive - TimeDelta::hours(3)))
        .earliest()
        .ok_or_else(|| {
            Error::protocol(format!(
                "Timestamp '{}' does not exist in Europe/Istanbul",
                value
            ))
        })?;
    let offset = before_gap.offset().fix().local_minus_utc();

    Ok(Utc.from_utc_datetime(&(naive - TimeDelta::seconds(i64::from(offset)))))
}

/// Parse a balance record timestamp
pub fn parse_balance_time(value: &str) -> Result<DateTime<Utc>> {
    parse_local(value, BALANCE_FORMAT)
}

/// Parse a usage record timestamp
pub fn parse_usage_time(value: &str) -> Result<DateTime<Utc>> {
    parse_local(value, USAGE_FORMAT)
}
