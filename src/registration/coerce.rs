use chrono::{NaiveDate, NaiveDateTime};

use super::error::{RegistrationError, TemporalField};
use crate::storage::RecordId;

/// Minute precision instant, e.g. `2024-05-01T10:30`.
pub const INSTANT_LAYOUT: &str = "%Y-%m-%dT%H:%M";
/// Calendar date, e.g. `2024-05-01`.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";
/// What the form sends when no coordinates were picked.
pub const EMPTY_POINT: &str = "POINT( )";

// NOTE: zero doubles as "omitted"; an id space that starts at 0 cannot be referenced.
pub fn non_zero_ref(raw: u64) -> Option<RecordId> {
    (raw != 0).then_some(raw)
}

fn invalid(
    field: TemporalField,
    value: &str,
    layout: &'static str,
    source: Option<chrono::ParseError>,
) -> RegistrationError {
    RegistrationError::InvalidTemporal {
        field,
        value: value.to_string(),
        layout,
        source,
    }
}

// chrono accepts one-digit months, days, hours and minutes; the wire layouts are zero padded.
pub fn parse_instant(field: TemporalField, value: &str) -> Result<NaiveDateTime, RegistrationError> {
    let parsed = NaiveDateTime::parse_from_str(value, INSTANT_LAYOUT)
        .map_err(|source| invalid(field, value, INSTANT_LAYOUT, Some(source)))?;
    if parsed.format(INSTANT_LAYOUT).to_string() != value {
        return Err(invalid(field, value, INSTANT_LAYOUT, None));
    }
    Ok(parsed)
}

pub fn parse_date(field: TemporalField, value: &str) -> Result<NaiveDate, RegistrationError> {
    let parsed = NaiveDate::parse_from_str(value, DATE_LAYOUT)
        .map_err(|source| invalid(field, value, DATE_LAYOUT, Some(source)))?;
    if parsed.format(DATE_LAYOUT).to_string() != value {
        return Err(invalid(field, value, DATE_LAYOUT, None));
    }
    Ok(parsed)
}

pub fn coerce_coordinates(raw: &str) -> Option<String> {
    (raw != EMPTY_POINT).then(|| raw.to_string())
}
