//! Timestamp encoding for `prov:startedAtTime` and `prov:endedAtTime`.
//!
//! Callers hand in epoch milliseconds. On the way into a graph the value is
//! rendered as an `xsd:dateTime` in UTC with whole seconds only, so a
//! round-trip through either backend truncates to the second:
//!
//! ```
//! use provo::temporal::{from_xsd_date_time, to_xsd_date_time};
//!
//! let lexical = to_xsd_date_time(1_700_000_000_123).unwrap();
//! assert_eq!(lexical, "2023-11-14T22:13:20Z");
//! assert_eq!(from_xsd_date_time(&lexical).unwrap(), 1_700_000_000_000);
//! ```

use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Utc};
use oxigraph::model::Literal;

use crate::error::{ProvError, ProvResult};
use crate::vocab::XSD_DATE_TIME;

/// Returned by timestamp lookups when the activity carries no such bound.
///
/// `i64::MIN` lies far outside the range chrono can render, so it can never
/// be produced by decoding a stored literal.
pub const ABSENT_TIMESTAMP: i64 = i64::MIN;

/// Render epoch milliseconds as an `xsd:dateTime` lexical form without the
/// sub-second part.
///
/// Only four-digit years (0000 through 9999) are accepted, so everything this
/// writes can be parsed back by [`from_xsd_date_time`].
pub fn to_xsd_date_time(millis: i64) -> ProvResult<String> {
    let out_of_range = || ProvError::InvalidTimestamp {
        value: millis.to_string(),
        message: "outside years 0000 through 9999".into(),
    };
    let instant = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(out_of_range)?;
    if !(0..=9999).contains(&instant.year()) {
        return Err(out_of_range());
    }
    Ok(instant.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Parse an `xsd:dateTime` lexical form into epoch milliseconds.
///
/// Any fractional seconds are dropped. A value without a zone offset is read
/// as UTC.
pub fn from_xsd_date_time(lexical: &str) -> ProvResult<i64> {
    let lexical = lexical.trim();
    let seconds = match DateTime::parse_from_rfc3339(lexical) {
        Ok(dt) => dt.timestamp(),
        Err(rfc_err) => NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc().timestamp())
            .map_err(|_| ProvError::InvalidTimestamp {
                value: lexical.to_string(),
                message: rfc_err.to_string(),
            })?,
    };
    seconds
        .checked_mul(1000)
        .ok_or_else(|| ProvError::InvalidTimestamp {
            value: lexical.to_string(),
            message: "overflows epoch milliseconds".into(),
        })
}

/// Build the typed `xsd:dateTime` literal stored for a timestamp.
pub fn date_time_literal(millis: i64) -> ProvResult<Literal> {
    Ok(Literal::new_typed_literal(to_xsd_date_time(millis)?, XSD_DATE_TIME))
}

/// SPARQL/Turtle spelling of the literal: `"…"^^<xsd:dateTime>`.
pub fn sparql_date_time(millis: i64) -> ProvResult<String> {
    Ok(format!(
        "\"{}\"^^<{}>",
        to_xsd_date_time(millis)?,
        XSD_DATE_TIME.as_str()
    ))
}

/// Whether a literal carries the `xsd:dateTime` datatype.
pub fn is_date_time(literal: &Literal) -> bool {
    literal.datatype() == XSD_DATE_TIME
}
