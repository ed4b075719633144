//! Lenient timestamp parsing for tracker date fields.
//!
//! Trackers export start/finish dates in a handful of shapes. A value that
//! matches none of them is reported as [`MalformedTaskError::Timestamp`] and
//! the field is treated as absent, so one bad record never fails a batch.
//!
//! Offsets are dropped: a timestamp keeps the wall-clock time it was written
//! with and is stored as that time in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::Time;

/// Offset-aware layouts, tried after RFC 3339.
const OFFSET_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.3f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Naive date-time layouts, interpreted as UTC.
const NAIVE_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Date-only layout, interpreted as midnight UTC.
const DATE_LAYOUT: &str = "%Y-%m-%d";

/// A task record whose fields cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedTaskError {
    /// A date field matched none of the accepted layouts
    #[error("unrecognized timestamp: {0:?}")]
    Timestamp(String),

    /// The record itself could not be decoded
    #[error("invalid task record: {0}")]
    Record(String),
}

/// Parse a tracker timestamp.
pub fn parse_timestamp(raw: &str) -> Result<Time, MalformedTaskError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local().and_utc());
    }

    for layout in OFFSET_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(s, layout) {
            return Ok(dt.naive_local().and_utc());
        }
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, DATE_LAYOUT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| MalformedTaskError::Timestamp(raw.to_string()))
}

/// Serde adapter for optional date fields.
///
/// Accepts a missing field, `null`, an empty string or any layout understood
/// by [`parse_timestamp`]. Unparseable values are logged and become `None`.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<Time>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    match parse_timestamp(&raw) {
        Ok(time) => Ok(Some(time)),
        Err(e) => {
            warn!("Ignoring task date: {}", e);
            Ok(None)
        }
    }
}
