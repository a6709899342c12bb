pub mod analytics;
pub mod auth;
pub mod conversations;
pub mod media;
pub mod middleware;
pub mod orders;
pub mod products;
pub mod users;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Storage format for timestamps, matching SQLite's own datetime() output so
/// rows written by either side compare and sort identically.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp, accepting RFC 3339 as a fallback for rows
/// imported from elsewhere. Corrupt values degrade to the epoch with a
/// warning rather than failing the whole listing.
pub(crate) fn parse_timestamp(raw: &str, context: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|ndt| ndt.and_utc())
        .or_else(|_| raw.parse::<DateTime<Utc>>())
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {}: {}", raw, context, e);
            DateTime::default()
        })
}

pub(crate) fn parse_uuid(raw: &str, context: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt id '{}' on {}: {}", raw, context, e);
        Uuid::default()
    })
}
