//! Column codecs shared by the repositories.
//!
//! Ids and choice enums are stored as TEXT in their `Display` form and read
//! back through `FromStr`; timestamps are fixed-width RFC 3339 TEXT so that
//! `ORDER BY` on them is chronological.

use std::str::FromStr;

use chrono::SecondsFormat;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use pawhub_app::ports::Paged;
use pawhub_domain::time::{self, Timestamp};

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

/// Read a TEXT column and parse it.
pub(crate) fn parsed<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(decode_error)
}

/// Read a nullable TEXT column and parse it when present.
pub(crate) fn parsed_opt<T>(row: &SqliteRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| s.parse()).transpose().map_err(decode_error)
}

pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    time::parse(&raw).map_err(decode_error)
}

pub(crate) fn timestamp_opt(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Timestamp>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| time::parse(&s))
        .transpose()
        .map_err(decode_error)
}

/// One listing window from its rows and the `COUNT(*)` of the whole listing.
pub(crate) fn paged<T>(count: i64, items: Vec<T>) -> Paged<T> {
    Paged {
        count: u64::try_from(count).unwrap_or_default(),
        items,
    }
}

pub(crate) fn encode_time(value: &Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}
