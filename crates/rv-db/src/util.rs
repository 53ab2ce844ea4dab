use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
    #[error("invalid stored id: {value}")]
    InvalidId { value: String },
}

/// Fixed-width UTC form so that text ordering matches time ordering.
pub fn to_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn from_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DbError::InvalidTimestamp {
            value: value.to_string(),
        })
}

pub fn decode_id<T, E>(value: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> Result<T, DbError> {
    parse(value).map_err(|_| DbError::InvalidId {
        value: value.to_string(),
    })
}

pub fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(to_timestamp(&whole), "2024-01-02T03:04:05.000000Z");
        assert_eq!(from_timestamp(&to_timestamp(&whole)).unwrap(), whole);
    }

    #[test]
    fn rejects_bad_timestamp() {
        assert!(from_timestamp("yesterday").is_err());
    }
}
