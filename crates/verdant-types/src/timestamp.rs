//! Wire timestamps.
//!
//! Written as RFC 3339 in UTC. Read as any ISO-8601 date-time; values without
//! an offset (`2024-03-09T14:30:00.000`, as local-time clients emit them) are
//! taken as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|ndt| ndt.and_utc()))
        .ok()
}

fn parse_field<E: serde::de::Error>(raw: &str) -> Result<DateTime<Utc>, E> {
    parse(raw).ok_or_else(|| E::custom(format!("invalid ISO-8601 timestamp '{}'", raw)))
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    value.serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_field(&raw)
}

/// Same rules for optional fields; `null` reads as `None`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_field(&raw).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn test_parses_offset_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap();

        assert_eq!(parse("2024-03-09T14:30:00Z"), Some(expected));
        assert_eq!(parse("2024-03-09T16:30:00+02:00"), Some(expected));
        assert_eq!(parse("2024-03-09T14:30:00"), Some(expected));
        assert_eq!(
            parse("2024-03-09T14:30:00.250"),
            Some(expected + TimeDelta::milliseconds(250))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse("yesterday"), None);
        assert_eq!(parse("2024-03-09"), None);
        assert_eq!(parse(""), None);
    }
}
