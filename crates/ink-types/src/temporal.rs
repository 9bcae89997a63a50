//! Timestamp encoding shared by posts and comments.
//!
//! Records carry their creation time as ISO-8601 text with millisecond
//! precision and a `Z` suffix (`2024-03-09T14:05:00.000Z`). Parsing accepts
//! any RFC 3339 offset and normalizes to UTC.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::TypeError;

/// Format a timestamp the way it is persisted.
pub fn format_iso(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a persisted timestamp.
pub fn parse_iso(text: &str) -> Result<DateTime<Utc>, TypeError> {
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| TypeError::InvalidTimestamp(format!("{text:?}: {e}")))
}

/// Serde adapter for `DateTime<Utc>` fields stored as ISO-8601 text.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        at: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_iso(&text).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional text stored as `""` when absent.
///
/// Missing fields and `null` also read back as `None`.
pub mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}
