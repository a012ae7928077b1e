//! Wire encoding of the task endpoints' sentinel values.
//!
//! The remote API encodes "unassigned" as the integer `0` (not a real user
//! id) and "no due date" as the empty string. The domain model uses `Option`
//! for both; these serde modules translate at the boundary so the wire
//! contract stays unchanged.

/// Sentinel the API uses for a task without an assignee.
pub(crate) const UNASSIGNED_ID: u64 = 0;

pub(crate) mod assignee_id {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::UNASSIGNED_ID;

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.unwrap_or(UNASSIGNED_ID))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        let raw = u64::deserialize(deserializer)?;
        Ok(if raw == UNASSIGNED_ID { None } else { Some(raw) })
    }

    /// Serializer for patch fields, which are optional on top of the
    /// sentinel. Only invoked once serde has decided to emit the field.
    pub fn serialize_patch<S: Serializer>(
        value: &Option<Option<u64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serialize(value.as_ref().unwrap_or(&None), serializer)
    }
}

pub(crate) mod due_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => {
                serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        let date = DateTime::parse_from_rfc3339(&raw).map_err(D::Error::custom)?;
        Ok(Some(date.with_timezone(&Utc)))
    }

    pub fn serialize_patch<S: Serializer>(
        value: &Option<Option<DateTime<Utc>>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serialize(value.as_ref().unwrap_or(&None), serializer)
    }
}
