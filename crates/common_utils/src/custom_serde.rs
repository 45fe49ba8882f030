//! Custom serialization/deserialization implementations.

/// Use the well-known ISO 8601 format when serializing and deserializing a
/// [`PrimitiveDateTime`][PrimitiveDateTime]. Timestamps are stored without an
/// offset and assumed to be UTC.
///
/// [PrimitiveDateTime]: ::time::PrimitiveDateTime
pub mod iso8601 {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::{
        format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    };

    /// Serialize a [`PrimitiveDateTime`] as an RFC 3339 timestamp in UTC.
    pub fn serialize<S>(date_time: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        date_time
            .assume_utc()
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)
            .and_then(|formatted| serializer.serialize_str(&formatted))
    }

    /// Deserialize an RFC 3339 timestamp into a [`PrimitiveDateTime`] in UTC.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&value, &Rfc3339)
            .map(|offset| {
                let utc = offset.to_offset(UtcOffset::UTC);
                PrimitiveDateTime::new(utc.date(), utc.time())
            })
            .map_err(de::Error::custom)
    }

    /// The same adapter for optional timestamps.
    pub mod option {
        use super::*;

        /// Serialize an optional [`PrimitiveDateTime`] as an RFC 3339 timestamp.
        pub fn serialize<S>(
            date_time: &Option<PrimitiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date_time {
                Some(date_time) => super::serialize(date_time, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional RFC 3339 timestamp.
        pub fn deserialize<'de, D>(
            deserializer: D,
        ) -> Result<Option<PrimitiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Option::<String>::deserialize(deserializer)?;
            value
                .map(|value| {
                    OffsetDateTime::parse(&value, &Rfc3339)
                        .map(|offset| {
                            let utc = offset.to_offset(UtcOffset::UTC);
                            PrimitiveDateTime::new(utc.date(), utc.time())
                        })
                        .map_err(de::Error::custom)
                })
                .transpose()
        }
    }
}
