//!
//! Serde-related.
//!

pub use serde::{de, Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{PeekInterface, Secret, Strategy};

/// Marker trait for secret types which can be [`Serialize`]-d by [`serde`].
///
/// Types must opt in to being serialized while wrapped in [`Secret`]; this is
/// deliberate, to prevent accidental exfiltration of secrets via `serde`
/// serialization. (All types which impl `DeserializeOwned` receive a
/// [`Deserialize`] impl.)
pub trait SerializableSecret: Serialize {}

impl SerializableSecret for Value {}
impl SerializableSecret for String {}
impl SerializableSecret for u8 {}
impl SerializableSecret for u16 {}

impl<'de, T, I> Deserialize<'de> for Secret<T, I>
where
    T: Clone + de::DeserializeOwned + Sized,
    I: Strategy<T>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::new)
    }
}

impl<T, I> Serialize for Secret<T, I>
where
    T: SerializableSecret + Serialize + Sized,
    I: Strategy<T>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.peek().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use crate::Secret;

    #[test]
    fn secret_string_round_trips_through_serde() {
        let secret: Secret<String> = serde_json::from_str(r#""20051899999999""#)
            .expect("failed to deserialize secret string");
        let serialized = serde_json::to_string(&secret).expect("failed to serialize secret");
        assert_eq!(r#""20051899999999""#, serialized);
    }
}
