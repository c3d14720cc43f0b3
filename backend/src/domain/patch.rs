//! Tri-state field wrapper for partial updates.
//!
//! JSON partial updates need to distinguish a field that was omitted from a
//! field that was sent as `null`. A plain `Option<T>` collapses the two, so
//! updatable fields use [`Patch<T>`]: absent means "leave unchanged", null
//! and value carry whatever per-field policy the operation defines.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Presence-aware optional value for a single updatable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Field was not present in the payload.
    #[default]
    Absent,
    /// Field was present and explicitly `null`.
    Null,
    /// Field was present with a value.
    Value(T),
}

impl<T> Patch<T> {
    /// True unless the field was omitted.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Borrow the inner value when one was supplied.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Map the inner value, preserving presence.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Null => Patch::Null,
            Self::Value(value) => Patch::Value(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Null,
        }
    }
}

// Deserialization relies on `#[serde(default)]` at the field site: serde only
// calls this when the key is present, so absent fields keep `Patch::Absent`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Serializing an absent field as null is lossy; callers should
            // pair serialization with `skip_serializing_if = "Patch::is_absent"`.
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Value(value) => serializer.serialize_some(value),
        }
    }
}

impl<T> Patch<T> {
    /// Serde helper for `skip_serializing_if`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default)]
        name: Patch<String>,
    }

    #[rstest]
    #[case(r"{}", Patch::Absent)]
    #[case(r#"{"name":null}"#, Patch::Null)]
    #[case(r#"{"name":"ada"}"#, Patch::Value("ada".to_owned()))]
    fn distinguishes_absent_null_and_value(#[case] json: &str, #[case] expected: Patch<String>) {
        let payload: Payload = serde_json::from_str(json).expect("valid payload");
        assert_eq!(payload.name, expected);
    }

    #[rstest]
    fn map_preserves_presence() {
        assert_eq!(Patch::<u32>::Absent.map(|v| v + 1), Patch::Absent);
        assert_eq!(Patch::<u32>::Null.map(|v| v + 1), Patch::Null);
        assert_eq!(Patch::Value(1u32).map(|v| v + 1), Patch::Value(2));
    }
}
