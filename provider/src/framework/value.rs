//! Attribute values that may be null or not yet known.
//!
//! JSON form: `null` for [`Value::Null`], `{"unknown": true}` for
//! [`Value::Unknown`], and the plain value otherwise.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as Json;

/// Key of the marker object that encodes an unknown value.
pub const UNKNOWN_KEY: &str = "unknown";

/// A single attribute value as the host sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value<T> {
    #[default]
    Null,
    /// Will only be known after apply, e.g. an upstream resource's output.
    Unknown,
    Known(T),
}

pub type StringValue = Value<String>;
pub type Int64Value = Value<i64>;
pub type BoolValue = Value<bool>;

impl<T> Value<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Value::Known(value) => Some(value),
            Value::Null | Value::Unknown => None,
        }
    }
}

impl<T: Clone + Default> Value<T> {
    /// The known value, or the zero value when null or unknown.
    pub fn value(&self) -> T {
        self.known().cloned().unwrap_or_default()
    }
}

impl<T> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Value::Known(value)
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Value::Known(value.to_string())
    }
}

/// Whether a raw JSON value is the unknown marker.
pub fn is_unknown_marker(raw: &Json) -> bool {
    match raw {
        Json::Object(map) => map.len() == 1 && map.get(UNKNOWN_KEY) == Some(&Json::Bool(true)),
        _ => false,
    }
}

/// The raw JSON encoding of an unknown value.
pub fn unknown_marker() -> Json {
    serde_json::json!({ UNKNOWN_KEY: true })
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Unknown => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(UNKNOWN_KEY, &true)?;
                map.end()
            }
            Value::Known(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Json::deserialize(deserializer)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        if is_unknown_marker(&raw) {
            return Ok(Value::Unknown);
        }
        serde_json::from_value(raw)
            .map(Value::Known)
            .map_err(D::Error::custom)
    }
}
