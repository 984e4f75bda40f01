// Shared value types and serde helpers
//
// Types used across several endpoint groups: the integer MAC newtype, the
// `{booleanResponse, message}` envelope returned by mutating calls, simple
// geometry, and the outbound-encoding trait that strips identity fields on
// create.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

// ── MAC ──────────────────────────────────────────────────────────────

/// Integer sensor identifier (48-bit hardware address). Never a string on
/// the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mac(pub i64);

impl Mac {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Mac {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ── Envelope ─────────────────────────────────────────────────────────

/// Uniform result envelope returned by every mutating endpoint.
///
/// ```json
/// { "booleanResponse": true, "message": "ok" }
/// ```
///
/// Building-map writes answer with `success` instead of `booleanResponse`;
/// both spellings decode into the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebServiceBoolean {
    #[serde(default, alias = "success")]
    pub boolean_response: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

impl WebServiceBoolean {
    pub fn new(boolean_response: bool, message: impl Into<String>) -> Self {
        Self {
            boolean_response,
            message: message.into(),
        }
    }

    /// Failure envelope synthesized locally when the remote call failed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    pub fn is_success(&self) -> bool {
        self.boolean_response
    }
}

/// Decode `null` as the type's default instead of failing.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a string field the API sometimes sends as a number or `null`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Decode an integer the API sometimes sends as a numeric string.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {n}"))),
        Value::String(s) => s.trim().parse().map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected an integer, got {other}"))),
    }
}

// ── Geometry ─────────────────────────────────────────────────────────

/// A point on a building map, in map pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Latitude/longitude pair returned by the geocoder and IP locator.
///
/// Both coordinates are required: a reply without them is "no result",
/// never `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

// ── Outbound encoding ────────────────────────────────────────────────

/// What a write request intends to do with an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteIntent {
    /// The server assigns the identity; the field is left out.
    Create,
    Update,
    Delete,
}

/// Entities that can be sent to a write endpoint.
///
/// Serialization produces the API's camelCase keys. On
/// [`WriteIntent::Create`] the identity field is removed from the
/// top-level object; update and delete send it unchanged.
pub trait Payload: Serialize {
    const IDENTITY_FIELD: &'static str = "id";

    fn to_payload(&self, intent: WriteIntent) -> Result<Value, Error> {
        let mut value = serde_json::to_value(self)?;
        if intent == WriteIntent::Create {
            if let Value::Object(map) = &mut value {
                map.remove(Self::IDENTITY_FIELD);
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_accepts_success_alias_and_null_message() {
        let env: WebServiceBoolean =
            serde_json::from_value(json!({ "success": true, "message": null })).unwrap();
        assert_eq!(env, WebServiceBoolean::new(true, ""));

        let env: WebServiceBoolean = serde_json::from_value(json!({})).unwrap();
        assert!(!env.is_success());
    }

    #[test]
    fn mac_is_a_bare_integer_on_the_wire() {
        let mac: Mac = serde_json::from_value(json!(112_233_445_566_i64)).unwrap();
        assert_eq!(mac, Mac(112_233_445_566));
        assert_eq!(serde_json::to_value(mac).unwrap(), json!(112_233_445_566_i64));
    }

    #[test]
    fn point_fields_default_to_zero() {
        let p: Point = serde_json::from_value(json!({ "x": 4.5 })).unwrap();
        assert_eq!(p, Point::new(4.5, 0.0, 0.0));
    }
}
