use crate::error::Result;
use crate::protocol::ResponseType;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

/// Decoded response body.
///
/// The variant follows the [`ResponseType`] the request asked for. A body
/// that cannot be decoded as JSON, or an empty body, decodes to `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No usable body.
    #[default]
    Null,
    /// Parsed JSON.
    Json(serde_json::Value),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes (`blob` and `arraybuffer`).
    Bytes(Bytes),
    /// Markup kept as text (`document`).
    Document(String),
}

impl Payload {
    /// Decode a raw body according to the requested response type.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_http::protocol::ResponseType;
    /// use courier_http::types::Payload;
    ///
    /// let payload = Payload::decode(ResponseType::Json, "{\"a\":1}".into());
    /// assert_eq!(payload.as_json().unwrap()["a"], 1);
    ///
    /// assert_eq!(Payload::decode(ResponseType::Json, "not json".into()), Payload::Null);
    /// ```
    pub fn decode(response_type: ResponseType, body: Bytes) -> Self {
        match response_type {
            ResponseType::Json => {
                if body.is_empty() {
                    return Payload::Null;
                }
                serde_json::from_slice(&body)
                    .map(Payload::Json)
                    .unwrap_or(Payload::Null)
            }
            ResponseType::Text => Payload::Text(String::from_utf8_lossy(&body).into_owned()),
            ResponseType::Blob | ResponseType::ArrayBuffer => Payload::Bytes(body),
            ResponseType::Document => {
                Payload::Document(String::from_utf8_lossy(&body).into_owned())
            }
        }
    }

    /// Whether the payload is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    /// Borrow parsed JSON.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow text or document markup.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) | Payload::Document(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow raw bytes.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Deserialize the payload into a caller-chosen type.
    ///
    /// JSON payloads are converted directly; text payloads are parsed as
    /// JSON; `Null` deserializes from JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let value = match self {
            Payload::Json(v) => T::deserialize(v)?,
            Payload::Text(s) | Payload::Document(s) => serde_json::from_str(s)?,
            Payload::Bytes(b) => serde_json::from_slice(b)?,
            Payload::Null => serde_json::from_value(serde_json::Value::Null)?,
        };
        Ok(value)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Payload::Null => serializer.serialize_unit(),
            Payload::Json(v) => v.serialize(serializer),
            Payload::Text(s) | Payload::Document(s) => serializer.serialize_str(s),
            Payload::Bytes(b) => serializer.serialize_bytes(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
    }

    #[test]
    fn test_decode_by_response_type() {
        let body = Bytes::from_static(b"<p>hi</p>");
        assert_eq!(
            Payload::decode(ResponseType::Text, body.clone()),
            Payload::Text("<p>hi</p>".into())
        );
        assert_eq!(
            Payload::decode(ResponseType::Document, body.clone()),
            Payload::Document("<p>hi</p>".into())
        );
        assert_eq!(
            Payload::decode(ResponseType::Blob, body.clone()),
            Payload::Bytes(body.clone())
        );
        assert_eq!(
            Payload::decode(ResponseType::ArrayBuffer, body.clone()),
            Payload::Bytes(body)
        );
    }

    #[test]
    fn test_empty_json_body_is_null() {
        assert!(Payload::decode(ResponseType::Json, Bytes::new()).is_null());
    }

    #[test]
    fn test_typed_json() {
        let payload = Payload::decode(ResponseType::Json, Bytes::from_static(b"{\"name\":\"Luke\"}"));
        let person: Person = payload.json().unwrap();
        assert_eq!(person.name, "Luke");

        let text = Payload::Text("{\"name\":\"Leia\"}".into());
        assert_eq!(text.json::<Person>().unwrap().name, "Leia");
    }

    #[test]
    fn test_typed_json_mismatch() {
        let payload = Payload::Json(serde_json::json!([1, 2]));
        assert!(payload.json::<Person>().is_err());
    }
}
