//! Source payloads.

use serde::{Deserialize, Serialize};

use crate::error::SourceFetchError;

/// A payload produced by one data source.
///
/// Structured data travels as JSON so the template renderer can read named
/// fields; pre-rendered assets (e.g. sparkline images) travel as bytes and
/// are serialized as base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Record {
    Json(serde_json::Value),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl Record {
    pub fn json(value: serde_json::Value) -> Self {
        Self::Json(value)
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Parse a raw response body as JSON.
    ///
    /// A body that is not valid JSON is a malformed payload, which the
    /// aggregator treats like any other fetch failure.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, SourceFetchError> {
        serde_json::from_slice(body)
            .map(Self::Json)
            .map_err(|e| SourceFetchError::malformed(e.to_string()))
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Json(_) => None,
        }
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_slice_rejects_garbage() {
        let err = Record::from_json_slice(b"<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), "malformed_payload");
    }

    #[test]
    fn test_from_json_slice_accepts_object() {
        let record = Record::from_json_slice(br#"{"temp": 31}"#).unwrap();
        assert_eq!(record.as_json(), Some(&json!({"temp": 31})));
        assert!(record.as_bytes().is_none());
    }

    #[test]
    fn test_bytes_serialize_as_base64() {
        let record = Record::bytes(vec![0x89, b'P', b'N', b'G']);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"kind": "bytes", "data": "iVBORw=="}));

        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
