//! Decoding of successful responses.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::RawResponse;

/// Body of a successful API call, shaped by the declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Body decoded as JSON.
    Json(Value),
    /// Raw bytes of an `image/*` response, e.g. a shipping label.
    Binary(Vec<u8>),
    /// Body that is not JSON, returned verbatim.
    Text(String),
}

impl ApiResponse {
    /// Images stay binary; everything else is tried as JSON first. A body
    /// that does not decode to a value (invalid JSON, empty, or `null`) is
    /// returned as text.
    pub fn from_raw(raw: RawResponse) -> Self {
        if is_image(raw.content_type.as_deref()) {
            return ApiResponse::Binary(raw.body);
        }

        match serde_json::from_slice::<Value>(&raw.body) {
            Ok(Value::Null) | Err(_) => ApiResponse::Text(raw.text()),
            Ok(value) => ApiResponse::Json(value),
        }
    }

    pub fn json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Deserializes a JSON body into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Option<serde_json::Result<T>> {
        match self {
            ApiResponse::Json(value) => Some(serde_json::from_value(value)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiResponse::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ApiResponse::Binary(bytes) => bytes,
            ApiResponse::Text(text) => text.into_bytes(),
            ApiResponse::Json(value) => value.to_string().into_bytes(),
        }
    }
}

fn is_image(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}
