//! Response types: the transport response, the backend envelope and the
//! flat `{data, error}` result

use crate::error::RequestError;
use crate::request::RequestConfig;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the response body should be decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// JSON payload, subject to backend success classification
    #[default]
    Json,
    /// UTF-8 text
    Text,
    /// Raw bytes (downloads)
    Bytes,
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed JSON
    Json(Value),
    /// Text body
    Text(String),
    /// Raw body
    Bytes(Bytes),
}

impl ResponseBody {
    /// Decode raw bytes according to the declared response type
    ///
    /// An empty JSON body decodes to `null`; a body that is not valid JSON
    /// is kept as a JSON string.
    #[must_use]
    pub fn decode(response_type: ResponseType, raw: Bytes) -> Self {
        match response_type {
            ResponseType::Json => {
                if raw.is_empty() {
                    return Self::Json(Value::Null);
                }
                match serde_json::from_slice(&raw) {
                    Ok(value) => Self::Json(value),
                    Err(_) => Self::Json(Value::String(String::from_utf8_lossy(&raw).into_owned())),
                }
            }
            ResponseType::Text => Self::Text(String::from_utf8_lossy(&raw).into_owned()),
            ResponseType::Bytes => Self::Bytes(raw),
        }
    }

    /// Borrow the JSON value, if this is a JSON body
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Convert to a JSON value; text becomes a string, bytes an array of numbers
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
            Self::Bytes(raw) => Value::Array(raw.iter().map(|b| Value::from(*b)).collect()),
        }
    }

    /// Convert to raw bytes
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Json(value) => Bytes::from(value.to_string()),
            Self::Text(text) => Bytes::from(text),
            Self::Bytes(raw) => raw,
        }
    }
}

/// A response that passed status validation
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Identifier sent in the `X-Request-Id` header
    pub request_id: String,
    /// Declared response type of the call
    pub response_type: ResponseType,
    /// Decoded body
    pub body: ResponseBody,
    /// The configuration the call was sent with
    pub config: RequestConfig,
}

impl ServiceResponse {
    /// Build a JSON response, e.g. as the replacement for a recovered failure
    #[must_use]
    pub fn from_json(status: u16, body: Value, config: RequestConfig) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            request_id: config.request_id.clone().unwrap_or_default(),
            response_type: ResponseType::Json,
            body: ResponseBody::Json(body),
            config,
        }
    }

    /// JSON body, if any
    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        self.body.as_json()
    }

    /// Backend `code` field as a string; numeric codes are stringified
    #[must_use]
    pub fn code(&self) -> Option<String> {
        self.json()?.get("code").and_then(code_to_string)
    }

    /// Backend `msg` field
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.json()?.get("msg").and_then(Value::as_str)
    }

    /// Parse the body as a typed backend envelope
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<BackendEnvelope<T>, RequestError> {
        let value = self.json().cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }
}

fn code_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(code) => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// The backend service envelope `{code, msg, data}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEnvelope<T = Value> {
    /// Backend response code
    #[serde(deserialize_with = "deserialize_code")]
    pub code: String,
    /// Backend response message
    #[serde(default)]
    pub msg: String,
    /// Payload
    pub data: T,
}

fn deserialize_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    code_to_string(&value).ok_or_else(|| serde::de::Error::custom("code must be a string or a number"))
}

/// The flat result every adapter call resolves to
///
/// Exactly one of `data` and `error` is set.
#[derive(Debug)]
pub struct FlatResponse<T> {
    /// Payload on success
    pub data: Option<T>,
    /// Failure otherwise
    pub error: Option<RequestError>,
}

impl<T> FlatResponse<T> {
    /// Successful result
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Failed result
    pub fn failure(error: RequestError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Whether the call succeeded
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<T, RequestError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(RequestError::transform("flat response carried neither data nor error")),
        }
    }
}

impl<T> From<Result<T, RequestError>> for FlatResponse<T> {
    fn from(result: Result<T, RequestError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }
}

impl<T: Serialize> Serialize for FlatResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FlatResponse", 2)?;
        state.serialize_field("data", &self.data)?;
        state.serialize_field("error", &self.error)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: Value) -> ServiceResponse {
        ServiceResponse::from_json(200, body, RequestConfig::get("/"))
    }

    #[test]
    fn test_decode_json_falls_back_to_string() {
        let body = ResponseBody::decode(ResponseType::Json, Bytes::from_static(b"not json"));
        assert_eq!(body, ResponseBody::Json(json!("not json")));

        let empty = ResponseBody::decode(ResponseType::Json, Bytes::new());
        assert_eq!(empty, ResponseBody::Json(Value::Null));
    }

    #[test]
    fn test_decode_text_and_bytes() {
        let text = ResponseBody::decode(ResponseType::Text, Bytes::from_static(b"hello"));
        assert_eq!(text, ResponseBody::Text("hello".into()));

        let raw = ResponseBody::decode(ResponseType::Bytes, Bytes::from_static(&[1, 2]));
        assert_eq!(raw.into_value(), json!([1, 2]));
    }

    #[test]
    fn test_code_accepts_numbers() {
        assert_eq!(response(json!({"code": "0000"})).code().as_deref(), Some("0000"));
        assert_eq!(response(json!({"code": 200})).code().as_deref(), Some("200"));
        assert_eq!(response(json!({"msg": "no code"})).code(), None);
    }

    #[test]
    fn test_envelope_deserialize() {
        let resp = response(json!({"code": 4001, "msg": "bad", "data": null}));
        let envelope: BackendEnvelope<Option<String>> = resp.envelope().unwrap();
        assert_eq!(envelope.code, "4001");
        assert_eq!(envelope.msg, "bad");
        assert_eq!(envelope.data, None);
    }

    #[test]
    fn test_flat_response_serializes_both_keys() {
        let flat = FlatResponse::success(json!({"tokenValue": "abc"}));
        let value = serde_json::to_value(&flat).unwrap();
        assert_eq!(value, json!({"data": {"tokenValue": "abc"}, "error": null}));

        let failed: FlatResponse<Value> = FlatResponse::failure(RequestError::config("boom"));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["data"], Value::Null);
        assert_eq!(value["error"]["code"], "ERR_CONFIG");
    }
}
