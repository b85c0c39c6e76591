//! Canonical response envelope.
//!
//! The backend wraps payloads inconsistently: sometimes `{ data: { success, data, .. } }`,
//! sometimes a flat `{ success, data, .. }`, sometimes just the payload. Everything is
//! folded into [`ApiResponse`] here. The conversion is total: any JSON value produces a
//! response.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "操作成功";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            total: None,
            total_pages: None,
            current_page: None,
            count: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            message: message.into(),
            total: None,
            total_pages: None,
            current_page: None,
            count: None,
        }
    }

    /// Deserializes `data` into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    pub fn into_result(self) -> Result<Value, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.message)
        }
    }
}

/// The three payload layouts the backend produces.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `{ data: { success, .. } }`: the envelope sits one level down.
    Wrapped(Map<String, Value>),
    /// `{ success, .. }`: already an envelope.
    Envelope(Map<String, Value>),
    /// Anything else, taken as the payload itself.
    Bare(Value),
}

impl ResponseShape {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                if let Some(Value::Object(inner)) = map.get_mut("data") {
                    if inner.contains_key("success") {
                        return Self::Wrapped(std::mem::take(inner));
                    }
                }
                if map.contains_key("success") {
                    Self::Envelope(map)
                } else {
                    Self::Bare(Value::Object(map))
                }
            }
            other => Self::Bare(other),
        }
    }
}

pub fn normalize(value: Value) -> ApiResponse {
    match ResponseShape::classify(value) {
        ResponseShape::Wrapped(mut inner) => ApiResponse {
            success: inner.get("success").is_some_and(truthy),
            data: inner.remove("data").unwrap_or(Value::Null),
            message: string_field(&inner, "message")
                .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
            total: Some(number_field(&inner, "total").unwrap_or(0)),
            total_pages: Some(number_field(&inner, "totalPages").unwrap_or(1)),
            current_page: Some(number_field(&inner, "currentPage").unwrap_or(1)),
            count: Some(number_field(&inner, "count").unwrap_or(0)),
        },
        ResponseShape::Envelope(mut map) => ApiResponse {
            success: map.get("success").is_some_and(truthy),
            data: map.remove("data").unwrap_or(Value::Null),
            message: string_field(&map, "message").unwrap_or_default(),
            total: number_field(&map, "total"),
            total_pages: number_field(&map, "totalPages"),
            current_page: number_field(&map, "currentPage"),
            count: number_field(&map, "count"),
        },
        ResponseShape::Bare(data) => ApiResponse {
            success: true,
            data,
            message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            total: None,
            total_pages: None,
            current_page: None,
            count: None,
        },
    }
}

/// Best-effort human message from an error body.
pub fn extract_message(body: &Value) -> Option<String> {
    let map = body.as_object()?;
    for key in ["message", "error", "msg"] {
        match map.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(nested @ Value::Object(_)) => {
                if let Some(found) = extract_message(nested) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    map.get("data").and_then(extract_message)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn number_field(map: &Map<String, Value>, key: &str) -> Option<u64> {
    match map.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
