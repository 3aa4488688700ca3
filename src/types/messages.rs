//! NATS message types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Generic request wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> Request<T> {
    pub fn new(payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Generic success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(request_id: Uuid, payload: T) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(request_id: Uuid, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

/// Empty payload that accepts both `null` and `{}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyPayload {}

impl<'de> Deserialize<'de> for EmptyPayload {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<serde::de::IgnoredAny>::deserialize(deserializer)?;
        Ok(EmptyPayload {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_null_payload_as_empty() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "timestamp": "2026-01-15T10:00:00Z",
            "payload": null
        }"#;
        let request: Request<EmptyPayload> = serde_json::from_str(json).unwrap();
        assert_eq!(request.id.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn test_request_parses_object_payload_as_empty() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "timestamp": "2026-01-15T10:00:00Z",
            "payload": {}
        }"#;
        assert!(serde_json::from_str::<Request<EmptyPayload>>(json).is_ok());
    }

    #[test]
    fn test_error_response_omits_missing_details() {
        let error = ErrorResponse::new(Uuid::nil(), "NOT_FOUND", "Row not found");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(!json.contains("details"));

        let error = error.with_details(serde_json::json!({ "id": "x" }));
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\""));
    }
}
