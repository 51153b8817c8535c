//! Envelope for `/api/v1` bodies.
//!
//! ```json
//! {
//!   "data": { ... },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 5 },
//!   "errors": [{ "code": "VALIDATION_ERROR", "message": "..." }],
//!   "_links": { "self": "/api/v1/budget" }
//! }
//! ```
//!
//! The envelope carries no HTTP status of its own: handlers answer 200 and
//! `AppError` picks the status for failures.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub meta: ApiMeta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(rename = "_links", skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub request_id: String,
    /// RFC 3339.
    pub timestamp: String,
    pub response_time_ms: u64,
}

impl ApiMeta {
    fn stamped(request_id: String, response_time_ms: u64) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable, e.g. `VALIDATION_ERROR`.
    pub code: String,
    /// Safe to show to the user.
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, request_id: String, response_time_ms: u64) -> Self {
        Self {
            data: Some(data),
            meta: ApiMeta::stamped(request_id, response_time_ms),
            errors: Vec::new(),
            links: HashMap::new(),
        }
    }

    pub fn with_link(mut self, rel: &str, href: &str) -> Self {
        self.links.insert(rel.to_string(), href.to_string());
        self
    }
}

impl ApiResponse<()> {
    pub fn error(code: &str, message: &str, request_id: String, response_time_ms: u64) -> Self {
        Self {
            data: None,
            meta: ApiMeta::stamped(request_id, response_time_ms),
            errors: vec![ApiErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            }],
            links: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_errors() {
        let data = serde_json::json!({"needs_amount": 500.0});
        let resp = ApiResponse::success(data, "req-1".to_string(), 3)
            .with_link("self", "/api/v1/budget");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["data"]["needs_amount"], 500.0);
        assert_eq!(json["meta"]["request_id"], "req-1");
        assert_eq!(json["meta"]["response_time_ms"], 3);
        assert_eq!(json["_links"]["self"], "/api/v1/budget");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn error_envelope_omits_data_and_links() {
        let resp = ApiResponse::error("NOT_FOUND", "Record not found", "req-2".to_string(), 0);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("data").is_none());
        assert!(json.get("_links").is_none());
        assert_eq!(json["errors"][0]["code"], "NOT_FOUND");
        assert_eq!(json["errors"][0]["message"], "Record not found");
    }
}
