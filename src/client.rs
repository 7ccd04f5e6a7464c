// 🌐 Catalog Client - Authenticated GET/POST with JSON bodies
//
// One request, one response. No retries, no backoff. Non-200 answers are
// logged in the most specific form the body allows and returned as errors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, unreadable body...
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with something other than 200
    #[error("HTTP {status}: {}", .messages.join("; "))]
    Http { status: u16, messages: Vec<String> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

// ============================================================================
// ERROR BODY
// ============================================================================

/// Error body returned by the catalog API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Human-readable lines for a failed response, one per reported error.
///
/// - structured error body → `[CODE] detail` per entry
/// - any other body       → `[status reason] body`
/// - no body              → `status (reason)`
pub fn describe_http_error(status: u16, reason: &str, body: &str) -> Vec<String> {
    if body.trim().is_empty() {
        return vec![format!("{} ({})", status, reason)];
    }

    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(response) if !response.errors.is_empty() => response
            .errors
            .iter()
            .map(|e| format!("[{}] {}", e.code, e.detail.as_deref().unwrap_or("")))
            .collect(),
        _ => vec![format!("[{} {}] {}", status, reason, body)],
    }
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct CatalogClient {
    base_url: String,
    access_token: String,
    agent: ureq::Agent,
}

impl CatalogClient {
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> Self {
        // Status codes are inspected by hand so error bodies can be read
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        CatalogClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a GET request and decode the response as `RES`.
    pub fn get<RES: DeserializeOwned>(&self, path: &str) -> Result<RES, ApiError> {
        let url = self.url(path);
        tracing::info!(target: "catalog_merge::client", "GET {}", url);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &format!("Bearer {}", self.access_token))
            .header("Accept", "application/json")
            .call()?;

        self.parse_response(&url, response)
    }

    /// Send `request` as a JSON POST body and decode the response as `RES`.
    pub fn post<REQ: Serialize, RES: DeserializeOwned>(&self, path: &str, request: &REQ) -> Result<RES, ApiError> {
        let url = self.url(path);
        let body = serde_json::to_vec(request)?;
        tracing::info!(target: "catalog_merge::client", "POST {}", url);

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.access_token))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .send(&body[..])?;

        self.parse_response(&url, response)
    }

    fn parse_response<RES: DeserializeOwned>(
        &self,
        url: &str,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<RES, ApiError> {
        let status = response.status();
        let body = response.body_mut().read_to_string()?;

        if status.as_u16() == 200 {
            return Ok(serde_json::from_str(&body)?);
        }

        let messages = describe_http_error(status.as_u16(), status.canonical_reason().unwrap_or(""), &body);
        for message in &messages {
            tracing::error!(target: "catalog_merge::client", url = %url, "{}", message);
        }

        Err(ApiError::Http {
            status: status.as_u16(),
            messages,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve, CannedResponse};
    use serde_json::json;

    #[test]
    fn test_describe_structured_errors() {
        let body = r#"{"errors":[
            {"category":"AUTHENTICATION_ERROR","code":"UNAUTHORIZED","detail":"This request could not be authorized."},
            {"category":"INVALID_REQUEST_ERROR","code":"MISSING_REQUIRED_PARAMETER","detail":"Missing idempotency_key","field":"idempotency_key"}
        ]}"#;

        let lines = describe_http_error(401, "Unauthorized", body);
        assert_eq!(
            lines,
            vec![
                "[UNAUTHORIZED] This request could not be authorized.",
                "[MISSING_REQUIRED_PARAMETER] Missing idempotency_key",
            ]
        );
    }

    #[test]
    fn test_describe_plain_body() {
        let lines = describe_http_error(502, "Bad Gateway", "<html>upstream down</html>");
        assert_eq!(lines, vec!["[502 Bad Gateway] <html>upstream down</html>"]);
    }

    #[test]
    fn test_describe_json_without_errors_falls_back() {
        let lines = describe_http_error(500, "Internal Server Error", r#"{"message":"oops"}"#);
        assert_eq!(lines, vec![r#"[500 Internal Server Error] {"message":"oops"}"#]);
    }

    #[test]
    fn test_describe_empty_body() {
        assert_eq!(describe_http_error(503, "Service Unavailable", ""), vec!["503 (Service Unavailable)"]);
    }

    #[test]
    fn test_url_joining() {
        let client = CatalogClient::new("https://example.test/", "token", Duration::from_secs(5));
        assert_eq!(client.base_url(), "https://example.test");
        assert_eq!(client.url("/v2/catalog/list"), "https://example.test/v2/catalog/list");
        assert_eq!(client.url("v2/catalog/list"), "https://example.test/v2/catalog/list");
    }

    #[test]
    fn test_http_error_display() {
        let err = ApiError::Http {
            status: 400,
            messages: vec!["[A] one".to_string(), "[B] two".to_string()],
        };
        assert_eq!(err.to_string(), "HTTP 400: [A] one; [B] two");
    }

    fn create_test_client(base_url: &str) -> CatalogClient {
        CatalogClient::new(base_url, "test-token", Duration::from_secs(5))
    }

    #[test]
    fn test_get_sends_bearer_token_and_decodes_body() {
        let (base_url, requests) = serve(vec![CannedResponse::ok(json!({ "objects": [], "cursor": "abc" }))]);
        let client = create_test_client(&base_url);

        let body: serde_json::Value = client.get("/v2/catalog/list").unwrap();
        assert_eq!(body["cursor"], "abc");

        let request = requests.recv().unwrap().to_lowercase();
        assert!(request.starts_with("get /v2/catalog/list http/1.1"));
        assert!(request.contains("authorization: bearer test-token"));
    }

    #[test]
    fn test_error_status_returns_described_messages() {
        let (base_url, _requests) = serve(vec![CannedResponse::status(
            400,
            "Bad Request",
            r#"{"errors":[{"code":"BAD","detail":"nope"}]}"#,
        )]);
        let client = create_test_client(&base_url);

        let err = client.get::<serde_json::Value>("/v2/catalog/list").unwrap_err();
        match err {
            ApiError::Http { status, messages } => {
                assert_eq!(status, 400);
                assert_eq!(messages, vec!["[BAD] nope"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_post_sends_json_body() {
        let (base_url, requests) = serve(vec![CannedResponse::ok(json!({ "accepted": true }))]);
        let client = create_test_client(&base_url);

        let body: serde_json::Value = client.post("/v2/catalog/batch-upsert", &json!({ "key": "value" })).unwrap();
        assert_eq!(body["accepted"], true);

        let request = requests.recv().unwrap();
        let lower = request.to_lowercase();
        assert!(lower.starts_with("post /v2/catalog/batch-upsert http/1.1"));
        assert!(lower.contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"key":"value"}"#));
    }

    #[test]
    fn test_undecodable_body_is_json_error() {
        let (base_url, _requests) = serve(vec![CannedResponse::status(200, "OK", "not json")]);
        let client = create_test_client(&base_url);

        let err = client.get::<serde_json::Value>("/v2/catalog/list").unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }
}
