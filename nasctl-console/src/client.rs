//! HTTP transport for the NAS backend

use crate::error::{ConsoleError, Result};
use crate::transport::{ApiRequest, Transport};
use async_trait::async_trait;
use nasctl_common::ApiResponse;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_PREFIX: &str = "/api/v1";

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(server: &str) -> Result<Self> {
        Self::with_timeout(server, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(server: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: api_base(server),
            client,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer token sent with every later request
    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    pub async fn get_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn clear_token(&self) {
        self.token.write().await.take();
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        debug!(method = %request.method, path = %request.path, "API request");

        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.into(), url);
        if let Some(token) = self.get_token().await {
            builder = builder.bearer_auth(token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(method = %request.method, path = %request.path, error = %e, "API request failed");
            ConsoleError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        decode_envelope(status, &text).map_err(|e| {
            warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                error = %e,
                "API call unsuccessful"
            );
            e
        })
    }
}

/// `http://nas:8080/` -> `http://nas:8080/api/v1`
fn api_base(server: &str) -> String {
    let server = server.trim_end_matches('/');
    if server.ends_with(API_PREFIX) {
        server.to_string()
    } else {
        format!("{}{}", server, API_PREFIX)
    }
}

/// Apply the envelope rules to a raw response body.
///
/// A parseable envelope decides the outcome whatever the HTTP status.
fn decode_envelope(status: StatusCode, body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return if status.is_success() {
            Ok(Value::Null)
        } else {
            Err(ConsoleError::Request(status.to_string()))
        };
    }

    match serde_json::from_str::<ApiResponse<Value>>(body) {
        Ok(envelope) => envelope
            .into_result()
            .map(|data| data.unwrap_or(Value::Null))
            .map_err(|info| ConsoleError::Rejected {
                code: info.code_number(),
                message: info.message,
            }),
        Err(_) if !status.is_success() => {
            Err(ConsoleError::Request(format!("{} - {}", status, body.trim())))
        }
        Err(e) => Err(ConsoleError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_base() {
        assert_eq!(api_base("http://nas:8080"), "http://nas:8080/api/v1");
        assert_eq!(api_base("http://nas:8080/"), "http://nas:8080/api/v1");
        assert_eq!(api_base("https://nas/api/v1/"), "https://nas/api/v1");
    }

    #[test]
    fn test_success_returns_data() {
        let value = decode_envelope(StatusCode::OK, r#"{"success":true,"data":{"a":1}}"#).unwrap();
        assert_eq!(value, json!({"a": 1}));

        let value = decode_envelope(StatusCode::OK, r#"{"success":true}"#).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_failure_envelope_wins_over_status() {
        let body = r#"{"success":false,"error":{"code":400,"message":"Path already exists"}}"#;
        for status in [StatusCode::OK, StatusCode::BAD_REQUEST, StatusCode::INTERNAL_SERVER_ERROR] {
            let err = decode_envelope(status, body).unwrap_err();
            assert_eq!(
                err,
                ConsoleError::Rejected {
                    code: Some(400),
                    message: "Path already exists".to_string()
                }
            );
        }
    }

    #[test]
    fn test_non_envelope_error_body() {
        let err = decode_envelope(StatusCode::BAD_GATEWAY, "upstream unavailable\n").unwrap_err();
        assert_eq!(
            err,
            ConsoleError::Request("502 Bad Gateway - upstream unavailable".to_string())
        );
    }

    #[test]
    fn test_non_envelope_success_body() {
        let err = decode_envelope(StatusCode::OK, "[1,2,3]").unwrap_err();
        assert!(matches!(err, ConsoleError::Decode(_)));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(decode_envelope(StatusCode::NO_CONTENT, "").unwrap(), Value::Null);
        assert!(matches!(
            decode_envelope(StatusCode::UNAUTHORIZED, ""),
            Err(ConsoleError::Request(_))
        ));
    }
}
