//! Bulk-SMS HTTP client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::error::GatewayError;
use super::provider::{GatewayAck, SmsGateway};
use super::types::{BulkSmsRequest, BulkSmsResponse};
use crate::config::Config;

/// Path of the bulk-send endpoint, relative to the configured base URL
pub const BULK_SEND_PATH: &str = "/dev/bulkV2";

/// Quick-transactional route code
pub const DEFAULT_ROUTE: &str = "q";

pub const DEFAULT_LANGUAGE: &str = "english";

/// Longest provider error body echoed back to callers, in characters
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the provider's bulk-send endpoint
#[derive(Clone)]
pub struct BulkSmsGateway {
    /// HTTP client, shared by every delivery
    http_client: Client,
    /// Provider base URL, without trailing slash
    base_url: String,
    /// Static credential sent in the `authorization` header
    api_key: String,
    route: String,
    language: String,
}

impl BulkSmsGateway {
    /// Create a new gateway client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            route: DEFAULT_ROUTE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        })
    }

    /// Create a client from process configuration
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        Ok(Self::new(&config.sms_api_base_url, &config.sms_api_key)?
            .with_route(&config.sms_route)
            .with_language(&config.sms_language))
    }

    /// Set the route code
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Set the language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    fn build_endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, BULK_SEND_PATH)
    }
}

impl std::fmt::Debug for BulkSmsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkSmsGateway")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("route", &self.route)
            .field("language", &self.language)
            .finish()
    }
}

#[async_trait]
impl SmsGateway for BulkSmsGateway {
    async fn send(&self, phone: &str, message: &str) -> Result<GatewayAck, GatewayError> {
        let body = BulkSmsRequest {
            route: &self.route,
            message,
            language: &self.language,
            flash: 0,
            numbers: phone,
        };

        let response = self
            .http_client
            .post(self.build_endpoint_url())
            .header("authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;

        // Check status
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.without_url().to_string()))?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        // Some 2xx replies still report the message as refused
        if let Ok(reply) = serde_json::from_str::<BulkSmsResponse>(&text) {
            if reply.accepted == Some(false) {
                return Err(GatewayError::Rejected(reply.message_text()));
            }
        }

        let ack = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok(GatewayAck(ack))
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_endpoint_url() {
        let gateway = BulkSmsGateway::new("https://sms.example.com/", "key").unwrap();
        assert_eq!(
            gateway.build_endpoint_url(),
            "https://sms.example.com/dev/bulkV2"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let gateway = BulkSmsGateway::new("https://sms.example.com", "secret-key").unwrap();
        let debug = format!("{:?}", gateway);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_send_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/dev/bulkV2")
            .match_header("authorization", "test-api-key")
            .match_body(Matcher::Json(json!({
                "route": "q",
                "message": "help",
                "language": "english",
                "flash": 0,
                "numbers": "9876543210"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"return":true,"request_id":"r1","message":["SMS sent successfully."]}"#)
            .create_async()
            .await;

        let gateway = BulkSmsGateway::new(server.url(), "test-api-key").unwrap();
        let ack = gateway.send("9876543210", "help").await.unwrap();

        mock.assert_async().await;
        assert_eq!(ack.0["request_id"], "r1");
    }

    #[tokio::test]
    async fn test_send_uses_configured_route_and_language() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/dev/bulkV2")
            .match_body(Matcher::PartialJson(json!({
                "route": "v3",
                "language": "unicode"
            })))
            .with_status(200)
            .with_body(r#"{"return":true}"#)
            .create_async()
            .await;

        let gateway = BulkSmsGateway::new(server.url(), "k")
            .unwrap()
            .with_route("v3")
            .with_language("unicode");
        gateway.send("9876543210", "help").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_http_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/dev/bulkV2")
            .with_status(401)
            .with_body(r#"{"return":false,"message":"Invalid Authentication"}"#)
            .create_async()
            .await;

        let gateway = BulkSmsGateway::new(server.url(), "bad-key").unwrap();
        let err = gateway.send("9876543210", "help").await.unwrap_err();

        match err {
            GatewayError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid Authentication"));
            }
            other => panic!("Expected Status error, got: {:?}", other),
        }
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let exact = "a".repeat(MAX_ERROR_BODY_CHARS);
        assert_eq!(truncate_body(&exact), exact);

        let long = "é".repeat(MAX_ERROR_BODY_CHARS + 50);
        let cut = truncate_body(&long);
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[tokio::test]
    async fn test_send_http_error_body_truncated() {
        let mut server = Server::new_async().await;
        let page = format!("<html>{}</html>", "x".repeat(5000));
        let _mock = server
            .mock("POST", "/dev/bulkV2")
            .with_status(502)
            .with_body(page)
            .create_async()
            .await;

        let gateway = BulkSmsGateway::new(server.url(), "k").unwrap();
        let err = gateway.send("9876543210", "help").await.unwrap_err();

        match err {
            GatewayError::Status { status, body } => {
                assert_eq!(status, 502);
                assert!(body.starts_with("<html>"));
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 3);
            }
            other => panic!("Expected Status error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_unreadable_body_is_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/dev/bulkV2")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(b"{\"return\":tr")?;
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection dropped",
                ))
            })
            .create_async()
            .await;

        let gateway = BulkSmsGateway::new(server.url(), "k").unwrap();
        let err = gateway.send("9876543210", "help").await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_send_rejected_with_ok_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/dev/bulkV2")
            .with_status(200)
            .with_body(r#"{"return":false,"status_code":411,"message":"Invalid Numbers"}"#)
            .create_async()
            .await;

        let gateway = BulkSmsGateway::new(server.url(), "k").unwrap();
        let err = gateway.send("9876543210", "help").await.unwrap_err();

        assert!(matches!(err, GatewayError::Rejected(ref m) if m == "Invalid Numbers"));
    }

    #[tokio::test]
    async fn test_send_non_json_success_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/dev/bulkV2")
            .with_status(200)
            .with_body("OK")
            .create_async()
            .await;

        let gateway = BulkSmsGateway::new(server.url(), "k").unwrap();
        let ack = gateway.send("9876543210", "help").await.unwrap();
        assert_eq!(ack, GatewayAck(Value::Null));
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        // Nothing listens on port 9 of localhost
        let gateway = BulkSmsGateway::new("http://127.0.0.1:9", "k").unwrap();
        let err = gateway.send("9876543210", "help").await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
        assert!(!err.to_string().contains("127.0.0.1:9"));
    }
}
