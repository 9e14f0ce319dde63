//! Error types for gateway deliveries

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while delivering one message.
///
/// The `Display` text is what the caller sees in the `failures` list, so it
/// must never include the API credential.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, DNS or TLS failure
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the provider
    #[error("Gateway returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx reply whose body reports the message as not accepted
    #[error("Gateway rejected message: {0}")]
    Rejected(String),

    /// No reply within the per-call budget
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The delivery task panicked or was aborted
    #[error("Delivery task failed: {0}")]
    TaskFailed(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL; it is ours, not the caller's business
        let err = err.without_url();
        if let Some(status) = err.status() {
            GatewayError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}
