//! Provider trait for SMS gateway implementations

use async_trait::async_trait;
use serde_json::Value;

use super::error::GatewayError;

/// Provider acknowledgment of an accepted message.
///
/// The contents are provider-defined and never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayAck(pub Value);

/// Main interface that every SMS gateway implementation must satisfy
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send `message` to a single ten-digit `phone` number.
    ///
    /// Implementations make exactly one attempt and do not enforce a
    /// timeout of their own; the caller bounds each call.
    async fn send(&self, phone: &str, message: &str) -> Result<GatewayAck, GatewayError>;
}
