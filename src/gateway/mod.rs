//! Bulk-SMS gateway
//!
//! The dispatcher talks to the provider only through [`SmsGateway`], so the
//! HTTP client can be swapped for an in-process fake in tests.

pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::BulkSmsGateway;
pub use error::GatewayError;
pub use provider::{GatewayAck, SmsGateway};
