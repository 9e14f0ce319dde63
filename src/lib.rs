// HTTP server modules
pub mod handlers;
pub mod models;
pub mod rate_limit;
pub mod routes;

// Configuration
pub mod config;

// SOS validation and dispatch
pub mod sos;

// SMS gateway client
pub mod gateway;

pub use config::{Config, ConfigError};
pub use gateway::{BulkSmsGateway, GatewayError, SmsGateway};
pub use rate_limit::RateLimiter;
pub use sos::{Dispatcher, SosError};
