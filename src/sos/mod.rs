//! SOS alert dispatch
//!
//! Validation of incoming alerts and the concurrent fan-out of one SMS per
//! contact through an [`SmsGateway`](crate::gateway::SmsGateway).

pub mod dispatcher;
pub mod error;
pub mod validation;

pub use dispatcher::{Dispatcher, DELIVERY_TIMEOUT};
pub use error::SosError;
pub use validation::{validate, DEFAULT_MESSAGE, MAX_CONTACTS, MAX_MESSAGE_LEN};
