// Data structures (alert requests, delivery outcomes, response bodies)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Request Types

/// Raw `POST /api/send-sos` body.
///
/// Fields are kept untyped so that a wrong-typed `contacts` or `message`
/// surfaces as a validation error with a stable message instead of a
/// generic JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendSosRequest {
    pub contacts: Option<Value>,
    pub message: Option<Value>,
}

/// A single recipient of an alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub phone: String,
    /// Display-only. Passed through untouched and never validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
}

impl Contact {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            name: None,
        }
    }
}

/// A request that passed validation and is ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRequest {
    pub contacts: Vec<Contact>,
    pub message: String,
}

// Delivery Types

/// A single failed delivery, as reported back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryFailure {
    pub phone: String,
    pub error: String,
}

/// Result of one gateway attempt for one contact.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Success,
    Failure(DeliveryFailure),
}

/// Aggregate of every delivery attempted for one alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertResult {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl AlertResult {
    /// Partition a set of outcomes into counts and a failure list.
    pub fn from_outcomes(outcomes: Vec<DeliveryOutcome>) -> Self {
        let total = outcomes.len();
        let failures: Vec<DeliveryFailure> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                DeliveryOutcome::Success => None,
                DeliveryOutcome::Failure(failure) => Some(failure),
            })
            .collect();

        Self {
            total,
            success_count: total - failures.len(),
            failure_count: failures.len(),
            failures,
        }
    }
}

// Response Types

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Body of a `200` reply to `POST /api/send-sos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendSosResponse {
    pub success: bool,
    pub summary: Summary,
    // Omitted entirely when every delivery succeeded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DeliveryFailure>,
}

impl From<AlertResult> for SendSosResponse {
    fn from(result: AlertResult) -> Self {
        Self {
            success: true,
            summary: Summary {
                total: result.total,
                successful: result.success_count,
                failed: result.failure_count,
            },
            failures: result.failures,
        }
    }
}

/// Body of every non-`200` reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(
        rename = "invalidPhones",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub invalid_phones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            invalid_phones: None,
            message: None,
        }
    }

    pub fn with_invalid_phones(mut self, phones: Vec<String>) -> Self {
        self.invalid_phones = Some(phones);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}
