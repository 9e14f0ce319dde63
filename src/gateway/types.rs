//! Bulk-SMS API wire types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `POST /dev/bulkV2` call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BulkSmsRequest<'a> {
    pub route: &'a str,
    pub message: &'a str,
    pub language: &'a str,
    pub flash: u8,
    pub numbers: &'a str,
}

/// Provider reply. Only `return` is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkSmsResponse {
    #[serde(rename = "return", default)]
    pub accepted: Option<bool>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl BulkSmsResponse {
    /// Provider message flattened to one line.
    ///
    /// The provider sends either a string or a list of strings.
    pub fn message_text(&self) -> String {
        match &self.message {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Array(parts)) => parts
                .iter()
                .map(|part| match part {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            Some(other) => other.to_string(),
            None => "no reason given".to_string(),
        }
    }
}
