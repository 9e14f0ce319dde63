//! All-or-nothing validation of `POST /api/send-sos` bodies

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::error::SosError;
use crate::models::{AlertRequest, Contact, SendSosRequest};

/// Maximum number of contacts a single alert may target.
pub const MAX_CONTACTS: usize = 10;

/// Maximum message length, in characters.
pub const MAX_MESSAGE_LEN: usize = 160;

/// Sent when the caller omits the message or leaves it empty.
pub const DEFAULT_MESSAGE: &str = "Emergency! I need help! This is an SOS alert.";

// ASCII only; `\d` would also admit non-latin digits
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("Failed to compile phone regex"));

/// Check a raw request and turn it into an [`AlertRequest`].
///
/// Checks run in a fixed order and stop at the first failing one:
/// contacts present, contact count, message length, phone formats. The
/// phone check collects every offending number rather than stopping at the
/// first.
pub fn validate(request: SendSosRequest) -> Result<AlertRequest, SosError> {
    let entries = match request.contacts {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return Err(SosError::InvalidContacts),
    };

    if entries.len() > MAX_CONTACTS {
        return Err(SosError::TooManyContacts { max: MAX_CONTACTS });
    }

    let message = effective_message(request.message)?;

    let mut contacts = Vec::with_capacity(entries.len());
    let mut invalid_phones = Vec::new();
    for entry in &entries {
        match phone_of(entry) {
            Some(phone) if is_valid_phone(phone) => contacts.push(Contact {
                phone: phone.to_string(),
                name: entry.get("name").cloned(),
            }),
            _ => invalid_phones.push(display_phone(entry)),
        }
    }

    if !invalid_phones.is_empty() {
        return Err(SosError::InvalidPhones(invalid_phones));
    }

    Ok(AlertRequest { contacts, message })
}

/// Whether `phone` is exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

fn effective_message(message: Option<Value>) -> Result<String, SosError> {
    let text = match message {
        None | Some(Value::Null) => return Ok(DEFAULT_MESSAGE.to_string()),
        Some(Value::String(text)) if text.is_empty() => return Ok(DEFAULT_MESSAGE.to_string()),
        Some(Value::String(text)) => text,
        Some(_) => return Err(SosError::InvalidMessageLength { max: MAX_MESSAGE_LEN }),
    };

    if text.chars().count() > MAX_MESSAGE_LEN {
        return Err(SosError::InvalidMessageLength { max: MAX_MESSAGE_LEN });
    }

    Ok(text)
}

fn phone_of(entry: &Value) -> Option<&str> {
    entry.get("phone").and_then(Value::as_str)
}

// How a rejected phone is echoed back in `invalidPhones`
fn display_phone(entry: &Value) -> String {
    match entry.get("phone") {
        Some(Value::String(phone)) => phone.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
