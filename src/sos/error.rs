//! Validation errors for alert requests

use thiserror::Error;

use crate::models::ErrorResponse;

/// Reasons an alert request is rejected before anything is sent.
///
/// The `Display` text of each variant is part of the wire contract and is
/// returned verbatim as the `error` field of the `400` body.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SosError {
    #[error("Invalid or empty contacts list")]
    InvalidContacts,

    #[error("Too many contacts. Maximum {max} allowed.")]
    TooManyContacts { max: usize },

    #[error("Invalid message length. Maximum {max} characters.")]
    InvalidMessageLength { max: usize },

    /// Every offending phone, in input order
    #[error("Invalid phone numbers detected")]
    InvalidPhones(Vec<String>),
}

impl SosError {
    /// Build the JSON body for this error.
    pub fn to_response(&self) -> ErrorResponse {
        let body = ErrorResponse::new(self.to_string());
        match self {
            SosError::InvalidPhones(phones) => body.with_invalid_phones(phones.clone()),
            _ => body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(
            SosError::InvalidContacts.to_string(),
            "Invalid or empty contacts list"
        );
        assert_eq!(
            SosError::TooManyContacts { max: 10 }.to_string(),
            "Too many contacts. Maximum 10 allowed."
        );
        assert_eq!(
            SosError::InvalidMessageLength { max: 160 }.to_string(),
            "Invalid message length. Maximum 160 characters."
        );
        assert_eq!(
            SosError::InvalidPhones(vec![]).to_string(),
            "Invalid phone numbers detected"
        );
    }

    #[test]
    fn test_invalid_phones_response_lists_phones() {
        let err = SosError::InvalidPhones(vec!["12345".to_string(), "abc".to_string()]);
        let body = err.to_response();
        assert_eq!(body.error, "Invalid phone numbers detected");
        assert_eq!(
            body.invalid_phones,
            Some(vec!["12345".to_string(), "abc".to_string()])
        );
    }

    #[test]
    fn test_other_responses_have_no_phone_list() {
        let body = SosError::TooManyContacts { max: 10 }.to_response();
        assert!(body.invalid_phones.is_none());
        assert!(body.message.is_none());
    }
}
