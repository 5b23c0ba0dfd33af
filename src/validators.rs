/// Input validators for user-supplied fields
/// Features:
/// 1. DoS Protection: Input length limits
/// 2. Data Theft Protection: control characters and null bytes rejected
/// 3. Email / phone format validation

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 100;
const MIN_PHONE_LENGTH: usize = 7;
const MAX_PHONE_LENGTH: usize = 20;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 ()\-]*[0-9]$").unwrap();
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    // local part longer than 64 octets is not deliverable
    if let Some(at_pos) = trimmed.find('@') {
        if at_pos > 64 {
            return Err(ValidationError::SuspiciousContent("email".to_string()));
        }
    }

    Ok(trimmed.to_string())
}

/// Validates a person or item name (2..=100 characters) and returns it trimmed
pub fn is_valid_name(field: &str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    let length = trimmed.chars().count();
    if length < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort(field.to_string(), MIN_NAME_LENGTH));
    }

    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(field.to_string(), MAX_NAME_LENGTH));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::SuspiciousContent(field.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates a phone number: digits with optional leading `+`, spaces,
/// dashes and parentheses
pub fn is_valid_phone(phone: &str) -> Result<String, ValidationError> {
    let trimmed = phone.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("phone".to_string()));
    }

    if trimmed.len() < MIN_PHONE_LENGTH {
        return Err(ValidationError::TooShort("phone".to_string(), MIN_PHONE_LENGTH));
    }

    if trimmed.len() > MAX_PHONE_LENGTH {
        return Err(ValidationError::TooLong("phone".to_string(), MAX_PHONE_LENGTH));
    }

    if !PHONE_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("phone".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Requires a non-blank value, returning it trimmed
pub fn require_non_empty(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com").is_ok());
        assert!(is_valid_email("test.email@domain.co.uk").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
        assert_eq!(is_valid_email("  a@b.com ").unwrap(), "a@b.com");
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(is_valid_email(&too_long).is_err());

        assert!(is_valid_email("a@b").is_err()); // Too short
    }

    #[test]
    fn test_valid_name() {
        assert_eq!(is_valid_name("firstName", " John ").unwrap(), "John");
        assert!(is_valid_name("firstName", "Jean-Pierre").is_ok());
        assert!(is_valid_name("lastName", "O'Brien").is_ok());
    }

    #[test]
    fn test_name_length_limits() {
        assert!(matches!(
            is_valid_name("firstName", "J"),
            Err(ValidationError::TooShort(_, 2))
        ));
        assert!(is_valid_name("firstName", &"a".repeat(101)).is_err());
        assert!(is_valid_name("firstName", &"a".repeat(100)).is_ok());
        assert!(is_valid_name("firstName", "").is_err());
    }

    #[test]
    fn test_control_characters() {
        assert!(is_valid_name("name", "Na\0me").is_err());
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("+1 (555) 123-4567").is_ok());
        assert!(is_valid_phone("5551234567").is_ok());
        assert!(is_valid_phone("12345").is_err());
        assert!(is_valid_phone("call-me-maybe").is_err());
        assert!(is_valid_phone("").is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("category", " Dinner ").unwrap(), "Dinner");
        assert!(require_non_empty("category", "   ").is_err());
    }
}
