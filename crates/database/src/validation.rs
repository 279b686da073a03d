//! Input validation for user and complaint fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Phone number is not 10 digits.
    InvalidPhone(String),
    /// Pincode is not 6 digits.
    InvalidPincode(String),
    /// Value outside a fixed set.
    NotAllowed { field: String, value: String },
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Required(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidPhone(phone) => {
                write!(f, "Invalid phone number: {} (expected 10 digits)", phone)
            }
            ValidationError::InvalidPincode(pincode) => {
                write!(f, "Invalid pincode: {} (expected 6 digits)", pincode)
            }
            ValidationError::NotAllowed { field, value } => {
                write!(f, "{} is not a valid {}", value, field)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Required(field) => write!(f, "{} is required", capitalize(field)),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum length for district names.
pub const MAX_DISTRICT_LENGTH: usize = 50;

/// Maximum length for free-text locations.
pub const MAX_LOCATION_LENGTH: usize = 200;

/// Maximum length for coordinate strings.
pub const MAX_COORDINATES_LENGTH: usize = 50;

/// Maximum length for department names.
pub const MAX_DEPARTMENT_LENGTH: usize = 100;

/// Maximum length for display names.
pub const MAX_NAME_LENGTH: usize = 100;

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Require a non-blank value, returning it trimmed.
pub fn require<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Required(field.to_string())),
    }
}

/// Reject values longer than `max` characters.
pub fn validate_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

/// Validate a 10-digit phone number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone(phone.to_string()));
    }
    Ok(())
}

/// Validate a 6-digit pincode.
pub fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    if pincode.len() != 6 || !pincode.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPincode(pincode.to_string()));
    }
    Ok(())
}

/// Check a value against a fixed set of allowed values.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if !allowed.contains(&value) {
        return Err(ValidationError::NotAllowed {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}
