// Field checks shared by entity validation and order intake

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;

/// Standard IMEI length (14 digits plus Luhn check digit)
pub const DEFAULT_IMEI_LENGTH: usize = 15;

static DIGITS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digit pattern compiles"));

pub fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub fn require_email(field: &str, value: &str) -> Result<(), ValidationError> {
    require_non_empty(field, value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::new(field, format!("'{value}' is not an email address"))),
    }
}

/// IMEI must be exactly `expected_len` ASCII digits
pub fn require_imei(field: &str, value: &str, expected_len: usize) -> Result<(), ValidationError> {
    let value = value.trim();
    if !DIGITS_ONLY.is_match(value) {
        return Err(ValidationError::new(field, "must contain digits only"));
    }
    if value.len() != expected_len {
        return Err(ValidationError::new(
            field,
            format!("must be {expected_len} digits, got {}", value.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("brand", "Apple").is_ok());
        let err = require_non_empty("brand", "   ").unwrap_err();
        assert_eq!(err.field, "brand");
    }

    #[test]
    fn test_require_email() {
        assert!(require_email("email", "ops@refurb.example").is_ok());
        assert!(require_email("email", "ops").is_err());
        assert!(require_email("email", "@refurb.example").is_err());
        assert!(require_email("email", "").is_err());
    }

    #[test]
    fn test_require_imei() {
        assert!(require_imei("imei", "356938035643809", 15).is_ok());
        assert!(require_imei("imei", " 356938035643809 ", 15).is_ok());
        assert!(require_imei("imei", "35693803564380", 15).is_err());
        assert!(require_imei("imei", "35693803564380X", 15).is_err());
        assert!(require_imei("imei", "", 15).is_err());
    }
}
