//! Confirm-password validator.

use crate::error::ValidationError;
use crate::result::ValidationResult;

/// Validates a confirmation against the sibling password value.
///
/// A missing sibling is treated as empty.
#[must_use]
pub fn validate(value: &str, password: Option<&str>) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid(ValidationError::required("Password confirmation"));
    }
    if password != Some(value) {
        return ValidationResult::invalid(ValidationError::new(
            "password_mismatch",
            "Passwords do not match",
        ));
    }
    ValidationResult::valid()
}
