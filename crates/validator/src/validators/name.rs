//! Person name validator.

use crate::error::ValidationError;
use crate::result::ValidationResult;

pub const MIN_LENGTH: usize = 2;
pub const MAX_LENGTH: usize = 50;
/// Names shorter than this are accepted with a warning.
pub const SHORT_NAME: usize = 3;

/// Validates a person's name.
///
/// Letters (any script), spaces, hyphens, apostrophes and periods are allowed.
#[must_use]
pub fn validate(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationError::required("Name"));
    }

    let mut result = ValidationResult::builder();
    let length = value.chars().count();

    if length < MIN_LENGTH {
        result.push(ValidationError::min_length("Name", MIN_LENGTH, length));
    }
    if length > MAX_LENGTH {
        result.push(ValidationError::max_length("Name", MAX_LENGTH, length));
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        result.push(ValidationError::new(
            "name_numeric",
            "Name cannot be only numbers",
        ));
    } else if !value
        .chars()
        .all(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '\'' | '.'))
    {
        result.push(ValidationError::new(
            "name_chars",
            "Name can only contain letters, spaces, hyphens, apostrophes and periods",
        ));
    }
    if length < SHORT_NAME {
        result.push(ValidationError::warning(
            "name_short",
            "This name is unusually short",
        ));
    }

    result.build()
}
