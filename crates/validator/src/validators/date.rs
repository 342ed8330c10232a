//! ISO calendar date validator (`YYYY-MM-DD`).

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::result::ValidationResult;

pub const FORMAT: &str = "%Y-%m-%d";

/// Parses a trimmed ISO date.
#[must_use]
pub fn parse(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), FORMAT).ok()
}

/// Validates a required calendar date.
#[must_use]
pub fn validate(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::invalid(ValidationError::required("Date"));
    }
    match parse(value) {
        Some(_) => ValidationResult::valid(),
        None => ValidationResult::invalid(ValidationError::invalid_format(
            "Enter a date as YYYY-MM-DD",
            "YYYY-MM-DD",
        )),
    }
}
