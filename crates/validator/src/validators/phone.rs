//! Phone number validator.
//!
//! Separators (spaces, dashes, dots, parentheses) are stripped before the
//! length and pattern checks.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::result::ValidationResult;

/// Digit count bounds after stripping separators.
pub const MIN_DIGITS: usize = 10;
pub const MAX_DIGITS: usize = 15;

static NIGERIA_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?234|0)?[789][01]\d{8}$").expect("valid Nigerian mobile regex")
});

static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{9,14}$").expect("valid E.164 regex"));

/// Numbering plan a phone field is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneCountry {
    /// Nigerian mobile: optional `+234`/`234`/`0`, a `[7-9][0-1]` prefix and
    /// eight more digits.
    #[default]
    Nigeria,
    /// E.164 international format: `+` and country code.
    International,
}

impl PhoneCountry {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::Nigeria => &NIGERIA_MOBILE,
            Self::International => &E164,
        }
    }

    const fn example(self) -> &'static str {
        match self {
            Self::Nigeria => "08031234567",
            Self::International => "+14155551234",
        }
    }
}

/// Removes formatting characters, keeping digits, `+` and anything unexpected.
#[must_use]
pub fn strip_separators(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Validates a phone number for `country`.
///
/// ```
/// use formflow_validator::validators::phone::{self, PhoneCountry};
///
/// assert!(phone::validate("0803 123 4567", PhoneCountry::Nigeria).is_valid());
/// assert!(phone::validate("+234 803 123 4567", PhoneCountry::Nigeria).is_valid());
/// assert!(!phone::validate("0603 123 4567", PhoneCountry::Nigeria).is_valid());
/// ```
#[must_use]
pub fn validate(value: &str, country: PhoneCountry) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationError::required("Phone number"));
    }

    let stripped = strip_separators(value);
    let digits = stripped.chars().filter(char::is_ascii_digit).count();
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        return ValidationResult::invalid(
            ValidationError::new(
                "phone_length",
                "Phone number must have between 10 and 15 digits",
            )
            .with_param("min", MIN_DIGITS.to_string())
            .with_param("max", MAX_DIGITS.to_string())
            .with_param("actual", digits.to_string()),
        );
    }

    if !country.pattern().is_match(&stripped) {
        return ValidationResult::invalid(
            ValidationError::new("phone_format", "Enter a valid phone number")
                .with_param("expected", country.example()),
        );
    }

    ValidationResult::valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("08031234567")]
    #[case("0803-123-4567")]
    #[case("+2348031234567")]
    #[case("2349011234567")]
    #[case("(0)7011234567")]
    #[case("8101234567")]
    fn nigerian_numbers(#[case] value: &str) {
        let result = validate(value, PhoneCountry::Nigeria);
        assert!(result.is_valid(), "{value}: {:?}", result.error_messages());
    }

    #[rstest]
    #[case("08231234567", "phone_format")]
    #[case("0803123456a", "phone_format")]
    #[case("0803123", "phone_length")]
    #[case("080312345678", "phone_format")]
    #[case("+14155551234", "phone_format")]
    fn rejected_nigerian_numbers(#[case] value: &str, #[case] code: &str) {
        assert!(validate(value, PhoneCountry::Nigeria).has_code(code));
    }

    #[test]
    fn international_requires_plus() {
        assert!(validate("+1 415 555 1234", PhoneCountry::International).is_valid());
        assert!(validate("14155551234", PhoneCountry::International).has_code("phone_format"));
    }

    #[test]
    fn empty_is_required() {
        assert!(validate(" ", PhoneCountry::default()).has_code("required"));
    }
}
