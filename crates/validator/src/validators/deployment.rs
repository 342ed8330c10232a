//! Service deployment record codes: call-up number, batch label, state code
//! and stream.
//!
//! All codes are trimmed and matched case-insensitively.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::result::ValidationResult;

/// Two-letter codes of the 36 states and the Federal Capital Territory.
pub const STATE_CODES: [&str; 37] = [
    "AB", "AD", "AK", "AN", "BA", "BY", "BN", "BO", "CR", "DT", "EB", "ED", "EK", "EN", "FC",
    "GM", "IM", "JG", "KD", "KN", "KT", "KB", "KG", "KW", "LA", "NS", "NG", "OG", "OD", "OS",
    "OY", "PL", "RV", "SO", "TR", "YB", "ZM",
];

/// Allowed stream letters.
pub const STREAMS: [&str; 3] = ["A", "B", "C"];

/// First year a batch could have been mobilized.
pub const FIRST_BATCH_YEAR: i32 = 1973;

static CALL_UP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^NYSC/\d{4}/[ABC]/([A-Z]{2})/[ABC]/\d{4,}$").expect("valid call-up regex")
});

static BATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}) BATCH ([ABC])$").expect("valid batch regex"));

fn normalize(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Returns true for a known state code.
#[must_use]
pub fn is_state_code(code: &str) -> bool {
    STATE_CODES.contains(&normalize(code).as_str())
}

// ============================================================================
// CALL-UP NUMBER
// ============================================================================

/// Validates a call-up number such as `NYSC/2023/B/LA/A/12345`.
///
/// ```
/// use formflow_validator::validators::deployment;
///
/// assert!(deployment::validate_call_up("NYSC/2023/B/LA/A/12345").is_valid());
/// assert!(!deployment::validate_call_up("NYSC/2023/B/LA/A/1").is_valid());
/// ```
#[must_use]
pub fn validate_call_up(value: &str) -> ValidationResult {
    let value = normalize(value);
    if value.is_empty() {
        return ValidationResult::invalid(ValidationError::required("Call-up number"));
    }

    let Some(captures) = CALL_UP.captures(&value) else {
        return ValidationResult::invalid(ValidationError::invalid_format(
            "Call-up number must look like NYSC/2023/B/LA/A/12345",
            "NYSC/YYYY/[A|B|C]/XX/[A|B|C]/NNNN",
        ));
    };

    let state = &captures[1];
    if !is_state_code(state) {
        return ValidationResult::invalid(
            ValidationError::new("call_up_state", "Call-up number has an unknown state code")
                .with_param("state", state.to_string()),
        );
    }

    ValidationResult::valid()
}

// ============================================================================
// BATCH
// ============================================================================

/// Inclusive range of accepted batch years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// `[1973, current year + 1]`, from the local clock.
    #[must_use]
    pub fn up_to_next_year() -> Self {
        Self {
            min: FIRST_BATCH_YEAR,
            max: chrono::Local::now().year() + 1,
        }
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::up_to_next_year()
    }
}

/// Validates a batch label such as `2023 BATCH A`.
#[must_use]
pub fn validate_batch(value: &str, years: YearRange) -> ValidationResult {
    let value = normalize(value);
    if value.is_empty() {
        return ValidationResult::invalid(ValidationError::required("Batch"));
    }

    let Some(captures) = BATCH.captures(&value) else {
        return ValidationResult::invalid(ValidationError::invalid_format(
            "Batch must look like 2023 BATCH A",
            "YYYY BATCH [A|B|C]",
        ));
    };

    let year: i32 = captures[1].parse().unwrap_or_default();
    if !years.contains(year) {
        return ValidationResult::invalid(
            ValidationError::new(
                "batch_year",
                format!("Batch year must be between {} and {}", years.min, years.max),
            )
            .with_param("min", years.min.to_string())
            .with_param("max", years.max.to_string())
            .with_param("actual", year.to_string()),
        );
    }

    ValidationResult::valid()
}

// ============================================================================
// STATE CODE / STREAM
// ============================================================================

/// Validates a two-letter state code against the fixed allow-list.
#[must_use]
pub fn validate_state_code(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::invalid(ValidationError::required("State code"));
    }
    if is_state_code(value) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(ValidationError::new(
            "state_code",
            "Enter a valid state code",
        ))
    }
}

/// Validates a stream letter (A, B or C).
#[must_use]
pub fn validate_stream(value: &str) -> ValidationResult {
    let value = normalize(value);
    if value.is_empty() {
        return ValidationResult::invalid(ValidationError::required("Stream"));
    }
    if STREAMS.contains(&value.as_str()) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(ValidationError::new(
            "stream",
            "Stream must be A, B or C",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const YEARS: YearRange = YearRange {
        min: FIRST_BATCH_YEAR,
        max: 2027,
    };

    #[test]
    fn allow_list_has_every_state() {
        assert_eq!(STATE_CODES.len(), 37);
        let mut sorted = STATE_CODES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 37);
    }

    #[rstest]
    #[case("NYSC/2023/B/LA/A/12345", true)]
    #[case("  nysc/2019/a/fc/c/0001 ", true)]
    #[case("NYSC/2023/B/LA/A/1", false)]
    #[case("NYSC/2023/D/LA/A/12345", false)]
    #[case("NYSC/23/B/LA/A/12345", false)]
    #[case("NYSC/2023/B/ZZ/A/12345", false)]
    fn call_up_numbers(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(validate_call_up(value).is_valid(), valid, "{value}");
    }

    #[test]
    fn call_up_reports_unknown_state() {
        let result = validate_call_up("NYSC/2023/B/ZZ/A/12345");
        assert!(result.has_code("call_up_state"));
    }

    #[rstest]
    #[case("2023 BATCH A", true)]
    #[case("2023 batch c", true)]
    #[case("1973 BATCH B", true)]
    #[case("1972 BATCH B", false)]
    #[case("2028 BATCH A", false)]
    #[case("2023 BATCH D", false)]
    #[case("2023-BATCH-A", false)]
    fn batches(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(validate_batch(value, YEARS).is_valid(), valid, "{value}");
    }

    #[test]
    fn default_range_accepts_next_year() {
        let next = chrono::Local::now().year() + 1;
        let label = format!("{next} BATCH A");
        assert!(validate_batch(&label, YearRange::default()).is_valid());
    }

    #[rstest]
    #[case("LA", true)]
    #[case("fc", true)]
    #[case(" KN ", true)]
    #[case("ZZ", false)]
    #[case("LAG", false)]
    fn state_codes(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(validate_state_code(value).is_valid(), valid);
    }

    #[rstest]
    #[case("A", true)]
    #[case("c", true)]
    #[case("D", false)]
    #[case("AB", false)]
    fn streams(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(validate_stream(value).is_valid(), valid);
    }
}
