//! Email address validator.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::result::ValidationResult;

/// Maximum total length of an address.
pub const MAX_LENGTH: usize = 254;
/// Maximum length of the part before `@`.
pub const MAX_LOCAL_LENGTH: usize = 64;

const MAX_LABEL_LENGTH: usize = 63;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9.-]+$").expect("valid email regex")
});

/// Throwaway-mail providers. Matching addresses are accepted with a warning.
const DISPOSABLE_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "tempmail.com",
    "temp-mail.org",
    "throwawaymail.com",
    "trashmail.com",
    "yopmail.com",
];

/// Validates an email address.
///
/// The value is trimmed first. A shape failure stops further checks; the
/// length and domain checks otherwise all run.
///
/// ```
/// use formflow_validator::validators::email;
///
/// assert!(email::validate("user@example.com").is_valid());
/// assert!(!email::validate("bad-email").is_valid());
/// ```
#[must_use]
pub fn validate(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::invalid(ValidationError::required("Email"));
    }

    let Some((local, domain)) = value.rsplit_once('@').filter(|_| EMAIL_SHAPE.is_match(value))
    else {
        return ValidationResult::invalid(format_error());
    };
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return ValidationResult::invalid(format_error());
    }

    let mut result = ValidationResult::builder();
    let length = value.chars().count();
    if length > MAX_LENGTH {
        result.push(
            ValidationError::new("email_too_long", "Email must be at most 254 characters")
                .with_param("max", MAX_LENGTH.to_string())
                .with_param("actual", length.to_string()),
        );
    }
    if local.len() > MAX_LOCAL_LENGTH {
        result.push(
            ValidationError::new(
                "email_local_too_long",
                "The part before @ must be at most 64 characters",
            )
            .with_param("max", MAX_LOCAL_LENGTH.to_string()),
        );
    }
    if let Err(error) = check_domain(domain) {
        result.push(error);
    }

    if is_disposable(domain) {
        result.push(
            ValidationError::warning(
                "email_disposable",
                "Disposable email addresses may not receive our messages",
            )
            .with_param("domain", domain.to_ascii_lowercase()),
        );
    }

    result.build()
}

/// Returns true when `domain` belongs to a known throwaway provider.
#[must_use]
pub fn is_disposable(domain: &str) -> bool {
    let domain = domain.to_ascii_lowercase();
    DISPOSABLE_DOMAINS.contains(&domain.as_str())
}

fn format_error() -> ValidationError {
    ValidationError::new("email_format", "Enter a valid email address")
        .with_param("expected", "name@example.com")
}

fn check_domain(domain: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &'static str| {
        Err(ValidationError::new("email_domain", "Email domain is not valid")
            .with_param("reason", reason))
    };

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return invalid("missing_tld");
    }
    for label in &labels {
        if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
            return invalid("label_length");
        }
        if label.starts_with('-') || label.ends_with('-') {
            return invalid("label_hyphen");
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return invalid("label_chars");
        }
    }

    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return invalid("tld");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user@example.com")]
    #[case("  first.last+tag@mail.example.ng ")]
    #[case("o'neil@sub-domain.example.org")]
    fn accepts(#[case] value: &str) {
        let result = validate(value);
        assert!(result.is_valid(), "{value}: {:?}", result.error_messages());
    }

    #[rstest]
    #[case("bad-email", "email_format")]
    #[case("user@@example.com", "email_format")]
    #[case(".user@example.com", "email_format")]
    #[case("us..er@example.com", "email_format")]
    #[case("user@localhost", "email_domain")]
    #[case("user@-example.com", "email_domain")]
    #[case("user@example.c0m", "email_domain")]
    #[case("user@example..com", "email_domain")]
    fn rejects(#[case] value: &str, #[case] code: &str) {
        let result = validate(value);
        assert!(!result.is_valid());
        assert!(result.has_code(code), "{value}: {:?}", result.errors());
    }

    #[test]
    fn empty_is_required() {
        assert!(validate("   ").has_code("required"));
    }

    #[test]
    fn length_limits() {
        let local = "a".repeat(65);
        assert!(validate(&format!("{local}@example.com")).has_code("email_local_too_long"));

        let label = "b".repeat(62);
        let domain = format!("{label}.{label}.{label}.{label}.com");
        let result = validate(&format!("user@{domain}"));
        assert!(result.has_code("email_too_long"));
        assert!(!result.has_code("email_domain"));
    }

    #[test]
    fn disposable_domain_is_only_a_warning() {
        let result = validate("someone@Mailinator.com");
        assert!(result.is_valid());
        assert_eq!(result.warnings()[0].code, "email_disposable");
    }
}
