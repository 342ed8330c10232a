//! Error records produced by validators
//!
//! A [`ValidationError`] is data, never a thrown error: validators collect them
//! into a [`ValidationResult`](crate::ValidationResult) and hand that back.
//!
//! All string fields use `Cow<'static, str>` so static codes and messages do
//! not allocate.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A structured validation message.
///
/// # Examples
///
/// ```
/// use formflow_validator::ValidationError;
///
/// let error = ValidationError::new("min_length", "Must be at least 8 characters")
///     .with_param("min", "8")
///     .with_param("actual", "5");
/// assert_eq!(error.param("min"), Some("8"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Error code for programmatic handling and i18n.
    ///
    /// Examples: "required", "email_format", "password_uppercase"
    pub code: Cow<'static, str>,

    /// Human-readable message.
    pub message: Cow<'static, str>,

    /// Parameters for message templating, in insertion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,

    /// Whether this message blocks validity.
    pub severity: ErrorSeverity,
}

/// Severity level of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Must be fixed; makes the result invalid.
    #[default]
    Error,
    /// Shown to the user but does not affect validity.
    Warning,
}

impl ValidationError {
    /// Creates a new error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: Vec::new(),
            severity: ErrorSeverity::Error,
        }
    }

    /// Creates a warning, which never affects validity.
    pub fn warning(
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(code, message).with_severity(ErrorSeverity::Warning)
    }

    /// Adds a parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Sets the severity level.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Returns true for [`ErrorSeverity::Warning`].
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity == ErrorSeverity::Warning
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl ValidationError {
    /// Creates a "required" error.
    pub fn required(label: &str) -> Self {
        Self::new("required", format!("{label} is required"))
    }

    /// Creates a "min_length" error.
    pub fn min_length(label: &str, min: usize, actual: usize) -> Self {
        Self::new(
            "min_length",
            format!("{label} must be at least {min} characters"),
        )
        .with_param("min", min.to_string())
        .with_param("actual", actual.to_string())
    }

    /// Creates a "max_length" error.
    pub fn max_length(label: &str, max: usize, actual: usize) -> Self {
        Self::new(
            "max_length",
            format!("{label} must be at most {max} characters"),
        )
        .with_param("max", max.to_string())
        .with_param("actual", actual.to_string())
    }

    /// Creates an "invalid_format" error.
    pub fn invalid_format(
        message: impl Into<Cow<'static, str>>,
        expected: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new("invalid_format", message).with_param("expected", expected)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_error() {
        let error = ValidationError::new("test", "Test error");
        assert_eq!(error.code, "test");
        assert_eq!(error.message, "Test error");
        assert!(!error.is_warning());
    }

    #[test]
    fn test_error_with_params() {
        let error = ValidationError::min_length("Password", 8, 3);
        assert_eq!(error.param("min"), Some("8"));
        assert_eq!(error.param("actual"), Some("3"));
        assert_eq!(error.param("max"), None);
    }

    #[test]
    fn test_warning_severity() {
        let warning = ValidationError::warning("short_name", "Name is very short");
        assert!(warning.is_warning());
    }

    #[test]
    fn test_display() {
        let error = ValidationError::required("Email");
        assert_eq!(error.to_string(), "required: Email is required");
    }

    #[test]
    fn test_zero_alloc_static_strings() {
        let error = ValidationError::new("required", "This field is required");
        assert!(matches!(error.code, Cow::Borrowed(_)));
        assert!(matches!(error.message, Cow::Borrowed(_)));
    }
}
