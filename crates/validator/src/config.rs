//! Declarative per-field validation contract and the generic validator
//! driven by it.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::result::ValidationResult;
use crate::traits::Validate;

/// Default debounce delay for real-time validation.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

// ============================================================================
// CONFIG ERROR
// ============================================================================

/// A field configuration that can never validate correctly.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("min_length {min} exceeds max_length {max}")]
    LengthBounds { min: usize, max: usize },
}

impl ConfigError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "CONFIG_INVALID_PATTERN",
            Self::LengthBounds { .. } => "CONFIG_LENGTH_BOUNDS",
        }
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        "config"
    }
}

// ============================================================================
// PATTERN
// ============================================================================

/// A regex compiled when the configuration is loaded.
///
/// Serializes as its source string; an invalid regex fails deserialization.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles `source`.
    pub fn new(source: &str) -> Result<Self, ConfigError> {
        Regex::new(source)
            .map(Self)
            .map_err(|source_err| ConfigError::InvalidPattern {
                pattern: source.to_string(),
                source: Box::new(source_err),
            })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl TryFrom<String> for Pattern {
    type Error = ConfigError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(&source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.0.as_str().to_string()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

// ============================================================================
// CUSTOM VALIDATOR
// ============================================================================

/// Code-only extra check run after the declarative ones.
#[derive(Clone)]
pub struct CustomValidator(Arc<dyn Validate>);

impl CustomValidator {
    pub fn new(validator: impl Validate + 'static) -> Self {
        Self(Arc::new(validator))
    }

    #[must_use]
    pub fn validate(&self, value: &str) -> ValidationResult {
        self.0.validate(value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

// ============================================================================
// VALIDATION CONFIG
// ============================================================================

/// Per-field declarative validation contract.
///
/// # Examples
///
/// ```
/// use formflow_validator::ValidationConfig;
///
/// let config = ValidationConfig::builder()
///     .required(true)
///     .min_length(3)
///     .pattern(r"^[a-z]+$")
///     .build()
///     .unwrap();
///
/// assert!(config.validate("Username", "alice").is_valid());
/// assert!(!config.validate("Username", "").is_valid());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    /// Message reported when `pattern` does not match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_message: Option<String>,
    #[serde(skip)]
    pub custom_validator: Option<CustomValidator>,
    /// Validate while typing (debounced). When false, validation runs only on
    /// blur and submit.
    pub real_time: bool,
    pub debounce_ms: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            pattern_message: None,
            custom_validator: None,
            real_time: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl ValidationConfig {
    #[must_use]
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }

    /// Rejects length bounds that no value can satisfy.
    pub fn check(&self) -> Result<(), ConfigError> {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) if min > max => Err(ConfigError::LengthBounds { min, max }),
            _ => Ok(()),
        }
    }

    /// Runs the generic algorithm against `value`.
    ///
    /// An empty (whitespace-only) value short-circuits: required yields a
    /// single error, optional yields a valid result. Otherwise every check
    /// runs and all violations are reported together, in the order length,
    /// pattern, custom.
    #[must_use]
    pub fn validate(&self, label: &str, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            return if self.required {
                ValidationResult::invalid(ValidationError::required(label))
            } else {
                ValidationResult::valid()
            };
        }

        let mut result = ValidationResult::builder();
        let length = value.chars().count();

        if let Some(min) = self.min_length.filter(|&min| length < min) {
            result.push(ValidationError::min_length(label, min, length));
        }
        if let Some(max) = self.max_length.filter(|&max| length > max) {
            result.push(ValidationError::max_length(label, max, length));
        }
        if let Some(pattern) = self.pattern.as_ref().filter(|p| !p.is_match(value)) {
            let message = self
                .pattern_message
                .clone()
                .unwrap_or_else(|| format!("{label} has an invalid format"));
            result.push(ValidationError::invalid_format(
                message,
                pattern.as_str().to_string(),
            ));
        }
        if let Some(custom) = &self.custom_validator {
            result = result.merge(custom.validate(value));
        }

        result.build()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`ValidationConfig`]; the pattern is compiled in
/// [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ValidationConfigBuilder {
    config: ValidationConfig,
    pattern: Option<String>,
}

impl ValidationConfigBuilder {
    #[must_use = "builder methods must be chained or built"]
    pub const fn required(mut self, required: bool) -> Self {
        self.config.required = required;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn min_length(mut self, min: usize) -> Self {
        self.config.min_length = Some(min);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.config.max_length = Some(max);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn pattern_message(mut self, message: impl Into<String>) -> Self {
        self.config.pattern_message = Some(message.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn custom(mut self, validator: impl Validate + 'static) -> Self {
        self.config.custom_validator = Some(CustomValidator::new(validator));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn real_time(mut self, real_time: bool) -> Self {
        self.config.real_time = real_time;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.config.debounce_ms = debounce_ms;
        self
    }

    /// Compiles the pattern and checks the length bounds.
    pub fn build(self) -> Result<ValidationConfig, ConfigError> {
        let mut config = self.config;
        if let Some(source) = self.pattern {
            config.pattern = Some(Pattern::new(&source)?);
        }
        config.check()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn username() -> ValidationConfig {
        ValidationConfig::builder()
            .required(true)
            .min_length(3)
            .max_length(5)
            .pattern("^[a-z]+$")
            .pattern_message("Lowercase letters only")
            .build()
            .unwrap()
    }

    #[test]
    fn required_empty_short_circuits() {
        let result = username().validate("Username", "   ");
        assert_eq!(result.error_messages(), vec!["Username is required"]);
    }

    #[test]
    fn optional_empty_skips_other_checks() {
        let config = ValidationConfig::builder()
            .min_length(3)
            .custom(|_: &str| ValidationResult::invalid(ValidationError::new("never", "ran")))
            .build()
            .unwrap();
        assert!(config.validate("Nickname", "").is_valid());
    }

    #[test]
    fn all_violations_are_reported() {
        let result = username().validate("Username", "AB");
        assert_eq!(
            result.error_messages(),
            vec![
                "Username must be at least 3 characters",
                "Lowercase letters only"
            ]
        );
    }

    #[test]
    fn custom_errors_merge_after_declarative_ones() {
        let config = ValidationConfig::builder()
            .max_length(3)
            .custom(|value: &str| {
                if value.starts_with('x') {
                    ValidationResult::invalid(ValidationError::new("no_x", "Cannot start with x"))
                } else {
                    ValidationResult::valid()
                }
            })
            .build()
            .unwrap();
        let result = config.validate("Code", "xyzzy");
        assert!(result.has_code("max_length"));
        assert!(result.has_code("no_x"));
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let config = ValidationConfig::builder().max_length(3).build().unwrap();
        assert!(config.validate("City", "\u{c9}t\u{e9}").is_valid());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = ValidationConfig::builder().pattern("(").build().unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID_PATTERN");
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = ValidationConfig::builder()
            .min_length(10)
            .max_length(2)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::LengthBounds { min: 10, max: 2 }));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ValidationConfig =
            serde_json::from_str(r#"{"required": true, "pattern": "^\\d+$"}"#).unwrap();
        assert!(config.required);
        assert!(config.real_time);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert!(!config.validate("Code", "12a").is_valid());
    }

    #[test]
    fn bad_regex_fails_deserialization() {
        let parsed = serde_json::from_str::<ValidationConfig>(r#"{"pattern": "[unclosed"}"#);
        assert!(parsed.is_err());
    }
}
