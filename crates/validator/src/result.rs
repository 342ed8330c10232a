//! Validation outcome of a single field value

use serde::{Deserialize, Serialize};

use crate::error::{ErrorSeverity, ValidationError};

// ============================================================================
// STRENGTH
// ============================================================================

/// Password strength classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    /// Classifies a 0..=6 point score.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            5.. => Self::Strong,
            3..=4 => Self::Medium,
            _ => Self::Weak,
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// Immutable outcome of validating one value.
///
/// Every validation run produces a fresh result. Errors make the result
/// invalid; warnings never do.
///
/// # Examples
///
/// ```
/// use formflow_validator::{ValidationError, ValidationResult};
///
/// let result = ValidationResult::builder()
///     .error(ValidationError::required("Email"))
///     .build();
/// assert!(!result.is_valid());
/// assert_eq!(result.error_messages(), vec!["Email is required"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strength: Option<Strength>,
}

impl ValidationResult {
    /// A valid result with no messages.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }

    /// An invalid result holding a single error.
    #[must_use]
    pub fn invalid(error: ValidationError) -> Self {
        Self::builder().error(error).build()
    }

    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> ResultBuilder {
        ResultBuilder::default()
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    #[must_use]
    pub const fn strength(&self) -> Option<Strength> {
        self.strength
    }

    /// Error messages in the order they were reported.
    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_ref()).collect()
    }

    /// Warning messages in the order they were reported.
    #[must_use]
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|e| e.message.as_ref()).collect()
    }

    #[must_use]
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Returns true if any error carries `code`.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Reopens the result as a builder, e.g. to merge another outcome.
    #[must_use]
    pub fn into_builder(self) -> ResultBuilder {
        ResultBuilder {
            errors: self.errors,
            warnings: self.warnings,
            strength: self.strength,
        }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Accumulates messages for a [`ValidationResult`].
#[derive(Debug, Clone, Default)]
pub struct ResultBuilder {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
    strength: Option<Strength>,
}

impl ResultBuilder {
    /// Records a message, routed by its severity.
    #[must_use = "builder methods must be chained or built"]
    pub fn error(mut self, error: ValidationError) -> Self {
        self.push(error);
        self
    }

    /// Records a warning regardless of the message's own severity.
    #[must_use = "builder methods must be chained or built"]
    pub fn warning(mut self, warning: ValidationError) -> Self {
        self.push(warning.with_severity(ErrorSeverity::Warning));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn strength(mut self, strength: Strength) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Appends another result's errors and warnings. Strength is kept from
    /// `self` unless unset.
    #[must_use = "builder methods must be chained or built"]
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.strength = self.strength.or(other.strength);
        self
    }

    /// Records a message in place.
    pub fn push(&mut self, error: ValidationError) {
        match error.severity {
            ErrorSeverity::Error => self.errors.push(error),
            ErrorSeverity::Warning => self.warnings.push(error),
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn build(self) -> ValidationResult {
        ValidationResult {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
            strength: self.strength,
        }
    }
}
