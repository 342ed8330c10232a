//! Errors raised by form and wizard operations, and the uniform notice
//! consumed by the presentation layer.

use std::error::Error as StdError;

use formflow_validator::ConfigError;
use serde::Serialize;

use crate::key::FieldKey;

/// Error type for form and wizard operations.
///
/// Field validation failures are never errors: they are stored as
/// [`ValidationResult`](formflow_validator::ValidationResult)s. The only error
/// that comes from outside the form is [`FormError::Submission`].
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The field is not declared in the form schema.
    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    /// Two fields in a schema share a key.
    #[error("field `{field}` is declared more than once")]
    DuplicateField { field: String },

    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    AlreadySubmitting,

    /// The form was locked by a successful wizard completion.
    #[error("form is locked after a successful submission")]
    Locked,

    /// `next()` was called on the last step.
    #[error("step {step} is the last step")]
    NoNextStep { step: usize },

    /// Completion was requested before the last step.
    #[error("step {step} of {total} is not the final step")]
    NotFinalStep { step: usize, total: usize },

    /// The wizard already reached its success state.
    #[error("wizard has already completed")]
    WizardCompleted,

    /// A schema or wizard definition could not be loaded.
    #[error("invalid form schema: {0}")]
    Schema(String),

    /// A field carries an unusable validation config.
    #[error("invalid config for `{field}`: {source}")]
    Config {
        field: String,
        #[source]
        source: ConfigError,
    },

    /// The submission sink rejected the values.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl FormError {
    pub(crate) fn unknown(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::UnknownField { .. } | Self::DuplicateField { .. } => "field",
            Self::AlreadySubmitting | Self::Locked => "state",
            Self::NoNextStep { .. } | Self::NotFinalStep { .. } | Self::WizardCompleted => {
                "wizard"
            }
            Self::Schema(_) | Self::Config { .. } => "schema",
            Self::Submission(_) => "submission",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::UnknownField { .. } => "FORM_UNKNOWN_FIELD",
            Self::DuplicateField { .. } => "FORM_DUPLICATE_FIELD",
            Self::AlreadySubmitting => "FORM_ALREADY_SUBMITTING",
            Self::Locked => "FORM_LOCKED",
            Self::NoNextStep { .. } => "WIZARD_NO_NEXT_STEP",
            Self::NotFinalStep { .. } => "WIZARD_NOT_FINAL_STEP",
            Self::WizardCompleted => "WIZARD_COMPLETED",
            Self::Schema(_) => "FORM_SCHEMA",
            Self::Config { .. } => "FORM_CONFIG",
            Self::Submission(_) => "FORM_SUBMISSION",
        }
    }

    /// The notice to show for this error.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Submission(err) => err.notice(),
            other => Notice::form(other.code(), other.to_string()),
        }
    }
}

// ============================================================================
// SUBMISSION ERROR
// ============================================================================

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Rejection reported by a [`SubmissionSink`](crate::SubmissionSink).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SubmissionError {
    message: String,
    code: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Wraps a transport or backend error, using its display as the message.
    pub fn from_error(error: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: error.to_string(),
            code: None,
            source: Some(Box::new(error)),
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::form(self.code().unwrap_or("submission_failed"), &self.message)
    }
}

// ============================================================================
// NOTICE
// ============================================================================

/// One user-visible report, either attached to a field or to the whole form.
///
/// Field validation messages, step blocks, cross-field failures and
/// submission errors all surface through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Notice {
    /// Inline messages for one field.
    Field {
        field: FieldKey,
        messages: Vec<String>,
    },
    /// A single aggregated message for the form or step.
    Form { code: String, message: String },
}

impl Notice {
    pub fn field(field: FieldKey, messages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Field {
            field,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn form(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Form {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The notice as a single line of text.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Field { messages, .. } => messages.join("; "),
            Self::Form { message, .. } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct Transport;

    #[test]
    fn submission_error_keeps_source() {
        let err = SubmissionError::from_error(Transport).with_code("network");
        assert_eq!(err.message(), "connection reset");
        assert!(StdError::source(&err).is_some());
        assert_eq!(
            err.notice(),
            Notice::form("network", "connection reset")
        );
    }

    #[test]
    fn form_error_wraps_submission() {
        let err = FormError::from(SubmissionError::new("Server unavailable"));
        assert_eq!(err.code(), "FORM_SUBMISSION");
        assert_eq!(err.category(), "submission");
        assert_eq!(err.to_string(), "Server unavailable");
        assert_eq!(err.notice().text(), "Server unavailable");
    }

    #[test]
    fn notice_serializes_tagged() {
        let notice = Notice::field(FieldKey::from("email"), ["Enter a valid email address"]);
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "scope": "field",
                "field": "email",
                "messages": ["Enter a valid email address"]
            })
        );
    }
}
