//! Collaborators at the form boundary: where values come from and where they
//! are sent.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{Notice, SubmissionError};
use crate::key::FieldValues;

/// Receives the values of a valid form.
///
/// Implementations usually wrap a network client. Any rejection is reported
/// back to the caller of the submit operation as
/// [`FormError::Submission`](crate::FormError::Submission).
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// What a successful submission yields.
    type Payload: Send;

    async fn submit(&self, values: &FieldValues) -> Result<Self::Payload, SubmissionError>;
}

/// Supplies initial values, read when a form is built or reset.
pub trait PrefillSource {
    fn initial_values(&self) -> FieldValues;
}

impl PrefillSource for FieldValues {
    fn initial_values(&self) -> FieldValues {
        self.clone()
    }
}

/// Result of a submit attempt that reached the validation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SubmitOutcome<T> {
    /// The sink accepted the values.
    Submitted(T),
    /// Validation failed; the sink was not called.
    Invalid(Vec<Notice>),
}

impl<T> SubmitOutcome<T> {
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// The payload, if the submission went through.
    pub fn submitted(self) -> Option<T> {
        match self {
            Self::Submitted(payload) => Some(payload),
            Self::Invalid(_) => None,
        }
    }
}
