//! # formflow-form
//!
//! Form state and step flow on top of `formflow-validator`.
//!
//! - [`FormController`] owns values, results, touched flags and the
//!   submitting flag of one form.
//! - [`DebounceScheduler`] delays validation while the user types and
//!   guarantees a superseded value is never validated.
//! - [`WizardController`] walks a form through [`StepDescriptor`]s, gating
//!   each transition on the step's fields.
//! - [`flows`] ships the registration, password reset, booking and checkout
//!   flows.
//!
//! ## Quick Start
//!
//! ```
//! use formflow_form::{FormController, FormSchema, SubmissionError, SubmitOutcome};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), formflow_form::FormError> {
//! let schema = FormSchema::from_toml(r#"
//!     [[fields]]
//!     key = "email"
//!
//!     [[fields]]
//!     key = "password"
//! "#)?;
//! let form = FormController::new(schema);
//!
//! form.set_value("email", "user@example.com")?;
//! form.set_value("password", "Str0ng!Pass1")?;
//!
//! let outcome = form
//!     .handle_submit(|values| async move {
//!         Ok::<_, SubmissionError>(values.len())
//!     })
//!     .await?;
//! assert_eq!(outcome, SubmitOutcome::Submitted(2));
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod error;
pub mod flows;
pub mod hint;
pub mod key;
pub mod options;
pub mod scheduler;
pub mod schema;
pub mod submit;
pub mod wizard;

pub use controller::{FieldErrors, FormController, FormSnapshot};
pub use error::{FormError, Notice, SubmissionError};
pub use flows::Flow;
pub use hint::accessibility_hint;
pub use key::{FieldKey, FieldValues, values};
pub use options::{FormOptions, HiddenFieldPolicy};
pub use scheduler::DebounceScheduler;
pub use schema::{FieldSpec, FormSchema};
pub use submit::{PrefillSource, SubmissionSink, SubmitOutcome};
pub use wizard::{
    Advance, Blocked, BranchSelector, Completion, CrossFieldCheck, StepDescriptor,
    WizardController, WizardPhase,
};
