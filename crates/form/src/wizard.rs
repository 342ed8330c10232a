//! Multi-step wizard over a single form.
//!
//! Each step names the fields that gate it, and can also carry a cross-field
//! check and a branch. A branch picks, from the current values, which of its
//! candidate fields are active; candidates that are not picked are hidden.
//! Hidden fields never gate a transition. Under
//! [`HiddenFieldPolicy::Clear`] their values and results are also cleared.
//!
//! ```
//! use formflow_form::{Advance, FieldSpec, FormController, FormSchema, StepDescriptor, WizardController};
//!
//! let schema = FormSchema::new([
//!     FieldSpec::inferred("email"),
//!     FieldSpec::inferred("password"),
//! ]).unwrap();
//! let mut wizard = WizardController::new(
//!     FormController::new(schema),
//!     [
//!         StepDescriptor::new("Account").require(["email"]),
//!         StepDescriptor::new("Security").require(["password"]),
//!     ],
//! ).unwrap();
//!
//! let Advance::Blocked(blocked) = wizard.next().unwrap() else { unreachable!() };
//! assert_eq!(blocked.message(), "Please fill in: Email");
//! assert_eq!(wizard.current_step(), 1);
//!
//! wizard.form().set_value("email", "user@example.com").unwrap();
//! assert!(wizard.next().unwrap().is_moved());
//! assert_eq!(wizard.current_step(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use formflow_validator::ValidationResult;
use serde::Serialize;
use tracing::{debug, info};

use crate::controller::FormController;
use crate::error::{FormError, Notice};
use crate::key::{FieldKey, FieldValues};
use crate::options::HiddenFieldPolicy;
use crate::submit::{SubmissionSink, SubmitOutcome};

/// Step-level check over all current values.
pub type CrossFieldCheck = Arc<dyn Fn(&FieldValues) -> ValidationResult + Send + Sync>;

/// Picks the active fields of a branch from the current values.
pub type BranchSelector = Arc<dyn Fn(&FieldValues) -> Vec<FieldKey> + Send + Sync>;

#[derive(Clone)]
struct Branch {
    /// Field whose value picks the branch, when built with `branch_on`.
    selector: Option<FieldKey>,
    candidates: Vec<FieldKey>,
    select: BranchSelector,
}

// ============================================================================
// STEP DESCRIPTOR
// ============================================================================

/// One wizard step.
#[derive(Clone)]
pub struct StepDescriptor {
    title: String,
    required: Vec<FieldKey>,
    optional: Vec<FieldKey>,
    cross_field: Option<CrossFieldCheck>,
    branch: Option<Branch>,
}

impl StepDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            required: Vec::new(),
            optional: Vec::new(),
            cross_field: None,
            branch: None,
        }
    }

    /// Fields that must be filled in and valid to leave this step.
    #[must_use]
    pub fn require<K: Into<FieldKey>>(mut self, fields: impl IntoIterator<Item = K>) -> Self {
        self.required.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Fields validated with this step that may stay empty.
    #[must_use]
    pub fn optional<K: Into<FieldKey>>(mut self, fields: impl IntoIterator<Item = K>) -> Self {
        self.optional.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Check run after every active field is valid. A failure blocks the
    /// step with its own notice.
    #[must_use]
    pub fn cross_field<F>(mut self, check: F) -> Self
    where
        F: Fn(&FieldValues) -> ValidationResult + Send + Sync + 'static,
    {
        self.cross_field = Some(Arc::new(check));
        self
    }

    /// Mutually exclusive fields. `select` returns the active ones; picks
    /// outside `candidates` are ignored.
    #[must_use]
    pub fn branch<K, F>(mut self, candidates: impl IntoIterator<Item = K>, select: F) -> Self
    where
        K: Into<FieldKey>,
        F: Fn(&FieldValues) -> Vec<FieldKey> + Send + Sync + 'static,
    {
        self.branch = Some(Branch {
            selector: None,
            candidates: candidates.into_iter().map(Into::into).collect(),
            select: Arc::new(select),
        });
        self
    }

    /// A branch chosen by the value of `selector`.
    ///
    /// Each option maps a choice to its fields. The choice is matched
    /// case-insensitively after trimming. With no matching option, no branch
    /// field is active.
    #[must_use]
    pub fn branch_on<O, F, K>(self, selector: impl Into<FieldKey>, options: impl IntoIterator<Item = (O, F)>) -> Self
    where
        O: AsRef<str>,
        F: IntoIterator<Item = K>,
        K: Into<FieldKey>,
    {
        let selector = selector.into();
        let options: Vec<(String, Vec<FieldKey>)> = options
            .into_iter()
            .map(|(choice, fields)| {
                (
                    choice.as_ref().trim().to_lowercase(),
                    fields.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        let candidates: Vec<FieldKey> = options
            .iter()
            .flat_map(|(_, fields)| fields.iter().cloned())
            .collect();

        let key = selector.clone();
        let mut step = self.branch(candidates, move |values: &FieldValues| {
            let Some(choice) = values.get(&key).map(|v| v.trim().to_lowercase()) else {
                return Vec::new();
            };
            options
                .iter()
                .filter(|(option, _)| *option == choice)
                .flat_map(|(_, fields)| fields.iter().cloned())
                .collect()
        });
        if let Some(branch) = step.branch.as_mut() {
            branch.selector = Some(selector);
        }
        step
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn required_fields(&self) -> &[FieldKey] {
        &self.required
    }

    /// Branch candidates picked by `values`.
    fn selected(&self, values: &FieldValues) -> Vec<FieldKey> {
        let Some(branch) = &self.branch else {
            return Vec::new();
        };
        let mut picked: Vec<FieldKey> = (branch.select)(values)
            .into_iter()
            .filter(|key| branch.candidates.contains(key))
            .collect();
        picked.dedup();
        picked
    }

    /// Fields that must be non-empty: required plus selected branch fields.
    #[must_use]
    pub fn gating_fields(&self, values: &FieldValues) -> Vec<FieldKey> {
        let mut fields = self.required.clone();
        for key in self.selected(values) {
            if !fields.contains(&key) {
                fields.push(key);
            }
        }
        fields
    }

    /// Every field validated with this step.
    #[must_use]
    pub fn active_fields(&self, values: &FieldValues) -> Vec<FieldKey> {
        let mut fields = self.gating_fields(values);
        for key in &self.optional {
            if !fields.contains(key) {
                fields.push(key.clone());
            }
        }
        fields
    }

    /// Optional fields that do not also gate this step.
    fn skippable(&self, values: &FieldValues) -> Vec<FieldKey> {
        let gating = self.gating_fields(values);
        self.optional
            .iter()
            .filter(|key| !gating.contains(key))
            .cloned()
            .collect()
    }

    /// Branch candidates not selected by `values`.
    #[must_use]
    pub fn hidden_fields(&self, values: &FieldValues) -> Vec<FieldKey> {
        let Some(branch) = &self.branch else {
            return Vec::new();
        };
        let selected = self.selected(values);
        branch
            .candidates
            .iter()
            .filter(|key| !selected.contains(key))
            .cloned()
            .collect()
    }

    fn referenced(&self) -> impl Iterator<Item = &FieldKey> {
        let branch = self
            .branch
            .iter()
            .flat_map(|branch| branch.selector.iter().chain(&branch.candidates));
        self.required.iter().chain(&self.optional).chain(branch)
    }
}

impl fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescriptor")
            .field("title", &self.title)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("cross_field", &self.cross_field.is_some())
            .field(
                "branch",
                &self.branch.as_ref().map(|branch| &branch.candidates),
            )
            .finish()
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Why a step cannot be left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Blocked {
    /// Gating fields are empty. Takes priority over invalid fields.
    MissingFields {
        fields: Vec<FieldKey>,
        labels: Vec<String>,
    },
    /// Fields hold values their validators reject.
    InvalidFields {
        fields: Vec<FieldKey>,
        messages: Vec<String>,
    },
    /// Every field is valid but the step's cross-field check failed.
    CrossField { code: String, message: String },
}

impl Blocked {
    /// The single aggregated message for the step.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingFields { labels, .. } => format!("Please fill in: {}", labels.join(", ")),
            Self::InvalidFields { messages, .. } => messages.join(". "),
            Self::CrossField { message, .. } => message.clone(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingFields { .. } => "step_missing_fields",
            Self::InvalidFields { .. } => "step_invalid_fields",
            Self::CrossField { code, .. } => code,
        }
    }

    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::form(self.code(), self.message())
    }
}

/// Result of [`WizardController::next`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Advance {
    /// Steps are 1-based.
    Moved { from: usize, to: usize },
    Blocked(Blocked),
}

impl Advance {
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Result of [`WizardController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The sink accepted the values; the wizard is now [`WizardPhase::Succeeded`].
    Succeeded(T),
    /// The final step itself is blocked.
    Blocked(Blocked),
    /// A field from an earlier step no longer validates.
    Invalid(Vec<Notice>),
}

impl<T> Completion<T> {
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Active,
    /// Terminal. The form is locked.
    Succeeded,
}

// ============================================================================
// WIZARD CONTROLLER
// ============================================================================

/// Step state machine over a [`FormController`].
#[derive(Debug)]
pub struct WizardController {
    form: FormController,
    steps: Vec<StepDescriptor>,
    current: usize,
    phase: WizardPhase,
}

impl WizardController {
    /// Rejects an empty step list and steps naming undeclared fields.
    pub fn new(
        form: FormController,
        steps: impl IntoIterator<Item = StepDescriptor>,
    ) -> Result<Self, FormError> {
        let steps: Vec<StepDescriptor> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(FormError::Schema("a wizard needs at least one step".to_string()));
        }
        for key in steps.iter().flat_map(StepDescriptor::referenced) {
            form.schema().resolve(key.as_str())?;
        }

        Ok(Self {
            form,
            steps,
            current: 0,
            phase: WizardPhase::Active,
        })
    }

    #[must_use]
    pub const fn form(&self) -> &FormController {
        &self.form
    }

    /// 1-based.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current + 1
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn step(&self) -> &StepDescriptor {
        &self.steps[self.current]
    }

    #[must_use]
    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    #[must_use]
    pub const fn phase(&self) -> WizardPhase {
        self.phase
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    /// Validates the current step and moves forward if nothing blocks it.
    pub fn next(&mut self) -> Result<Advance, FormError> {
        self.ensure_active()?;
        if self.is_last_step() {
            return Err(FormError::NoNextStep {
                step: self.current_step(),
            });
        }

        if let Some(blocked) = self.check_step(self.current) {
            debug!(step = self.current_step(), reason = blocked.code(), "step blocked");
            return Ok(Advance::Blocked(blocked));
        }

        let from = self.current_step();
        self.current += 1;
        debug!(from, to = self.current_step(), "wizard advanced");
        Ok(Advance::Moved {
            from,
            to: self.current_step(),
        })
    }

    /// Moves back one step without validating. Returns false on step 1.
    pub fn previous(&mut self) -> Result<bool, FormError> {
        self.ensure_active()?;
        if self.current == 0 {
            return Ok(false);
        }
        self.current -= 1;
        debug!(to = self.current_step(), "wizard moved back");
        Ok(true)
    }

    /// Runs the current step's checks without moving.
    pub fn check_current(&self) -> Result<Option<Blocked>, FormError> {
        self.ensure_active()?;
        Ok(self.check_step(self.current))
    }

    /// Every field active across all steps for the current values.
    #[must_use]
    pub fn active_fields(&self) -> Vec<FieldKey> {
        let values = self.form.values();
        let mut fields = Vec::new();
        for key in self.steps.iter().flat_map(|step| step.active_fields(&values)) {
            if !fields.contains(&key) {
                fields.push(key);
            }
        }
        fields
    }

    /// Checks the final step and submits every active field to `sink`.
    ///
    /// On success the wizard becomes [`WizardPhase::Succeeded`] and the form
    /// is locked. A sink rejection comes back as [`FormError::Submission`]
    /// and leaves the wizard active.
    pub async fn complete<S>(&mut self, sink: &S) -> Result<Completion<S::Payload>, FormError>
    where
        S: SubmissionSink,
    {
        self.ensure_active()?;
        if !self.is_last_step() {
            return Err(FormError::NotFinalStep {
                step: self.current_step(),
                total: self.total_steps(),
            });
        }

        if let Some(blocked) = self.check_step(self.current) {
            debug!(step = self.current_step(), reason = blocked.code(), "final step blocked");
            return Ok(Completion::Blocked(blocked));
        }

        for index in 0..self.steps.len() {
            self.settle_hidden(index);
        }
        let scope = self.active_fields();
        let optional = self.optional_fields();
        let outcome = self
            .form
            .submit_scoped(&scope, &optional, |values| async move {
                sink.submit(&values).await
            })
            .await?;

        match outcome {
            SubmitOutcome::Submitted(payload) => {
                self.phase = WizardPhase::Succeeded;
                self.form.lock();
                info!(steps = self.total_steps(), "wizard completed");
                Ok(Completion::Succeeded(payload))
            }
            SubmitOutcome::Invalid(notices) => Ok(Completion::Invalid(notices)),
        }
    }

    /// Optional fields of any step that no step gates.
    fn optional_fields(&self) -> Vec<FieldKey> {
        let values = self.form.values();
        let gating: Vec<FieldKey> = self
            .steps
            .iter()
            .flat_map(|step| step.gating_fields(&values))
            .collect();
        let mut fields = Vec::new();
        for key in self.steps.iter().flat_map(|step| step.skippable(&values)) {
            if !gating.contains(&key) && !fields.contains(&key) {
                fields.push(key);
            }
        }
        fields
    }

    fn ensure_active(&self) -> Result<(), FormError> {
        match self.phase {
            WizardPhase::Active => Ok(()),
            WizardPhase::Succeeded => Err(FormError::WizardCompleted),
        }
    }

    /// Applies the hidden-field policy to one step.
    fn settle_hidden(&self, index: usize) {
        if self.form.options().hidden_fields != HiddenFieldPolicy::Clear {
            return;
        }
        let hidden = self.steps[index].hidden_fields(&self.form.values());
        if !hidden.is_empty() {
            self.form.clear_fields(&hidden);
        }
    }

    fn check_step(&self, index: usize) -> Option<Blocked> {
        self.settle_hidden(index);

        let step = &self.steps[index];
        let values = self.form.values();
        let schema = self.form.schema();
        let results = self
            .form
            .touch_and_validate(&step.active_fields(&values), &step.skippable(&values));

        let missing: Vec<FieldKey> = step
            .gating_fields(&values)
            .into_iter()
            .filter(|key| values.get(key).is_none_or(|value| value.trim().is_empty()))
            .collect();
        if !missing.is_empty() {
            let labels = missing
                .iter()
                .filter_map(|key| schema.field(key.as_str()))
                .map(|spec| spec.label.clone())
                .collect();
            return Some(Blocked::MissingFields {
                fields: missing,
                labels,
            });
        }

        let invalid: Vec<&(FieldKey, ValidationResult)> =
            results.iter().filter(|(_, result)| !result.is_valid()).collect();
        if !invalid.is_empty() {
            return Some(Blocked::InvalidFields {
                fields: invalid.iter().map(|(key, _)| key.clone()).collect(),
                messages: invalid
                    .iter()
                    .flat_map(|(_, result)| result.error_messages())
                    .map(str::to_string)
                    .collect(),
            });
        }

        let check = step.cross_field.as_ref()?;
        let result = check(&values);
        if result.is_valid() {
            return None;
        }
        Some(Blocked::CrossField {
            code: result
                .first_error()
                .map_or_else(|| "cross_field".to_string(), |error| error.code.to_string()),
            message: result.error_messages().join(". "),
        })
    }
}
