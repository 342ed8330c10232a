//! Form state controller.
//!
//! Owns the values, validation results, touched flags and submitting flag of
//! one form, and decides when validation runs: debounced on change, at once
//! on blur, and for every field on submit.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use formflow_validator::ValidationResult;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{FormError, Notice, SubmissionError};
use crate::hint::accessibility_hint;
use crate::key::{FieldKey, FieldValues};
use crate::options::FormOptions;
use crate::scheduler::DebounceScheduler;
use crate::schema::{FieldSpec, FormSchema};
use crate::submit::{PrefillSource, SubmissionSink, SubmitOutcome};

/// Latest validation result per field.
pub type FieldErrors = BTreeMap<FieldKey, ValidationResult>;

/// Read-only view of a form for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub values: FieldValues,
    pub errors: FieldErrors,
    pub touched: BTreeMap<FieldKey, bool>,
    pub is_valid: bool,
    pub is_submitting: bool,
}

#[derive(Debug, Default)]
struct FormState {
    values: FieldValues,
    errors: FieldErrors,
    touched: BTreeSet<FieldKey>,
    is_submitting: bool,
    locked: bool,
    /// Ticket of the newest scheduled validation per field. A debounced
    /// result is applied only if its ticket is still current.
    tickets: HashMap<FieldKey, u64>,
    next_ticket: u64,
}

impl FormState {
    fn issue_ticket(&mut self, key: &FieldKey) -> u64 {
        self.next_ticket += 1;
        self.tickets.insert(key.clone(), self.next_ticket);
        self.next_ticket
    }

    fn is_valid(&self, schema: &FormSchema) -> bool {
        schema
            .keys()
            .all(|key| self.errors.get(key).is_none_or(ValidationResult::is_valid))
    }
}

#[derive(Debug)]
struct FormShared {
    schema: FormSchema,
    options: FormOptions,
    initial: FieldValues,
    state: Mutex<FormState>,
    scheduler: DebounceScheduler,
}

/// Handle to one form's state.
///
/// Clones share the same form. Dropping the last handle disposes the
/// debounce scheduler, so no validation fires for a form that is gone.
///
/// ```
/// use formflow_form::{FieldSpec, FormController, FormSchema};
///
/// let schema = FormSchema::new([FieldSpec::inferred("email")]).unwrap();
/// let form = FormController::new(schema);
///
/// form.set_value("email", "bad-email").unwrap();
/// let result = form.set_field_touched("email", true).unwrap().unwrap();
/// assert!(!result.is_valid());
/// assert!(!form.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct FormController {
    shared: Arc<FormShared>,
}

fn blank_values(schema: &FormSchema) -> FieldValues {
    schema.keys().map(|key| (key.clone(), String::new())).collect()
}

/// Every declared field, with `overrides` applied. Undeclared keys are
/// skipped.
fn declared_values(schema: &FormSchema, overrides: FieldValues) -> FieldValues {
    let mut values = blank_values(schema);
    for (key, value) in overrides {
        match values.get_mut(key.as_str()) {
            Some(slot) => *slot = value,
            None => debug!(field = %key, "ignoring undeclared initial value"),
        }
    }
    values
}

impl FormController {
    /// A blank form with default options.
    #[must_use]
    pub fn new(schema: FormSchema) -> Self {
        Self::with_options(schema, FormOptions::default())
    }

    /// A blank form.
    #[must_use]
    pub fn with_options(schema: FormSchema, options: FormOptions) -> Self {
        let initial = blank_values(&schema);
        Self::build(schema, options, initial)
    }

    /// A form whose initial values come from `source`. Keys the schema does
    /// not declare are ignored.
    #[must_use]
    pub fn prefilled(schema: FormSchema, options: FormOptions, source: &impl PrefillSource) -> Self {
        let initial = declared_values(&schema, source.initial_values());
        Self::build(schema, options, initial)
    }

    fn build(schema: FormSchema, options: FormOptions, initial: FieldValues) -> Self {
        let state = FormState {
            values: initial.clone(),
            ..FormState::default()
        };
        Self {
            shared: Arc::new(FormShared {
                schema,
                options,
                initial,
                state: Mutex::new(state),
                scheduler: DebounceScheduler::new(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Stores a new value.
    ///
    /// A real-time field gets a debounced validation scheduled against this
    /// value; otherwise its result is left untouched until blur or submit.
    /// Real-time fields that read this one (confirm-password) are
    /// re-scheduled as well when they are already engaged.
    pub fn set_value(&self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        let schema = &self.shared.schema;
        let spec = schema.resolve(field)?;
        let value = value.into();

        let mut jobs = Vec::new();
        {
            let mut state = self.shared.state.lock();
            if state.locked {
                return Err(FormError::Locked);
            }
            state.values.insert(spec.key.clone(), value.clone());

            if spec.config.real_time {
                let ticket = state.issue_ticket(&spec.key);
                jobs.push((spec, value, ticket));
            }
            if self.shared.options.revalidate_dependents {
                for dependent in schema.dependents(spec.key.as_str()) {
                    let engaged = state.touched.contains(&dependent.key)
                        || state.errors.contains_key(&dependent.key);
                    if dependent.config.real_time && engaged {
                        let current = state.values.get(&dependent.key).cloned().unwrap_or_default();
                        let ticket = state.issue_ticket(&dependent.key);
                        jobs.push((dependent, current, ticket));
                    }
                }
            }
        }

        for (spec, value, ticket) in jobs {
            self.schedule(spec, value, ticket);
        }
        Ok(())
    }

    /// Marks a field touched and, with blur validation on, validates it at
    /// once. Touched is monotonic: `false` is ignored.
    pub fn set_field_touched(
        &self,
        field: &str,
        touched: bool,
    ) -> Result<Option<ValidationResult>, FormError> {
        let spec = self.shared.schema.resolve(field)?;
        if !touched {
            debug!(field = %spec.key, "touched cannot be cleared outside reset");
            return Ok(None);
        }

        let mut state = self.shared.state.lock();
        if state.locked {
            return Err(FormError::Locked);
        }
        state.touched.insert(spec.key.clone());
        if self.shared.options.validate_on_blur {
            Ok(Some(self.run_validation(&mut state, spec)))
        } else {
            Ok(None)
        }
    }

    /// Validates one field now, superseding any pending debounced run.
    pub fn validate_field(&self, field: &str) -> Result<ValidationResult, FormError> {
        let spec = self.shared.schema.resolve(field)?;
        let mut state = self.shared.state.lock();
        if state.locked {
            return Err(FormError::Locked);
        }
        Ok(self.run_validation(&mut state, spec))
    }

    /// Validates every declared field against the current values and returns
    /// the stored results.
    pub fn validate_all_fields(&self) -> Result<FieldErrors, FormError> {
        let mut state = self.shared.state.lock();
        if state.locked {
            return Err(FormError::Locked);
        }
        for spec in self.shared.schema.fields() {
            self.run_validation(&mut state, spec);
        }
        Ok(state.errors.clone())
    }

    /// Marks every field touched, validates all of them, and calls
    /// `on_submit` with the values if they are all valid.
    ///
    /// `is_submitting` is reset on every exit path, including a dropped
    /// future. A rejection from `on_submit` is returned as
    /// [`FormError::Submission`].
    pub async fn handle_submit<F, Fut, T>(&self, on_submit: F) -> Result<SubmitOutcome<T>, FormError>
    where
        F: FnOnce(FieldValues) -> Fut,
        Fut: Future<Output = Result<T, SubmissionError>>,
    {
        let scope: Vec<FieldKey> = self.shared.schema.keys().cloned().collect();
        self.submit_scoped(&scope, &[], on_submit).await
    }

    /// [`handle_submit`](Self::handle_submit) with a [`SubmissionSink`].
    pub async fn submit_to<S>(&self, sink: &S) -> Result<SubmitOutcome<S::Payload>, FormError>
    where
        S: SubmissionSink,
    {
        self.handle_submit(|values| async move { sink.submit(&values).await })
            .await
    }

    /// Restores the original initial values, or `values` if given, and clears
    /// results, touched flags, pending validations and the submitting flag.
    ///
    /// Passing `values` does not change what a later `reset(None)` restores.
    pub fn reset(&self, values: Option<FieldValues>) -> Result<(), FormError> {
        let values = match values {
            Some(values) => declared_values(&self.shared.schema, values),
            None => self.shared.initial.clone(),
        };

        let mut state = self.shared.state.lock();
        if state.locked {
            return Err(FormError::Locked);
        }
        self.shared.scheduler.cancel_all();
        state.values = values;
        state.errors.clear();
        state.touched.clear();
        state.tickets.clear();
        state.is_submitting = false;
        debug!("form reset");
        Ok(())
    }

    /// Cancels pending validations for good. Later changes are stored but
    /// only validated on blur or submit.
    pub fn dispose(&self) {
        self.shared.scheduler.dispose();
    }

    // ------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------

    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.shared.schema
    }

    #[must_use]
    pub fn options(&self) -> &FormOptions {
        &self.shared.options
    }

    #[must_use]
    pub fn value(&self, field: &str) -> Option<String> {
        self.shared.state.lock().values.get(field).cloned()
    }

    #[must_use]
    pub fn values(&self) -> FieldValues {
        self.shared.state.lock().values.clone()
    }

    /// The stored result for `field`; `None` until it was first validated.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<ValidationResult> {
        self.shared.state.lock().errors.get(field).cloned()
    }

    #[must_use]
    pub fn errors(&self) -> FieldErrors {
        self.shared.state.lock().errors.clone()
    }

    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.shared.state.lock().touched.contains(field)
    }

    /// True unless a stored result is invalid. Fields never validated count
    /// as valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.shared.state.lock().is_valid(&self.shared.schema)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.shared.state.lock().is_submitting
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.shared.state.lock().locked
    }

    /// Number of debounced validations waiting to fire.
    #[must_use]
    pub fn pending_validations(&self) -> usize {
        self.shared.scheduler.pending_count()
    }

    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.shared.state.lock();
        FormSnapshot {
            values: state.values.clone(),
            errors: state.errors.clone(),
            touched: state.touched.iter().map(|key| (key.clone(), true)).collect(),
            is_valid: state.is_valid(&self.shared.schema),
            is_submitting: state.is_submitting,
        }
    }

    /// Screen-reader hint for `field`, see [`accessibility_hint`].
    pub fn hint(&self, field: &str) -> Result<String, FormError> {
        let spec = self.shared.schema.resolve(field)?;
        let state = self.shared.state.lock();
        Ok(accessibility_hint(
            spec,
            state.errors.get(field),
            state.touched.contains(field),
        ))
    }

    // ------------------------------------------------------------------
    // Wizard support
    // ------------------------------------------------------------------

    /// Marks `keys` touched and validates them. Members of `optional` that
    /// are blank pass without running their validator.
    pub(crate) fn touch_and_validate(
        &self,
        keys: &[FieldKey],
        optional: &[FieldKey],
    ) -> Vec<(FieldKey, ValidationResult)> {
        let mut state = self.shared.state.lock();
        keys.iter()
            .filter_map(|key| self.shared.schema.field(key.as_str()))
            .map(|spec| {
                state.touched.insert(spec.key.clone());
                let result = self.run_scoped_validation(&mut state, spec, optional);
                (spec.key.clone(), result)
            })
            .collect()
    }

    /// Empties the values and drops the results of `keys`.
    pub(crate) fn clear_fields(&self, keys: &[FieldKey]) {
        let mut state = self.shared.state.lock();
        for key in keys {
            self.shared.scheduler.cancel(key.as_str());
            state.tickets.remove(key);
            state.errors.remove(key);
            if let Some(value) = state.values.get_mut(key) {
                value.clear();
            }
        }
        debug!(fields = keys.len(), "hidden fields cleared");
    }

    /// Freezes the form after a successful completion.
    pub(crate) fn lock(&self) {
        let mut state = self.shared.state.lock();
        self.shared.scheduler.cancel_all();
        state.tickets.clear();
        state.locked = true;
    }

    /// Submits with only `scope` validated and gating. Blank members of
    /// `optional` pass.
    pub(crate) async fn submit_scoped<F, Fut, T>(
        &self,
        scope: &[FieldKey],
        optional: &[FieldKey],
        on_submit: F,
    ) -> Result<SubmitOutcome<T>, FormError>
    where
        F: FnOnce(FieldValues) -> Fut,
        Fut: Future<Output = Result<T, SubmissionError>>,
    {
        {
            let mut state = self.shared.state.lock();
            if state.locked {
                return Err(FormError::Locked);
            }
            if state.is_submitting {
                debug!("submission rejected, one is already in flight");
                return Err(FormError::AlreadySubmitting);
            }
            state.is_submitting = true;
        }
        let _submitting = SubmittingGuard(&self.shared);

        let (notices, values) = {
            let mut state = self.shared.state.lock();
            let mut notices = Vec::new();
            for spec in scope
                .iter()
                .filter_map(|key| self.shared.schema.field(key.as_str()))
            {
                state.touched.insert(spec.key.clone());
                let result = self.run_scoped_validation(&mut state, spec, optional);
                if !result.is_valid() {
                    notices.push(Notice::field(spec.key.clone(), result.error_messages()));
                }
            }
            (notices, state.values.clone())
        };

        if !notices.is_empty() {
            debug!(invalid = notices.len(), "submission blocked by validation");
            return Ok(SubmitOutcome::Invalid(notices));
        }

        info!(fields = values.len(), "submitting form");
        match on_submit(values).await {
            Ok(payload) => {
                info!("submission accepted");
                Ok(SubmitOutcome::Submitted(payload))
            }
            Err(error) => {
                warn!(error = %error, code = error.code().unwrap_or("none"), "submission failed");
                Err(FormError::Submission(error))
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn run_validation(&self, state: &mut FormState, spec: &FieldSpec) -> ValidationResult {
        self.shared.scheduler.cancel(spec.key.as_str());
        state.tickets.remove(&spec.key);

        let value = state.values.get(&spec.key).map_or("", String::as_str);
        let result = spec
            .kind
            .validate(&spec.label, &spec.config, value, &state.values);
        state.errors.insert(spec.key.clone(), result.clone());
        result
    }

    fn run_scoped_validation(
        &self,
        state: &mut FormState,
        spec: &FieldSpec,
        optional: &[FieldKey],
    ) -> ValidationResult {
        let blank = state
            .values
            .get(&spec.key)
            .is_none_or(|value| value.trim().is_empty());
        if !(blank && optional.contains(&spec.key)) {
            return self.run_validation(state, spec);
        }

        self.shared.scheduler.cancel(spec.key.as_str());
        state.tickets.remove(&spec.key);
        let result = ValidationResult::valid();
        state.errors.insert(spec.key.clone(), result.clone());
        result
    }

    fn schedule(&self, spec: &FieldSpec, value: String, ticket: u64) {
        let form = Arc::downgrade(&self.shared);
        let delay = Duration::from_millis(spec.config.debounce_ms);
        self.shared
            .scheduler
            .schedule(spec.key.clone(), value, delay, move |field, value| {
                if let Some(shared) = form.upgrade() {
                    FormController { shared }.apply_scheduled(&field, &value, ticket);
                }
            });
    }

    fn apply_scheduled(&self, field: &FieldKey, value: &str, ticket: u64) {
        let Some(spec) = self.shared.schema.field(field.as_str()) else {
            return;
        };
        let mut state = self.shared.state.lock();
        if state.tickets.get(field) != Some(&ticket) {
            debug!(field = %field, "discarding superseded validation");
            return;
        }
        state.tickets.remove(field);

        let result = spec
            .kind
            .validate(&spec.label, &spec.config, value, &state.values);
        debug!(field = %field, valid = result.is_valid(), "debounced validation applied");
        state.errors.insert(field.clone(), result);
    }
}

/// Clears `is_submitting` when a submission ends, however it ends.
struct SubmittingGuard<'a>(&'a FormShared);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.state.lock().is_submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::values;
    use formflow_validator::{FieldKind, ValidationConfig};
    use pretty_assertions::assert_eq;

    fn schema() -> FormSchema {
        FormSchema::new([
            FieldSpec::inferred("email"),
            FieldSpec::inferred("password"),
            FieldSpec::new("bio", "Bio", FieldKind::Text).with_config(
                ValidationConfig::builder()
                    .max_length(10)
                    .real_time(false)
                    .build()
                    .unwrap(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let form = FormController::new(schema());
        assert!(matches!(
            form.set_value("nope", "x"),
            Err(FormError::UnknownField { .. })
        ));
        assert!(form.validate_field("nope").is_err());
    }

    #[test]
    fn undeclared_initial_values_are_ignored() {
        let initial = values([("email", "user@example.com"), ("nickname", "ada")]);
        let form = FormController::prefilled(schema(), FormOptions::default(), &initial);
        assert_eq!(form.value("email").as_deref(), Some("user@example.com"));
        assert_eq!(form.value("nickname"), None);

        form.reset(Some(values([("bio", "hi"), ("nickname", "obi")]))).unwrap();
        assert_eq!(form.values().len(), 3);
        assert_eq!(form.value("bio").as_deref(), Some("hi"));
    }

    #[test]
    fn touched_is_monotonic() {
        let form = FormController::new(schema());
        form.set_field_touched("email", true).unwrap();
        assert_eq!(form.set_field_touched("email", false).unwrap(), None);
        assert!(form.is_touched("email"));
    }

    #[test]
    fn blur_validation_can_be_disabled() {
        let form = FormController::with_options(schema(), FormOptions::default().validate_on_blur(false));
        assert_eq!(form.set_field_touched("email", true).unwrap(), None);
        assert_eq!(form.error("email"), None);
    }

    #[test]
    fn unvalidated_fields_count_as_valid() {
        let form = FormController::new(schema());
        assert!(form.is_valid());
        form.validate_field("email").unwrap();
        assert!(!form.is_valid());
    }

    #[test]
    fn validate_all_covers_every_field() {
        let form = FormController::new(schema());
        let errors = form.validate_all_fields().unwrap();
        assert_eq!(errors.len(), 3);
        assert!(!errors["email"].is_valid());
        assert!(errors["bio"].is_valid());
    }

    #[test]
    fn locked_form_rejects_touch_and_validation() {
        let form = FormController::new(schema());
        form.lock();

        assert!(matches!(form.set_field_touched("email", true), Err(FormError::Locked)));
        assert!(matches!(form.validate_field("email"), Err(FormError::Locked)));
        assert!(matches!(form.validate_all_fields(), Err(FormError::Locked)));
        assert!(!form.is_touched("email"));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn blank_optional_fields_pass_scoped_validation() {
        let form = FormController::new(schema());
        let keys = [FieldKey::from("email"), FieldKey::from("password")];
        let optional = [FieldKey::from("email")];

        let results = form.touch_and_validate(&keys, &optional);
        assert!(results[0].1.is_valid());
        assert!(!results[1].1.is_valid());
        assert!(form.is_touched("email"));

        form.set_value("email", "bad-email").unwrap();
        let results = form.touch_and_validate(&keys, &optional);
        assert!(!results[0].1.is_valid(), "filled optional fields are checked");
    }

    #[test]
    fn snapshot_reports_state() {
        let form = FormController::prefilled(
            schema(),
            FormOptions::default(),
            &values([("email", "user@example.com")]),
        );
        form.set_field_touched("email", true).unwrap();

        let snapshot = form.snapshot();
        assert_eq!(snapshot.values["email"], "user@example.com");
        assert_eq!(snapshot.values["password"], "");
        assert_eq!(snapshot.touched, BTreeMap::from([(FieldKey::from("email"), true)]));
        assert!(snapshot.is_valid);
        assert!(!snapshot.is_submitting);
    }
}
