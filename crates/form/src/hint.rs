use formflow_validator::{FieldKind, ValidationResult};

use crate::schema::FieldSpec;

/// Builds the text a screen reader announces for a field.
///
/// Parts are joined with `", "`: the label, `Required field` when the field
/// is required, `Password field, hidden` for password inputs, and the current
/// error messages once the field has been touched.
///
/// ```
/// use formflow_form::{accessibility_hint, FieldSpec};
///
/// let spec = FieldSpec::inferred("password");
/// assert_eq!(
///     accessibility_hint(&spec, None, false),
///     "Password, Required field, Password field, hidden"
/// );
/// ```
#[must_use]
pub fn accessibility_hint(
    spec: &FieldSpec,
    result: Option<&ValidationResult>,
    touched: bool,
) -> String {
    let mut parts = vec![spec.label.clone()];
    if spec.is_required() {
        parts.push("Required field".to_string());
    }
    if matches!(spec.kind, FieldKind::Password | FieldKind::ConfirmPassword { .. }) {
        parts.push("Password field, hidden".to_string());
    }
    if let Some(result) = result.filter(|result| touched && !result.is_valid()) {
        parts.push(format!("Error: {}", result.error_messages().join(". ")));
    }
    parts.join(", ")
}
