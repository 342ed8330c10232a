//! Prebuilt flows: registration, password reset, accommodation booking and
//! checkout.
//!
//! Each flow is a TOML schema plus its steps. Call [`Flow::start`] to get a
//! wizard over a fresh form.

use formflow_validator::validators::date;
use formflow_validator::{ValidationError, ValidationResult};

use crate::controller::FormController;
use crate::error::FormError;
use crate::key::FieldValues;
use crate::options::FormOptions;
use crate::schema::FormSchema;
use crate::submit::PrefillSource;
use crate::wizard::{StepDescriptor, WizardController};

/// A named schema with its wizard steps.
#[derive(Debug, Clone)]
pub struct Flow {
    pub name: &'static str,
    pub schema: FormSchema,
    pub steps: Vec<StepDescriptor>,
}

impl Flow {
    /// Builds the form, prefilled from `prefill`, and the wizard over it.
    pub fn start(
        self,
        options: FormOptions,
        prefill: &impl PrefillSource,
    ) -> Result<WizardController, FormError> {
        let form = FormController::prefilled(self.schema, options, prefill);
        WizardController::new(form, self.steps)
    }
}

// ============================================================================
// REGISTRATION
// ============================================================================

const REGISTRATION: &str = r#"
[[fields]]
key = "first_name"

[[fields]]
key = "last_name"

[[fields]]
key = "email"

[[fields]]
key = "phone"
label = "Phone number"

[[fields]]
key = "call_up_number"
label = "Call-up number"

[[fields]]
key = "state_code"

[[fields]]
key = "batch"

[[fields]]
key = "stream"

[[fields]]
key = "password"

[[fields]]
key = "confirm_password"
"#;

/// Personal details, service details, then account security.
pub fn registration() -> Result<Flow, FormError> {
    Ok(Flow {
        name: "registration",
        schema: FormSchema::from_toml(REGISTRATION)?,
        steps: vec![
            StepDescriptor::new("Personal details").require(["first_name", "last_name", "email", "phone"]),
            StepDescriptor::new("Service details")
                .require(["call_up_number", "state_code", "batch", "stream"])
                .cross_field(call_up_matches_state),
            StepDescriptor::new("Security").require(["password", "confirm_password"]),
        ],
    })
}

/// The state segment of the call-up number must be the chosen state code.
fn call_up_matches_state(values: &FieldValues) -> ValidationResult {
    let segment = values
        .get("call_up_number")
        .and_then(|call_up| call_up.trim().split('/').nth(3))
        .map(str::to_ascii_uppercase);
    let state = values
        .get("state_code")
        .map(|code| code.trim().to_ascii_uppercase());

    match (segment, state) {
        (Some(segment), Some(state)) if segment != state => ValidationResult::invalid(
            ValidationError::new(
                "call_up_state_mismatch",
                "Call-up number does not match the selected state code",
            )
            .with_param("call_up_state", segment)
            .with_param("state_code", state),
        ),
        _ => ValidationResult::valid(),
    }
}

// ============================================================================
// PASSWORD RESET
// ============================================================================

const PASSWORD_RESET: &str = r#"
[[fields]]
key = "email"

[[fields]]
key = "reset_code"
label = "Reset code"
required = true
pattern = '^\d{6}$'
pattern_message = "Enter the 6-digit code from your email"

[[fields]]
key = "new_password"

[[fields]]
key = "confirm_password"
kind = { confirm_password = { matches = "new_password" } }
"#;

/// Request a code by email, then set a new password with it.
pub fn password_reset() -> Result<Flow, FormError> {
    Ok(Flow {
        name: "password_reset",
        schema: FormSchema::from_toml(PASSWORD_RESET)?,
        steps: vec![
            StepDescriptor::new("Find your account").require(["email"]),
            StepDescriptor::new("Choose a new password").require([
                "reset_code",
                "new_password",
                "confirm_password",
            ]),
        ],
    })
}

// ============================================================================
// BOOKING
// ============================================================================

const BOOKING: &str = r#"
[[fields]]
key = "check_in_date"
label = "Check-in date"

[[fields]]
key = "check_out_date"
label = "Check-out date"

[[fields]]
key = "guest_name"

[[fields]]
key = "email"

[[fields]]
key = "phone"
label = "Phone number"

[[fields]]
key = "special_requests"
max_length = 500
real_time = false
"#;

/// Stay dates, then guest details.
pub fn booking() -> Result<Flow, FormError> {
    Ok(Flow {
        name: "booking",
        schema: FormSchema::from_toml(BOOKING)?,
        steps: vec![
            StepDescriptor::new("Dates")
                .require(["check_in_date", "check_out_date"])
                .cross_field(check_out_after_check_in),
            StepDescriptor::new("Guest details")
                .require(["guest_name", "email", "phone"])
                .optional(["special_requests"]),
        ],
    })
}

fn check_out_after_check_in(values: &FieldValues) -> ValidationResult {
    let day = |key: &str| values.get(key).and_then(|value| date::parse(value));
    match (day("check_in_date"), day("check_out_date")) {
        (Some(check_in), Some(check_out)) if check_out <= check_in => {
            ValidationResult::invalid(ValidationError::new(
                "date_order",
                "Check-out date must be after check-in date",
            ))
        }
        _ => ValidationResult::valid(),
    }
}

// ============================================================================
// CHECKOUT
// ============================================================================

const CHECKOUT: &str = r#"
[[fields]]
key = "full_name"

[[fields]]
key = "address"
required = true
min_length = 5

[[fields]]
key = "city"
required = true

[[fields]]
key = "phone"
label = "Phone number"

[[fields]]
key = "payment_method"
required = true
pattern = '(?i)^\s*(transfer|card)\s*$'
pattern_message = "Choose transfer or card"

[[fields]]
key = "transfer_reference"
required = true
min_length = 6

[[fields]]
key = "card_number"
required = true
pattern = '^\d{13,19}$'
pattern_message = "Card number must be 13 to 19 digits"

[[fields]]
key = "card_expiry"
required = true
pattern = '^(0[1-9]|1[0-2])/\d{2}$'
pattern_message = "Expiry must be MM/YY"

[[fields]]
key = "card_cvv"
label = "CVV"
required = true
pattern = '^\d{3,4}$'
pattern_message = "CVV must be 3 or 4 digits"
"#;

/// Shipping, then payment by bank transfer or card.
pub fn checkout() -> Result<Flow, FormError> {
    Ok(Flow {
        name: "checkout",
        schema: FormSchema::from_toml(CHECKOUT)?,
        steps: vec![
            StepDescriptor::new("Shipping").require(["full_name", "address", "city", "phone"]),
            StepDescriptor::new("Payment").require(["payment_method"]).branch_on(
                "payment_method",
                [
                    ("transfer", vec!["transfer_reference"]),
                    ("card", vec!["card_number", "card_expiry", "card_cvv"]),
                ],
            ),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::values;
    use rstest::rstest;

    #[rstest]
    #[case::registration(registration())]
    #[case::password_reset(password_reset())]
    #[case::booking(booking())]
    #[case::checkout(checkout())]
    fn flows_load(#[case] flow: Result<Flow, FormError>) {
        let flow = flow.unwrap();
        let wizard = flow.start(FormOptions::default(), &FieldValues::new()).unwrap();
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.total_steps() >= 2);
    }

    #[test]
    fn reset_code_confirms_against_new_password() {
        let flow = password_reset().unwrap();
        assert_eq!(
            flow.schema.dependents("new_password").count(),
            1,
            "confirm_password reads new_password"
        );
        assert_eq!(flow.schema.dependents("password").count(), 0);
    }

    #[rstest]
    #[case("NYSC/2023/B/LA/A/12345", "la", true)]
    #[case("NYSC/2023/B/LA/A/12345", "KN", false)]
    #[case("", "KN", true)]
    fn call_up_state_cross_check(#[case] call_up: &str, #[case] state: &str, #[case] ok: bool) {
        let result = call_up_matches_state(&values([("call_up_number", call_up), ("state_code", state)]));
        assert_eq!(result.is_valid(), ok);
    }

    #[rstest]
    #[case("2024-05-01", "2024-05-03", true)]
    #[case("2024-05-03", "2024-05-03", false)]
    #[case("2024-05-03", "2024-05-01", false)]
    #[case("2024-05-03", "soon", true)]
    fn booking_date_order(#[case] check_in: &str, #[case] check_out: &str, #[case] ok: bool) {
        let result = check_out_after_check_in(&values([
            ("check_in_date", check_in),
            ("check_out_date", check_out),
        ]));
        assert_eq!(result.is_valid(), ok);
    }
}
