//! Field semantics and validator dispatch.

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::result::ValidationResult;
use crate::traits::FieldLookup;
use crate::validators::{
    PhoneCountry, YearRange, confirm, date, deployment, email, name, password, phone,
};

/// Sibling field a confirm-password field compares against by default.
pub const DEFAULT_CONFIRM_TARGET: &str = "password";

/// Semantic identity of a field, selecting its validator.
///
/// Serialized externally tagged in snake case: unit kinds are plain strings
/// (`"email"`), kinds with options are tables (`{ "phone": { "country":
/// "international" } }`; an empty table takes the defaults).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Validated by the field's [`ValidationConfig`] alone.
    #[default]
    Text,
    Email,
    Password,
    ConfirmPassword {
        #[serde(default = "default_confirm_target")]
        matches: String,
    },
    Phone {
        #[serde(default)]
        country: PhoneCountry,
    },
    Name,
    CallUpNumber,
    Batch {
        /// Defaults to 1973 through next year.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        years: Option<YearRange>,
    },
    StateCode,
    Stream,
    /// ISO `YYYY-MM-DD`.
    Date,
}

fn default_confirm_target() -> String {
    DEFAULT_CONFIRM_TARGET.to_string()
}

impl FieldKind {
    /// A confirm-password kind comparing against `password`.
    #[must_use]
    pub fn confirm_password() -> Self {
        Self::ConfirmPassword {
            matches: default_confirm_target(),
        }
    }

    /// A Nigerian mobile phone kind.
    #[must_use]
    pub const fn phone() -> Self {
        Self::Phone {
            country: PhoneCountry::Nigeria,
        }
    }

    /// A batch kind with the default year range.
    #[must_use]
    pub const fn batch() -> Self {
        Self::Batch { years: None }
    }

    /// Guesses a kind from a field name.
    ///
    /// Only meant for schemas that omit `kind`; the result is stored with
    /// the field so names are never consulted again while validating.
    ///
    /// ```
    /// use formflow_validator::FieldKind;
    ///
    /// assert_eq!(FieldKind::infer("workEmail"), FieldKind::Email);
    /// assert_eq!(FieldKind::infer("confirm_password"), FieldKind::confirm_password());
    /// assert_eq!(FieldKind::infer("bio"), FieldKind::Text);
    /// ```
    #[must_use]
    pub fn infer(field: &str) -> Self {
        let name: String = field
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        let has = |needle: &str| name.contains(needle);
        let words = words(field);

        if has("password") && (has("confirm") || has("repeat")) {
            Self::confirm_password()
        } else if has("password") {
            Self::Password
        } else if has("email") {
            Self::Email
        } else if has("phone") || has("mobile") {
            Self::phone()
        } else if has("callup") {
            Self::CallUpNumber
        } else if has("batch") {
            Self::batch()
        } else if has("statecode") {
            Self::StateCode
        } else if has("stream") {
            Self::Stream
        } else if words.iter().any(|word| word == "date") {
            Self::Date
        } else if has("name") && !has("username") {
            Self::Name
        } else {
            Self::Text
        }
    }

    /// The sibling field whose value this kind reads, if any.
    #[must_use]
    pub fn reads(&self) -> Option<&str> {
        match self {
            Self::ConfirmPassword { matches } => Some(matches),
            _ => None,
        }
    }

    /// Returns true if the kind has a specialized validator.
    #[must_use]
    pub const fn is_specialized(&self) -> bool {
        !matches!(self, Self::Text)
    }

    /// Validates `value` with this kind's validator.
    ///
    /// Specialized kinds ignore the length, pattern and custom settings of
    /// `config`; [`FieldKind::Text`] runs the generic algorithm with them.
    #[must_use]
    pub fn validate<L>(
        &self,
        label: &str,
        config: &ValidationConfig,
        value: &str,
        siblings: &L,
    ) -> ValidationResult
    where
        L: FieldLookup + ?Sized,
    {
        match self {
            Self::Text => config.validate(label, value),
            Self::Email => email::validate(value),
            Self::Password => password::validate(value),
            Self::ConfirmPassword { matches } => {
                confirm::validate(value, siblings.get_value(matches))
            }
            Self::Phone { country } => phone::validate(value, *country),
            Self::Name => name::validate(value),
            Self::CallUpNumber => deployment::validate_call_up(value),
            Self::Batch { years } => deployment::validate_batch(value, years.unwrap_or_default()),
            Self::StateCode => deployment::validate_state_code(value),
            Self::Stream => deployment::validate_stream(value),
            Self::Date => date::validate(value),
        }
    }
}

/// Validates one field value. Pure and stateless, so it is safe to call from
/// any number of forms at once.
#[must_use]
pub fn validate_field<L>(
    kind: &FieldKind,
    label: &str,
    config: &ValidationConfig,
    value: &str,
    siblings: &L,
) -> ValidationResult
where
    L: FieldLookup + ?Sized,
{
    kind.validate(label, config, value, siblings)
}

/// Lowercase words of a field name, split at separators and at
/// lower-to-upper case changes (`checkInDate` gives `check`, `in`, `date`).
fn words(field: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;
    for c in field.chars() {
        let boundary = !c.is_alphanumeric() || (c.is_uppercase() && previous_lower);
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        }
        previous_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoSiblings;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[rstest]
    #[case("email", FieldKind::Email)]
    #[case("Email Address", FieldKind::Email)]
    #[case("password", FieldKind::Password)]
    #[case("confirmPassword", FieldKind::confirm_password())]
    #[case("repeat_password", FieldKind::confirm_password())]
    #[case("phone_number", FieldKind::phone())]
    #[case("mobile", FieldKind::phone())]
    #[case("call_up_number", FieldKind::CallUpNumber)]
    #[case("batch", FieldKind::batch())]
    #[case("state_code", FieldKind::StateCode)]
    #[case("stream", FieldKind::Stream)]
    #[case("check_in_date", FieldKind::Date)]
    #[case("dateOfBirth", FieldKind::Date)]
    #[case("Start-Date", FieldKind::Date)]
    #[case("candidate_name", FieldKind::Name)]
    #[case("update_name", FieldKind::Name)]
    #[case("first_name", FieldKind::Name)]
    #[case("username", FieldKind::Text)]
    #[case("address", FieldKind::Text)]
    fn infers_from_name(#[case] field: &str, #[case] expected: FieldKind) {
        assert_eq!(FieldKind::infer(field), expected);
    }

    #[test]
    fn text_uses_config() {
        let config = ValidationConfig::builder().required(true).build().unwrap();
        let result = FieldKind::Text.validate("Address", &config, "", &NoSiblings);
        assert_eq!(result.error_messages(), vec!["Address is required"]);
    }

    #[test]
    fn specialized_kinds_ignore_config() {
        let config = ValidationConfig::builder().max_length(3).build().unwrap();
        let result = FieldKind::Email.validate("Email", &config, "user@example.com", &NoSiblings);
        assert!(result.is_valid());
    }

    #[test]
    fn confirm_reads_configured_sibling() {
        let kind = FieldKind::ConfirmPassword {
            matches: "new_password".to_string(),
        };
        let values = BTreeMap::from([("new_password", "Str0ng!Pass1")]);
        let config = ValidationConfig::default();
        assert!(validate_field(&kind, "Confirm", &config, "Str0ng!Pass1", &values).is_valid());
        assert_eq!(kind.reads(), Some("new_password"));
    }

    #[test]
    fn serde_forms() {
        let kinds: Vec<FieldKind> = serde_json::from_str(
            r#"["email", {"phone": {"country": "international"}}, {"confirm_password": {}}]"#,
        )
        .unwrap();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Email,
                FieldKind::Phone {
                    country: PhoneCountry::International
                },
                FieldKind::confirm_password(),
            ]
        );
    }
}
