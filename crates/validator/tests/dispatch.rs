//! Dispatch over whole value maps, the way a form drives it.

use std::collections::BTreeMap;

use formflow_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn validate_all(
    fields: &[(&str, FieldKind)],
    values: &BTreeMap<&str, &str>,
) -> BTreeMap<String, ValidationResult> {
    let config = ValidationConfig::default();
    fields
        .iter()
        .map(|(key, kind)| {
            let value = values.get(key).copied().unwrap_or_default();
            (
                (*key).to_string(),
                validate_field(kind, key, &config, value, values),
            )
        })
        .collect()
}

fn credentials() -> Vec<(&'static str, FieldKind)> {
    vec![
        ("email", FieldKind::Email),
        ("password", FieldKind::Password),
    ]
}

#[test]
fn bad_credentials_are_reported_per_field() {
    let values = BTreeMap::from([("email", "bad-email"), ("password", "weakpass")]);
    let results = validate_all(&credentials(), &values);

    let email = &results["email"];
    assert!(!email.is_valid());
    assert!(email.has_code("email_format"));

    let password = &results["password"];
    assert!(!password.is_valid());
    assert!(password.has_code("password_uppercase"));
    assert!(password.has_code("password_digit"));
    assert_eq!(password.strength(), Some(Strength::Weak));
}

#[test]
fn good_credentials_pass() {
    let values = BTreeMap::from([("email", "user@example.com"), ("password", "Str0ng!Pass1")]);
    let results = validate_all(&credentials(), &values);

    assert!(results["email"].is_valid());
    assert!(results["password"].is_valid());
    assert_eq!(results["password"].strength(), Some(Strength::Strong));
}

#[rstest]
#[case("Str0ng!Pass1", true)]
#[case("Str0ng!Pass2", false)]
#[case("", false)]
fn confirmation_reads_the_password_sibling(#[case] confirmation: &str, #[case] valid: bool) {
    let values = BTreeMap::from([
        ("password", "Str0ng!Pass1"),
        ("confirm_password", confirmation),
    ]);
    let fields = [("confirm_password", FieldKind::infer("confirm_password"))];
    let results = validate_all(&fields, &values);
    assert_eq!(results["confirm_password"].is_valid(), valid);
}

#[test]
fn only_confirmation_depends_on_siblings() {
    let fields = [
        ("email", FieldKind::Email),
        ("password", FieldKind::Password),
        ("state_code", FieldKind::StateCode),
    ];
    let values = BTreeMap::from([
        ("email", "user@example.com"),
        ("password", "weakpass"),
        ("state_code", "ZZ"),
    ]);
    let together = validate_all(&fields, &values);

    for (key, kind) in &fields {
        let alone = validate_field(
            kind,
            key,
            &ValidationConfig::default(),
            values[key],
            &NoSiblings,
        );
        assert_eq!(together[*key], alone, "{key}");
    }
}

#[rstest]
#[case(FieldKind::CallUpNumber, "NYSC/2023/B/LA/A/12345", true)]
#[case(FieldKind::CallUpNumber, "NYSC/2023/B/LA/A/1", false)]
#[case(FieldKind::StateCode, "LA", true)]
#[case(FieldKind::StateCode, "ZZ", false)]
#[case(FieldKind::Stream, "B", true)]
#[case(FieldKind::batch(), "2023 BATCH A", true)]
#[case(FieldKind::Date, "2025-06-01", true)]
#[case(FieldKind::Name, "Ngozi", true)]
#[case(FieldKind::phone(), "0803 123 4567", true)]
fn domain_kinds(#[case] kind: FieldKind, #[case] value: &str, #[case] valid: bool) {
    let result = kind.validate("Field", &ValidationConfig::default(), value, &NoSiblings);
    assert_eq!(result.is_valid(), valid, "{kind:?} {value}");
}

#[test]
fn required_text_field_reports_required_message() {
    let config = ValidationConfig::builder().required(true).build().unwrap();
    let result = FieldKind::Text.validate("Address", &config, "", &NoSiblings);
    assert_eq!(result.error_messages(), vec!["Address is required"]);
}
