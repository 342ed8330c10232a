//! Declarative form schema.
//!
//! A schema lists the form's fields in display order. Each field has a
//! [`FieldKind`] selecting its validator; a field declared without one gets
//! its kind inferred from its key once, when the schema is loaded.
//!
//! ```
//! use formflow_form::FormSchema;
//! use formflow_validator::FieldKind;
//!
//! let schema = FormSchema::from_toml(r#"
//!     [[fields]]
//!     key = "email"
//!
//!     [[fields]]
//!     key = "bio"
//!     label = "About you"
//!     max_length = 200
//! "#).unwrap();
//!
//! assert_eq!(schema.field("email").unwrap().kind, FieldKind::Email);
//! assert_eq!(schema.field("bio").unwrap().kind, FieldKind::Text);
//! ```

use std::collections::HashMap;

use formflow_validator::{FieldKind, ValidationConfig};
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::key::FieldKey;

// ============================================================================
// FIELD SPEC
// ============================================================================

/// One declared field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawFieldSpec")]
pub struct FieldSpec {
    pub key: FieldKey,
    /// Human label used in messages and hints.
    pub label: String,
    pub kind: FieldKind,
    #[serde(flatten)]
    pub config: ValidationConfig,
}

#[derive(Deserialize)]
struct RawFieldSpec {
    key: FieldKey,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    kind: Option<FieldKind>,
    #[serde(flatten)]
    config: ValidationConfig,
}

impl From<RawFieldSpec> for FieldSpec {
    fn from(raw: RawFieldSpec) -> Self {
        let kind = raw.kind.unwrap_or_else(|| FieldKind::infer(raw.key.as_str()));
        let label = raw.label.unwrap_or_else(|| humanize(raw.key.as_str()));
        Self {
            key: raw.key,
            label,
            kind,
            config: raw.config,
        }
    }
}

impl FieldSpec {
    /// A field with an explicit kind and default config.
    pub fn new(key: impl Into<FieldKey>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            config: ValidationConfig::default(),
        }
    }

    /// A field whose kind is inferred from its key.
    pub fn inferred(key: impl Into<FieldKey>) -> Self {
        let key = key.into();
        Self {
            label: humanize(key.as_str()),
            kind: FieldKind::infer(key.as_str()),
            key,
            config: ValidationConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Specialized kinds are always required; text fields follow their config.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.kind.is_specialized() || self.config.required
    }
}

/// `check_in_date` / `checkInDate` → `Check in date`.
fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in key.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.extend(c.to_lowercase());
        } else {
            current.extend(c.to_lowercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let sentence = words.join(" ");
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// FORM SCHEMA
// ============================================================================

/// Ordered, validated set of field declarations.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
    #[serde(skip)]
    index: HashMap<FieldKey, usize>,
}

#[derive(Deserialize)]
struct RawSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Builds a schema, rejecting duplicate keys and unusable configs.
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Result<Self, FormError> {
        let fields: Vec<FieldSpec> = fields.into_iter().collect();
        let mut index = HashMap::with_capacity(fields.len());

        for (position, spec) in fields.iter().enumerate() {
            spec.config.check().map_err(|source| FormError::Config {
                field: spec.key.to_string(),
                source,
            })?;
            if index.insert(spec.key.clone(), position).is_some() {
                return Err(FormError::DuplicateField {
                    field: spec.key.to_string(),
                });
            }
        }

        Ok(Self { fields, index })
    }

    /// Loads a `{ "fields": [...] }` document.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        let raw: RawSchema =
            serde_json::from_str(json).map_err(|e| FormError::Schema(e.to_string()))?;
        Self::new(raw.fields)
    }

    /// Loads a document with a `[[fields]]` array of tables.
    pub fn from_toml(source: &str) -> Result<Self, FormError> {
        let raw: RawSchema = toml::from_str(source).map_err(|e| FormError::Schema(e.to_string()))?;
        Self::new(raw.fields)
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.fields.iter().map(|spec| &spec.key)
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.index.get(key).map(|&position| &self.fields[position])
    }

    /// Like [`field`](Self::field), failing with [`FormError::UnknownField`].
    pub fn resolve(&self, key: &str) -> Result<&FieldSpec, FormError> {
        self.field(key).ok_or_else(|| FormError::unknown(key))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Fields whose validator reads `key`.
    pub fn dependents<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a FieldSpec> + 'a {
        self.fields
            .iter()
            .filter(move |spec| spec.kind.reads() == Some(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("check_in_date", "Check in date")]
    #[case("firstName", "First name")]
    #[case("email", "Email")]
    #[case("call-up-number", "Call up number")]
    fn labels_from_keys(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(humanize(key), expected);
    }

    #[test]
    fn json_schema_infers_kinds_once() {
        let schema = FormSchema::from_json(
            r#"{"fields": [
                {"key": "password"},
                {"key": "confirm_password", "label": "Repeat password"},
                {"key": "mobile", "kind": {"phone": {"country": "international"}}},
                {"key": "bio", "max_length": 200, "real_time": false}
            ]}"#,
        )
        .unwrap();

        assert_eq!(schema.len(), 4);
        assert_eq!(schema.field("password").unwrap().kind, FieldKind::Password);
        assert_eq!(
            schema.field("confirm_password").unwrap().kind,
            FieldKind::confirm_password()
        );
        assert_eq!(schema.field("confirm_password").unwrap().label, "Repeat password");
        let bio = schema.field("bio").unwrap();
        assert_eq!(bio.config.max_length, Some(200));
        assert!(!bio.config.real_time);
        assert_eq!(
            schema.dependents("password").map(|s| s.key.as_str()).collect::<Vec<_>>(),
            vec!["confirm_password"]
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = FormSchema::new([FieldSpec::inferred("email"), FieldSpec::inferred("email")])
            .unwrap_err();
        assert_eq!(err.code(), "FORM_DUPLICATE_FIELD");
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = FormSchema::from_toml(
            r#"
            [[fields]]
            key = "code"
            min_length = 8
            max_length = 4
            "#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "FORM_CONFIG");
    }

    #[test]
    fn bad_pattern_is_a_schema_error() {
        let err = FormSchema::from_json(r#"{"fields": [{"key": "code", "pattern": "("}]}"#)
            .unwrap_err();
        assert_eq!(err.code(), "FORM_SCHEMA");
    }

    #[test]
    fn resolve_unknown_field() {
        let schema = FormSchema::new([FieldSpec::inferred("email")]).unwrap();
        assert!(matches!(
            schema.resolve("phone"),
            Err(FormError::UnknownField { field }) if field == "phone"
        ));
    }
}
