//! Seams between validators and the values they read

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::result::ValidationResult;

// ============================================================================
// VALIDATE
// ============================================================================

/// A validator over a single raw string value.
///
/// Implemented for every `Fn(&str) -> ValidationResult`, so closures can be
/// passed wherever a validator is expected.
///
/// # Examples
///
/// ```
/// use formflow_validator::{Validate, ValidationError, ValidationResult};
///
/// let no_spaces = |value: &str| {
///     if value.contains(' ') {
///         ValidationResult::invalid(ValidationError::new("spaces", "No spaces allowed"))
///     } else {
///         ValidationResult::valid()
///     }
/// };
/// assert!(!no_spaces.validate("a b").is_valid());
/// ```
pub trait Validate: Send + Sync {
    fn validate(&self, value: &str) -> ValidationResult;
}

impl<F> Validate for F
where
    F: Fn(&str) -> ValidationResult + Send + Sync,
{
    fn validate(&self, value: &str) -> ValidationResult {
        self(value)
    }
}

// ============================================================================
// FIELD LOOKUP
// ============================================================================

/// Read access to sibling field values.
///
/// Validators that compare against another field (confirm-password) read it
/// through this trait, so they work over any map of values.
pub trait FieldLookup {
    /// The current value of `field`, if present.
    fn get_value(&self, field: &str) -> Option<&str>;
}

impl<K, V> FieldLookup for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn get_value(&self, field: &str) -> Option<&str> {
        self.get(field).map(AsRef::as_ref)
    }
}

impl<K, V, S> FieldLookup for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn get_value(&self, field: &str) -> Option<&str> {
        self.get(field).map(AsRef::as_ref)
    }
}

/// A lookup with no fields, for validating a value in isolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSiblings;

impl FieldLookup for NoSiblings {
    fn get_value(&self, _field: &str) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btreemap_lookup_by_str() {
        let mut values = BTreeMap::new();
        values.insert("password".to_string(), "secret".to_string());
        assert_eq!(values.get_value("password"), Some("secret"));
        assert_eq!(values.get_value("email"), None);
    }

    #[test]
    fn hashmap_lookup_with_static_keys() {
        let values: HashMap<&str, &str> = HashMap::from([("email", "a@b.co")]);
        assert_eq!(values.get_value("email"), Some("a@b.co"));
    }

    #[test]
    fn closures_are_validators() {
        let always_valid = |_: &str| ValidationResult::valid();
        assert!(always_valid.validate("anything").is_valid());
    }
}
