use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identity of a declared field.
///
/// Cheap to clone; looks up by `&str` in maps keyed by `FieldKey`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(Arc<str>);

impl FieldKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for FieldKey {
    fn from(key: String) -> Self {
        Self(Arc::from(key))
    }
}

/// Current values of a form, one entry per declared field.
pub type FieldValues = BTreeMap<FieldKey, String>;

/// Builds a [`FieldValues`] map from string pairs.
///
/// ```
/// use formflow_form::values;
///
/// let prefill = values([("email", "user@example.com")]);
/// assert_eq!(prefill["email"], "user@example.com");
/// ```
pub fn values<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> FieldValues
where
    K: Into<FieldKey>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
