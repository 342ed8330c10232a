use serde::{Deserialize, Serialize};

/// What happens to fields hidden by a wizard branch choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenFieldPolicy {
    /// Keep the stored value and result; the field simply stops gating.
    #[default]
    Retain,
    /// Clear value and result whenever the step is checked. Touched stays set.
    Clear,
}

/// Form-wide behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// Validate a field synchronously when it is marked touched.
    pub validate_on_blur: bool,
    /// When a field changes, re-schedule real-time fields whose validator
    /// reads it, provided they are touched or already hold a result.
    pub revalidate_dependents: bool,
    pub hidden_fields: HiddenFieldPolicy,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_on_blur: true,
            revalidate_dependents: true,
            hidden_fields: HiddenFieldPolicy::default(),
        }
    }
}

impl FormOptions {
    #[must_use]
    pub fn validate_on_blur(mut self, enabled: bool) -> Self {
        self.validate_on_blur = enabled;
        self
    }

    #[must_use]
    pub fn revalidate_dependents(mut self, enabled: bool) -> Self {
        self.revalidate_dependents = enabled;
        self
    }

    #[must_use]
    pub fn hidden_fields(mut self, policy: HiddenFieldPolicy) -> Self {
        self.hidden_fields = policy;
        self
    }
}
