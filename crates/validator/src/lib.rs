//! # formflow-validator
//!
//! Field validation for form and wizard flows.
//!
//! Validation never fails with an error: every check returns an immutable
//! [`ValidationResult`] holding errors (which make it invalid), warnings
//! (which do not) and, for passwords, a [`Strength`].
//!
//! ## Quick Start
//!
//! ```
//! use formflow_validator::prelude::*;
//!
//! let config = ValidationConfig::default();
//! let result = FieldKind::Email.validate("Email", &config, "bad-email", &NoSiblings);
//! assert!(!result.is_valid());
//!
//! let result = FieldKind::Password.validate("Password", &config, "Str0ng!Pass1", &NoSiblings);
//! assert_eq!(result.strength(), Some(Strength::Strong));
//! ```
//!
//! ## Dispatch
//!
//! A field's [`FieldKind`] selects its validator. [`FieldKind::Text`] falls
//! back to the generic algorithm driven by the field's [`ValidationConfig`]
//! (required, length bounds, pattern, custom validator).

pub mod config;
pub mod error;
pub mod kind;
pub mod prelude;
pub mod result;
pub mod traits;
pub mod validators;

pub use config::{
    ConfigError, CustomValidator, DEFAULT_DEBOUNCE_MS, Pattern, ValidationConfig,
    ValidationConfigBuilder,
};
pub use error::{ErrorSeverity, ValidationError};
pub use kind::{FieldKind, validate_field};
pub use result::{ResultBuilder, Strength, ValidationResult};
pub use traits::{FieldLookup, NoSiblings, Validate};
pub use validators::{PhoneCountry, YearRange};
