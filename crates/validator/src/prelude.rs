//! Prelude module for convenient imports.
//!
//! ```
//! use formflow_validator::prelude::*;
//!
//! let result = validators::deployment::validate_state_code("LA");
//! assert!(result.is_valid());
//! ```

pub use crate::config::{ConfigError, ValidationConfig};
pub use crate::error::{ErrorSeverity, ValidationError};
pub use crate::kind::{FieldKind, validate_field};
pub use crate::result::{Strength, ValidationResult};
pub use crate::traits::{FieldLookup, NoSiblings, Validate};
pub use crate::validators::{self, PhoneCountry, YearRange};
