//! Specialized field validators.
//!
//! Each validator is a pure function from a raw value to a
//! [`ValidationResult`](crate::ValidationResult). Specialized fields are
//! always required.

pub mod confirm;
pub mod date;
pub mod deployment;
pub mod email;
pub mod name;
pub mod password;
pub mod phone;

pub use deployment::YearRange;
pub use phone::PhoneCountry;
