//! Password validator with strength scoring.
//!
//! Score is 0..=6: one point each for length ≥ 8, length ≥ 12, a lowercase
//! letter, an uppercase letter, a digit and a special character. A trivial
//! pattern costs two points (floored at zero).
//!
//! Every trivial pattern lies within a single character class (letters of one
//! case, or digits), so adding a missing class never introduces one and the
//! score never drops.

use crate::error::ValidationError;
use crate::result::{Strength, ValidationResult};

/// Shortest accepted password.
pub const MIN_LENGTH: usize = 8;
/// Length that earns the extra point.
pub const LONG_LENGTH: usize = 12;

const TRIVIAL_PENALTY: u8 = 2;
const MAX_REPEAT: usize = 3;
const MIN_SEQUENCE: usize = 4;

const COMMON_LITERALS: &[&str] = &[
    "password", "PASSWORD", "qwerty", "QWERTY", "123456", "111111", "000000", "letmein",
    "admin", "welcome", "iloveyou", "monkey", "dragon",
];

/// Character-class composition of a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Composition {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub special: bool,
    pub trivial: bool,
}

impl Composition {
    #[must_use]
    pub fn of(password: &str) -> Self {
        Self {
            length: password.chars().count(),
            lowercase: password.chars().any(char::is_lowercase),
            uppercase: password.chars().any(char::is_uppercase),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
            trivial: is_trivial(password),
        }
    }

    /// Strength points, 0..=6.
    #[must_use]
    pub fn score(&self) -> u8 {
        let points = [
            self.length >= MIN_LENGTH,
            self.length >= LONG_LENGTH,
            self.lowercase,
            self.uppercase,
            self.digit,
            self.special,
        ]
        .into_iter()
        .map(u8::from)
        .sum::<u8>();

        if self.trivial {
            points.saturating_sub(TRIVIAL_PENALTY)
        } else {
            points
        }
    }
}

/// Strength points of `password`, 0..=6.
#[must_use]
pub fn score(password: &str) -> u8 {
    Composition::of(password).score()
}

/// Validates a password and classifies its strength.
///
/// ```
/// use formflow_validator::validators::password;
/// use formflow_validator::Strength;
///
/// let result = password::validate("Str0ng!Pass1");
/// assert!(result.is_valid());
/// assert_eq!(result.strength(), Some(Strength::Strong));
/// ```
#[must_use]
pub fn validate(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::builder()
            .error(ValidationError::required("Password"))
            .strength(Strength::Weak)
            .build();
    }

    let composition = Composition::of(password);
    let mut result = ValidationResult::builder();

    if composition.length < MIN_LENGTH {
        result.push(ValidationError::min_length(
            "Password",
            MIN_LENGTH,
            composition.length,
        ));
    }
    if !composition.lowercase {
        result.push(ValidationError::new(
            "password_lowercase",
            "Password must contain a lowercase letter",
        ));
    }
    if !composition.uppercase {
        result.push(ValidationError::new(
            "password_uppercase",
            "Password must contain an uppercase letter",
        ));
    }
    if !composition.digit {
        result.push(ValidationError::new(
            "password_digit",
            "Password must contain a number",
        ));
    }
    if !composition.special {
        result.push(ValidationError::warning(
            "password_special",
            "Adding a special character makes the password stronger",
        ));
    }
    if composition.trivial {
        result.push(ValidationError::new(
            "password_trivial",
            "Password is too easy to guess",
        ));
    }

    result
        .strength(Strength::from_score(composition.score()))
        .build()
}

/// Returns true if `password` contains a repeated character, a sequential
/// run, or a common literal.
#[must_use]
pub fn is_trivial(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    has_repeat(&chars)
        || has_sequence(&chars)
        || COMMON_LITERALS.iter().any(|literal| password.contains(literal))
}

fn has_repeat(chars: &[char]) -> bool {
    chars
        .windows(MAX_REPEAT)
        .any(|window| window.iter().all(|&c| c == window[0]))
}

fn has_sequence(chars: &[char]) -> bool {
    chars.windows(MIN_SEQUENCE).any(|window| {
        let same_class = window.iter().all(char::is_ascii_digit)
            || window.iter().all(char::is_ascii_lowercase)
            || window.iter().all(char::is_ascii_uppercase);
        if !same_class {
            return false;
        }
        let steps: Vec<i64> = window
            .windows(2)
            .map(|pair| i64::from(u32::from(pair[1])) - i64::from(u32::from(pair[0])))
            .collect();
        steps.iter().all(|&step| step == 1) || steps.iter().all(|&step| step == -1)
    })
}
