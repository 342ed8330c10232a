//! Property-based tests for formflow-validator.

use formflow_validator::prelude::*;
use formflow_validator::validators::password;
use proptest::prelude::*;

// ============================================================================
// REQUIRED: an empty value is always rejected
// ============================================================================

fn any_config() -> impl Strategy<Value = ValidationConfig> {
    (
        proptest::option::of(0usize..20),
        proptest::option::of(20usize..60),
        any::<bool>(),
    )
        .prop_map(|(min, max, real_time)| {
            let mut builder = ValidationConfig::builder().required(true).real_time(real_time);
            if let Some(min) = min {
                builder = builder.min_length(min);
            }
            if let Some(max) = max {
                builder = builder.max_length(max);
            }
            builder.build().expect("min is always below max")
        })
}

proptest! {
    #[test]
    fn required_rejects_blank(config in any_config(), blank in "[ \t]{0,4}") {
        let result = config.validate("Field", &blank);
        prop_assert!(!result.is_valid());
        prop_assert_eq!(result.errors().len(), 1);
        prop_assert!(result.has_code("required"));
    }

    #[test]
    fn generic_validation_is_deterministic(config in any_config(), value in ".{0,40}") {
        prop_assert_eq!(config.validate("Field", &value), config.validate("Field", &value));
    }
}

// ============================================================================
// PASSWORD: adding a missing class never lowers the score
// ============================================================================

const SPECIALS: &[char] = &['!', '@', '#', '$', '%', '&', '*', '?'];

fn classes() -> [Vec<char>; 4] {
    [
        ('a'..='z').collect(),
        ('A'..='Z').collect(),
        ('0'..='9').collect(),
        SPECIALS.to_vec(),
    ]
}

/// Characters from every class `base` has none of.
fn missing_from(base: &str) -> Vec<char> {
    classes()
        .into_iter()
        .filter(|class| !base.chars().any(|c| class.contains(&c)))
        .flatten()
        .collect()
}

/// A mixed-class password lacking at least one class, plus a character from
/// a class it lacks.
fn base_and_missing_char() -> impl Strategy<Value = (String, char)> {
    "[a-zA-Z0-9!@#$%&*?]{0,16}"
        .prop_filter("every class present", |base| !missing_from(base).is_empty())
        .prop_flat_map(|base| {
            let pool = missing_from(&base);
            (Just(base), proptest::sample::select(pool))
        })
}

proptest! {
    #[test]
    fn strength_is_monotonic_in_classes(
        (base, extra) in base_and_missing_char(),
        position in any::<prop::sample::Index>(),
    ) {
        let at = position.index(base.len() + 1);
        let mut extended = base.clone();
        extended.insert(at, extra);

        prop_assert!(
            password::score(&extended) >= password::score(&base),
            "{} ({}) -> {} ({})",
            base,
            password::score(&base),
            extended,
            password::score(&extended),
        );
    }

    #[test]
    fn score_stays_in_range(value in ".{0,32}") {
        prop_assert!(password::score(&value) <= 6);
    }

    #[test]
    fn strength_label_matches_score(value in ".{1,32}") {
        let result = password::validate(&value);
        prop_assert_eq!(result.strength(), Some(Strength::from_score(password::score(&value))));
    }
}

// ============================================================================
// DOMAIN CODES: case and surrounding whitespace do not matter
// ============================================================================

proptest! {
    #[test]
    fn state_codes_ignore_case(index in 0usize..37, pad in " {0,3}") {
        let code = validators::deployment::STATE_CODES[index].to_ascii_lowercase();
        let value = format!("{pad}{code}{pad}");
        prop_assert!(validators::deployment::validate_state_code(&value).is_valid());
    }
}
