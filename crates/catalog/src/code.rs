//! Product code generation.
//!
//! A product code is the first three alphanumeric characters of its category
//! name, uppercased, followed by a random 5-digit suffix: `"Mugs"` yields codes like
//! `MUG48213`. Collisions are possible, so callers retry with fresh
//! candidates; the retry count is bounded by [`MAX_CODE_ATTEMPTS`] and
//! exhaustion is a conflict, never an infinite loop.

use rand::Rng;

use promostore_core::ProductCode;

/// Upper bound on candidate codes tried before the store gives up.
pub const MAX_CODE_ATTEMPTS: u32 = 16;

/// Derive the alphabetic prefix for a category name.
///
/// Takes the first three characters (the whole name when shorter), uppercased.
/// Non-alphanumeric characters are skipped so `"T-Shirts"` maps to `TSH`, not
/// `T-S`.
pub fn code_prefix(category_name: &str) -> String {
    category_name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Produce one candidate code: prefix plus a random 5-digit suffix.
pub fn candidate_code(prefix: &str, rng: &mut impl Rng) -> ProductCode {
    let suffix: u32 = rng.gen_range(0..100_000);
    ProductCode::from_generated(format!("{prefix}{suffix:05}"))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn prefix_uppercases_first_three_characters() {
        assert_eq!(code_prefix("Mugs"), "MUG");
        assert_eq!(code_prefix("pens"), "PEN");
    }

    #[test]
    fn prefix_of_short_name_is_the_whole_name() {
        assert_eq!(code_prefix("Go"), "GO");
    }

    #[test]
    fn prefix_skips_punctuation_and_spaces() {
        assert_eq!(code_prefix("T-Shirts"), "TSH");
        assert_eq!(code_prefix(" key chains"), "KEY");
    }

    #[test]
    fn candidate_is_prefix_plus_five_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = candidate_code("MUG", &mut rng);
        let s = code.as_str();
        assert!(s.starts_with("MUG"), "{s}");
        let suffix = &s["MUG".len()..];
        assert_eq!(suffix.len(), 5);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn successive_candidates_differ() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = candidate_code("MUG", &mut rng);
        let b = candidate_code("MUG", &mut rng);
        assert_ne!(a, b);
    }

    proptest::proptest! {
        #[test]
        fn prefix_is_at_most_three_uppercase_alphanumerics(name in "[ -~]{0,32}") {
            let prefix = code_prefix(&name);
            proptest::prop_assert!(prefix.chars().count() <= 3);
            proptest::prop_assert!(prefix.chars().all(|c| !c.is_lowercase() && c.is_alphanumeric()));
        }

        #[test]
        fn candidate_suffix_is_always_five_digits(seed in proptest::num::u64::ANY) {
            let mut rng = StdRng::seed_from_u64(seed);
            let code = candidate_code("PEN", &mut rng);
            let suffix = &code.as_str()["PEN".len()..];
            proptest::prop_assert_eq!(suffix.len(), 5);
            proptest::prop_assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
