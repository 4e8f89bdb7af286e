//! Property-based tests for the pure generators and the slugifier.
//!
//! Uses `proptest` to verify invariants across many random inputs.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use sandcastle::domain::names::{
    PASSWORD_LENGTH, generate_password, generate_subdomain, generate_username,
};
use sandcastle::domain::{parse_interval, slugify};

proptest! {
    /// Slugs contain only lowercase alphanumerics and the delimiter, never
    /// at the edges.
    #[test]
    fn prop_slugify_charset(input in "\\PC*") {
        let slug = slugify(&input);
        prop_assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "bad chars in {slug:?}"
        );
        prop_assert!(!slug.starts_with('-'), "leading delimiter in {slug:?}");
        prop_assert!(!slug.ends_with('-'), "trailing delimiter in {slug:?}");
        prop_assert!(!slug.contains("--"), "delimiter run in {slug:?}");
    }

    /// Slugifying twice is the same as slugifying once.
    #[test]
    fn prop_slugify_idempotent(input in "\\PC*") {
        let once = slugify(&input);
        prop_assert_eq!(slugify(&once), once);
    }

    /// Passwords are always 12 unambiguous alphanumeric characters.
    #[test]
    fn prop_password_shape(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let password = generate_password(&mut rng);
        prop_assert_eq!(password.len(), PASSWORD_LENGTH);
        prop_assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        prop_assert!(!password.contains(['0', 'O', '1', 'l', 'I']));
    }

    /// Usernames are `user` plus eight hex characters.
    #[test]
    fn prop_username_shape(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let username = generate_username(&mut rng);
        prop_assert_eq!(username.len(), 12);
        prop_assert!(username.starts_with("user"));
        prop_assert!(username[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    /// Subdomains are already valid slugs, with or without alliteration.
    #[test]
    fn prop_subdomain_is_a_slug(seed in any::<u64>(), alliterate in any::<bool>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let subdomain = generate_subdomain(&mut rng, alliterate);
        prop_assert!(!subdomain.is_empty());
        prop_assert_eq!(slugify(&subdomain), subdomain.clone());
        prop_assert_eq!(subdomain.matches('-').count(), 1, "shape of {}", subdomain);
    }

    /// Every well-formed interval expression parses to the expected length.
    #[test]
    fn prop_interval_round_trip(count in 1i64..10_000, unit in prop::sample::select(vec!['s', 'm', 'h', 'd'])) {
        let seconds_per_unit = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            _ => 86_400,
        };
        let parsed = parse_interval(&format!("{count}{unit}")).expect("valid interval");
        prop_assert_eq!(parsed.num_seconds(), count * seconds_per_unit);
    }
}
