use rand::Rng;

const FIRST_CODEPOINT: u8 = 32;
const LAST_CODEPOINT: u8 = 255;

/// Codepoints that render as nothing or break text fields in the client
pub const BLACKLISTED_CODEPOINTS: [u8; 7] = [127, 129, 141, 143, 144, 157, 160];

/// Random text of exactly `length` characters from the printable Latin-1
/// range, never containing a blacklisted codepoint
pub fn generate_random_string(length: usize) -> String {
    generate_random_string_with(&mut rand::thread_rng(), length)
}

pub fn generate_random_string_with<R: Rng>(rng: &mut R, length: usize) -> String {
    let mut out = String::with_capacity(length * 2);
    let mut produced = 0;

    while produced < length {
        let code = rng.gen_range(FIRST_CODEPOINT..=LAST_CODEPOINT);
        if BLACKLISTED_CODEPOINTS.contains(&code) {
            continue;
        }
        out.push(char::from(code));
        produced += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn has_blacklisted(text: &str) -> bool {
        text.chars()
            .any(|c| BLACKLISTED_CODEPOINTS.iter().any(|&b| u32::from(b) == c as u32))
    }

    #[test]
    fn test_exact_length() {
        for _ in 0..100 {
            let text = generate_random_string(50);
            assert_eq!(text.chars().count(), 50);
            assert!(!has_blacklisted(&text));
        }
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(generate_random_string(0), "");
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let a = generate_random_string_with(&mut StdRng::seed_from_u64(7), 32);
        let b = generate_random_string_with(&mut StdRng::seed_from_u64(7), 32);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_length_and_alphabet(seed in any::<u64>(), length in 0usize..200) {
            let text = generate_random_string_with(&mut StdRng::seed_from_u64(seed), length);
            prop_assert_eq!(text.chars().count(), length);
            prop_assert!(!has_blacklisted(&text));
            prop_assert!(text.chars().all(|c| (32..=255).contains(&(c as u32))));
        }
    }
}
