//! Canonical forms for localized text.
//!
//! Pure functions with no logging and no shared state: number normalization,
//! case-insensitive keyword matching, sortedness checks, duration parsing and
//! random input generation for form fields.

mod duration;
mod matching;
mod number;
mod ordering;
mod random;

pub use duration::parse_duration_text;
pub use matching::{
    contains_any_ignore_case, contains_ignore_case, equals_ignore_case, matches_pattern,
};
pub use number::{
    extract_number_from_text, keep_alphanumeric, normalize_amount, normalize_number_string,
    remove_non_digits,
};
pub use ordering::{verify_list_sorted, verify_list_sorted_ignore_case};
pub use random::{generate_random_string, generate_random_string_with, BLACKLISTED_CODEPOINTS};
