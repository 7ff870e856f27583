use regex::Regex;
use shared_types::ExtractionError;

/// True when `container` holds every keyword, ignoring case.
///
/// An empty container never matches. An empty keyword list matches any
/// non-empty container.
pub fn contains_ignore_case<S: AsRef<str>>(container: &str, keywords: &[S]) -> bool {
    if container.is_empty() {
        return false;
    }

    let haystack = container.to_lowercase();
    keywords
        .iter()
        .all(|keyword| haystack.contains(&keyword.as_ref().to_lowercase()))
}

/// True when `container` holds at least one candidate, ignoring case.
///
/// This is the OR counterpart of [`contains_ignore_case`].
pub fn contains_any_ignore_case<S: AsRef<str>>(container: &str, candidates: &[S]) -> bool {
    if container.is_empty() {
        return false;
    }

    let haystack = container.to_lowercase();
    candidates
        .iter()
        .any(|candidate| haystack.contains(&candidate.as_ref().to_lowercase()))
}

pub fn equals_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Test `text` against a regular expression, searching anywhere in the text
pub fn matches_pattern(text: &str, pattern: &str) -> Result<bool, ExtractionError> {
    let regex = Regex::new(pattern).map_err(|e| ExtractionError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(regex.is_match(text))
}
