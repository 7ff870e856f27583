use shared_types::ExtractionError;

/// Turn a localized price or number string into a canonical decimal string.
///
/// The result holds only ASCII digits and at most one `.`. Missing, empty or
/// digit-free input becomes `"0"`; this never fails.
///
/// Separators are told apart heuristically: a `.` followed by three or more
/// digits is a thousands separator, and a `,` followed by exactly two digits at
/// the end is a decimal comma. Amounts with three decimal places are therefore
/// read as whole numbers.
pub fn normalize_number_string(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return "0".to_string(),
    };

    let mut value: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if value.is_empty() {
        return "0".to_string();
    }

    if value.ends_with('.') {
        value.pop();
    }

    let mut value = drop_thousands_dots(&value);

    if ends_with_decimal_comma(&value) {
        let comma = value.len() - 3;
        value.replace_range(comma..comma + 1, ".");
    }

    let mut value: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if value.starts_with('.') {
        value.remove(0);
    }

    if value.is_empty() {
        return "0".to_string();
    }

    value
}

/// [`normalize_number_string`] for text that is always present
pub fn normalize_amount(raw: &str) -> String {
    normalize_number_string(Some(raw))
}

// Input is ASCII only at this point, so byte offsets are char offsets.
fn drop_thousands_dots(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());

    for (i, &b) in bytes.iter().enumerate() {
        if b == b'.' {
            let followed_by_group = bytes.len() >= i + 4
                && bytes[i + 1..i + 4].iter().all(u8::is_ascii_digit);
            if followed_by_group {
                continue;
            }
        }
        out.push(b as char);
    }

    out
}

fn ends_with_decimal_comma(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 3
        && bytes[bytes.len() - 3] == b','
        && bytes[bytes.len() - 2..].iter().all(u8::is_ascii_digit)
}

/// Parse the number in a piece of text, dropping everything but digits and `.`.
///
/// Unlike [`normalize_number_string`] this fails when no valid number remains.
pub fn extract_number_from_text(text: &str) -> Result<f64, ExtractionError> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    digits
        .parse::<f64>()
        .map_err(|_| ExtractionError::InvalidNumber(text.to_string()))
}

/// Keep only digits and `+`, e.g. a code embedded in a subject line
pub fn remove_non_digits(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Keep only letters and digits
pub fn keep_alphanumeric(text: &str) -> String {
    text.chars().filter(|c| c.is_alphanumeric()).collect()
}
