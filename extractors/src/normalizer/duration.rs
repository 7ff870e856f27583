use chrono::Duration;
use regex::Regex;
use std::sync::LazyLock;

static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2}))?$").expect("clock pattern is valid")
});

static UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+)\s*(days?|d|hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)",
    )
    .expect("unit pattern is valid")
});

/// Parse a duration as the client displays it.
///
/// Accepts clock forms (`1:02:03`, `02:03`) and unit forms (`1h 20m`,
/// `1h20m`, `2 hours 5 minutes`, `45 sec`, `3 days`). Returns `None` when no
/// duration can be read, or when a clock form has minutes or seconds past 59.
pub fn parse_duration_text(text: &str) -> Option<Duration> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let seconds = match CLOCK.captures(text) {
        Some(caps) => {
            let first: i64 = caps[1].parse().ok()?;
            let second = sexagesimal(&caps[2])?;
            match caps.get(3) {
                Some(third) => {
                    let third = sexagesimal(third.as_str())?;
                    first.checked_mul(3600)?.checked_add(second * 60 + third)?
                }
                None => first.checked_mul(60)?.checked_add(second)?,
            }
        }
        None => sum_units(text)?,
    };

    Duration::try_seconds(seconds)
}

/// Minutes or seconds field of a clock form, `None` past 59
fn sexagesimal(field: &str) -> Option<i64> {
    field.parse().ok().filter(|value| (0..60).contains(value))
}

fn sum_units(text: &str) -> Option<i64> {
    let mut total: i64 = 0;
    let mut matched = false;

    for caps in UNIT.captures_iter(text) {
        // a unit runs up to the next digit or non-letter, so "5 months" is
        // not five minutes while "1h20m" still splits after the "h"
        let end = caps.get(0)?.end();
        if text[end..].starts_with(|c: char| c.is_alphabetic()) {
            continue;
        }

        let amount: i64 = caps[1].parse().ok()?;
        let unit = caps[2].to_ascii_lowercase();
        let factor = match unit.chars().next()? {
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            _ => 1,
        };
        total = total.checked_add(amount.checked_mul(factor)?)?;
        matched = true;
    }

    matched.then_some(total)
}
