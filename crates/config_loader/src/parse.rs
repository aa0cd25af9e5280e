//! Loose-value parsing helpers.
//!
//! Raw settings arrive as untyped `serde_json::Value`s supplied by the host
//! application. Every helper returns `None` on malformed input; callers keep
//! the prior or default value, never surfacing an error.

use std::time::Duration;

use contracts::{Level, LevelSet};
use serde_json::Value;

/// Level from a number (direct cast) or a case-insensitive name.
pub fn parse_level(value: &Value) -> Option<Level> {
    match value {
        Value::Number(n) => Level::from_index(u8::try_from(number_to_i64(n)?).ok()?),
        Value::String(s) => Level::from_name(s),
        _ => None,
    }
}

/// Explicit level list; `None` when absent, malformed, or empty after
/// parsing (individual unparseable items are skipped).
pub fn parse_levels(value: &Value) -> Option<LevelSet> {
    let items = value.as_array()?;
    let set: LevelSet = items.iter().filter_map(parse_level).collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

/// Unsigned integer from a number or a numeric string.
pub fn parse_usize(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => usize::try_from(number_to_i64(n)?).ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Duration from a bare number (whole seconds) or a duration-like string
/// such as `"250ms"`, `"5s"`, `"1m30s"`, `"2h"`.
pub fn parse_duration(value: &Value) -> Option<Duration> {
    match value {
        Value::Number(n) => {
            let secs = number_to_i64(n)?;
            u64::try_from(secs).ok().map(Duration::from_secs)
        }
        Value::String(s) => parse_duration_text(s),
        _ => None,
    }
}

/// Parse a duration string of one or more `<number><unit>` segments.
///
/// Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. A bare number without a
/// unit is rejected; numeric seconds belong in the number form.
pub fn parse_duration_text(text: &str) -> Option<Duration> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut total = Duration::ZERO;
    let mut rest = text;
    while !rest.is_empty() {
        let number_end = rest.find(|c: char| !(c.is_ascii_digit() || c == '.'))?;
        if number_end == 0 {
            return None;
        }
        let (number, tail) = rest.split_at(number_end);
        let value: f64 = number.parse().ok()?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);
        let unit_secs = match unit {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };

        // try_from rejects negative, non-finite, and oversized values;
        // checked_add catches overflow across segments.
        let secs = Duration::try_from_secs_f64(value * unit_secs).ok()?;
        total = total.checked_add(secs)?;
        rest = next;
    }
    Some(total)
}

// serde_json keeps integers and floats apart; the original config surface
// accepted both, truncating floats.
fn number_to_i64(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        Some(i)
    } else {
        n.as_f64().map(|f| f as i64)
    }
}
