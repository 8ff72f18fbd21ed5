//! Coercion of provider payload fields into plain numbers.
//!
//! The same field arrives as a number in one endpoint and as a string in
//! another, and stations with no reading report `-99.0`. Everything that
//! reads a numeric field from a payload goes through here.

use serde_json::Value;

/// Provider marker for "no reading".
pub const SENTINEL: f64 = -99.0;

/// Finite number from a JSON number or numeric string, `None` otherwise.
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    n.is_finite().then_some(n)
}

/// Like [`number`], but the sentinel also counts as missing.
pub fn reading(value: &Value) -> Option<f64> {
    number(value).and_then(reading_f64)
}

pub fn reading_f64(raw: f64) -> Option<f64> {
    if !raw.is_finite() || raw == SENTINEL {
        None
    } else {
        Some(raw)
    }
}
