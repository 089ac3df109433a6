// Human-readable magnitudes and field-name based unit lookup

use std::borrow::Cow;

use crate::models::{FieldValue, NOT_AVAILABLE};

const PREFIXES: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Rendered when a value is beyond the largest prefix.
pub const OVERFLOW: &str = "NaN";

/// Known rate suffixes and the unit they render with. Any other `_<x>ps`
/// field renders with its own suffix (e.g. `m_active_cps` -> "cps").
const RATE_UNITS: &[(&str, &str)] = &[("_bps", "b/sec"), ("_pps", "pkt/sec")];

/// Scales by powers of 1000 and renders `"<value> <prefix><suffix>"` with two decimals.
pub fn format_num(value: f64, suffix: &str) -> String {
    let mut size = value;
    for unit in PREFIXES {
        if size.abs() < 1000.0 {
            return format!("{size:.2} {unit}{suffix}");
        }
        size /= 1000.0;
    }
    OVERFLOW.to_string()
}

/// Same as [`format_num`], but anything that is not a number renders as "N/A".
pub fn format_value(value: &FieldValue, suffix: &str) -> String {
    match value {
        FieldValue::Number(n) => format_num(*n, suffix),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Wraps an optional number as a scaled text cell.
pub(crate) fn scaled(value: Option<f64>, suffix: &str) -> FieldValue {
    match value {
        Some(v) => FieldValue::Text(format_num(v, suffix)),
        None => FieldValue::Unavailable,
    }
}

/// Unit suffix for absolute rate fields (names ending in `_<lowercase letter>ps`).
/// Returns `None` for anything else; those fields are only reachable through the
/// entity-specific accessors.
pub fn rate_unit(field: &str) -> Option<Cow<'_, str>> {
    if let Some((_, unit)) = RATE_UNITS.iter().find(|(tail, _)| field.ends_with(tail)) {
        return Some(Cow::Borrowed(*unit));
    }
    let bytes = field.as_bytes();
    let n = bytes.len();
    if n >= 4 && bytes[n - 4] == b'_' && bytes[n - 3].is_ascii_lowercase() && field.ends_with("ps")
    {
        return Some(Cow::Borrowed(&field[n - 3..]));
    }
    None
}
