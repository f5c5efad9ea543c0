use chrono::NaiveDateTime;

/// Accepted timestamp layouts, tried in order.
const INPUT_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%d %H:%M:%S",
];

const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Rewrites a timestamp as whole-second UTC (`YYYY-MM-DDTHH:MM:SSZ`).
///
/// Empty input yields `None`. A value in none of the known layouts is
/// returned unchanged.
pub fn normalize_timestamp(value: Option<&str>) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;

    for fmt in INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.format(OUTPUT_FORMAT).to_string());
        }
    }

    Some(value.to_string())
}
