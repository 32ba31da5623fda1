//! Human-readable formatting for sizes and size changes.

/// Placeholder for values that cannot be computed.
pub const NOT_AVAILABLE: &str = "N/A";

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary (1024-based) units.
///
/// Bytes print as a truncated integer, larger units with two decimals.
/// Missing or negative sizes print as `N/A`.
pub fn format_bytes(size: Option<i64>) -> String {
    let Some(size) = size else {
        return NOT_AVAILABLE.to_string();
    };
    if size < 0 {
        return NOT_AVAILABLE.to_string();
    }
    if size == 0 {
        return "0 B".to_string();
    }

    let mut value = size as f64;
    let mut idx = 0usize;
    while value >= 1024.0 && idx + 1 < UNITS.len() {
        value /= 1024.0;
        idx += 1;
    }

    if idx == 0 {
        format!("{} {}", value as i64, UNITS[idx])
    } else {
        format!("{:.2} {}", value, UNITS[idx])
    }
}

/// Signed percentage change from `original` to `obfuscated`, e.g. `+12.34%`.
///
/// `N/A` when either size is missing or the original is empty.
pub fn format_change_pct(original: Option<u64>, obfuscated: Option<u64>) -> String {
    match (original, obfuscated) {
        (Some(orig), Some(obf)) if orig > 0 => {
            let pct = (obf as f64 - orig as f64) / orig as f64 * 100.0;
            format!("{:+.2}%", pct)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}
