//! Timer value formatting.
//!
//! Timer fields store elapsed time as text in tenths of a second:
//! `"42.7"` below one minute, `"1:05.3"` from one minute up.

/// Format tenths of a second as a timer value.
pub fn format_tenths(tenths: u64) -> String {
    let minutes = tenths / 600;
    if minutes > 0 {
        let rem = tenths % 600;
        format!("{minutes}:{:02}.{}", rem / 10, rem % 10)
    } else {
        format!("{}.{}", tenths / 10, tenths % 10)
    }
}

/// Parse a timer value back into tenths of a second.
///
/// Accepts `"M:S.s"` and bare seconds. Unparsable parts count as zero, and
/// an empty string is zero.
pub fn parse_tenths(value: &str) -> u64 {
    let value = value.trim();
    if value.is_empty() {
        return 0;
    }
    let seconds = match value.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes = minutes.trim().parse::<u64>().unwrap_or(0) as f64;
            let seconds = seconds.trim().parse::<f64>().unwrap_or(0.0);
            minutes * 60.0 + seconds
        }
        None => value.parse::<f64>().unwrap_or(0.0),
    };
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 10.0).round() as u64
    } else {
        0
    }
}
