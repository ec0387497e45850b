//! Binary (JEDEC) file size formatting.
//!
//! Base-2 values with KB/MB/GB labels: `1536` -> `1.5 KB`.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count in JEDEC units.
///
/// Rounds to at most two decimals and trims trailing zeros. Negative
/// values keep their sign (used for deltas).
pub fn jedec(bytes: i64) -> String {
    let mut value = bytes.unsigned_abs() as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut text = format!("{value:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }

    let sign = if bytes < 0 { "-" } else { "" };
    format!("{}{} {}", sign, text, UNITS[unit])
}

/// Format a delta with an explicit `+` on growth.
pub fn jedec_signed(bytes: i64) -> String {
    if bytes > 0 {
        format!("+{}", jedec(bytes))
    } else {
        jedec(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes() {
        assert_eq!(jedec(0), "0 B");
        assert_eq!(jedec(123), "123 B");
        assert_eq!(jedec(1023), "1023 B");
    }

    #[test]
    fn test_kilobytes() {
        assert_eq!(jedec(1024), "1 KB");
        assert_eq!(jedec(1536), "1.5 KB");
        assert_eq!(jedec(2048), "2 KB");
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(jedec(1024 * 1024), "1 MB");
        assert_eq!(jedec(5 * 1024 * 1024 + 256 * 1024), "5.25 MB");
    }

    #[test]
    fn test_negative_keeps_sign() {
        assert_eq!(jedec(-2048), "-2 KB");
        assert_eq!(jedec(-1), "-1 B");
    }

    #[test]
    fn test_signed_marks_growth() {
        assert_eq!(jedec_signed(1024), "+1 KB");
        assert_eq!(jedec_signed(-1024), "-1 KB");
        assert_eq!(jedec_signed(0), "0 B");
    }

    #[test]
    fn test_rounding_trims_trailing_zeros() {
        // 1.50 -> 1.5, 1.00 -> 1
        assert_eq!(jedec(1024 + 512), "1.5 KB");
        assert_eq!(jedec(1100), "1.07 KB");
    }
}
