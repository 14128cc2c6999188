//! Fixed-precision number formatting.

/// Format `value` with exactly `precision` decimals.
///
/// Never uses scientific notation and does not depend on locale. Values
/// that round to zero print without a sign.
pub fn format_fixed(value: f64, precision: usize) -> String {
    let text = format!("{:.prec$}", value, prec = precision);
    match text.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => text,
    }
}

/// Format a boolean the way BTLx expects.
pub fn format_flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(90.0, 3), "90.000");
        assert_eq!(format_fixed(0.05, 3), "0.050");
        assert_eq!(format_fixed(-0.5, 2), "-0.50");
        assert_eq!(format_fixed(1e-9, 3), "0.000");
        assert_eq!(format_fixed(-1e-9, 3), "0.000");
        assert_eq!(format_fixed(1.5e7, 3), "15000000.000");
    }

    #[test]
    fn test_format_flag() {
        assert_eq!(format_flag(true), "yes");
        assert_eq!(format_flag(false), "no");
    }

    proptest! {
        #[test]
        fn prop_reparse_within_precision(value in -1.0e6f64..1.0e6, precision in 0usize..6) {
            let text = format_fixed(value, precision);
            prop_assert!(!text.contains('e'));
            let parsed: f64 = text.parse().unwrap();
            prop_assert!((parsed - value).abs() <= 0.5 * 10f64.powi(-(precision as i32)) + 1e-9);
            prop_assert_eq!(format_fixed(parsed, precision), text);
        }
    }
}
