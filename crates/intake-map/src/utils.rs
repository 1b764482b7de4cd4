//! Utility functions for scoring.

/// Normalizes a field name for comparison: lowercases, turns `_` and `-`
/// into spaces, and collapses whitespace runs.
pub fn normalize_name(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rounds to a fixed number of decimal places.
///
/// Rounding works on the exact decimal expansion of `value`, so a double
/// stored just below a half step (`0.0075` is `0.00749999...`) rounds down.
/// Exact half steps round away from zero.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let value = if is_exact_half_step(value, places) {
        // One ulp further from zero sits strictly past the half step.
        f64::from_bits(value.to_bits() + 1)
    } else {
        value
    };
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// A half step at `places` decimals is `q / 2^(places + 1)` for an odd
/// integer `q`. Scaling by a power of two is exact.
fn is_exact_half_step(value: f64, places: usize) -> bool {
    let Ok(exponent) = i32::try_from(places + 1) else {
        return false;
    };
    let scaled = value * 2f64.powi(exponent);
    scaled.is_finite() && scaled.fract() == 0.0 && scaled % 2.0 != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_case() {
        assert_eq!(normalize_name("Date_Of-Birth"), "date of birth");
        assert_eq!(normalize_name("  e-mail   address "), "e mail address");
        assert_eq!(normalize_name("ni__number"), "ni number");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_name("Time_At  Current-Address_Years");
        assert_eq!(normalize_name(&once), once);
    }

    #[test]
    fn rounds_to_requested_places() {
        assert_eq!(round_to(0.85025, 3), 0.85);
        assert_eq!(round_to(0.40133, 4), 0.4013);
        assert_eq!(round_to(0.6, 3), 0.6);
    }

    #[test]
    fn rounds_on_the_stored_decimal_value() {
        // 0.05 * 0.15 is stored as 0.00749999...
        assert_eq!(round_to(0.05 * 0.15, 3), 0.007);
        // 0.60715 is stored as 0.607149999...
        assert_eq!(round_to(0.60715, 4), 0.6071);
        // 0.85035 is stored as 0.850350000...05
        assert_eq!(round_to(0.85035, 4), 0.8504);
    }

    #[test]
    fn exact_half_steps_round_away_from_zero() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-0.125, 2), -0.13);
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(round_to(f64::NAN, 3).is_nan());
        assert_eq!(round_to(f64::INFINITY, 3), f64::INFINITY);
    }
}
